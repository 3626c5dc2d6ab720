//! Payload compression and decompression.
//!
//! - **Zstd** (flag 1): the default generic byte-stream compressor. Good ratios
//!   on the repetitive layouts produced by sparse and named payloads.
//! - **LZ4** (flag 2): block format with a size prefix, for callers that value
//!   speed over ratio.
//!
//! Decompression is bounded by a caller-supplied limit so a hostile message
//! cannot inflate into an arbitrary allocation.

use crate::error::{CodecError, Result};
use crate::format::Compression;
use std::io::Read;

/// Signature of [`compress`], so the encoder can be handed another compressor.
pub(crate) type CompressFn = fn(&[u8], Compression, i32) -> Result<Vec<u8>>;

/// Compresses data using the specified algorithm.
///
/// Returns the original bytes for `Compression::None`.
pub fn compress(data: &[u8], algo: Compression, zstd_level: i32) -> Result<Vec<u8>> {
    match algo {
        Compression::None => Ok(data.to_vec()),
        Compression::Lz4 => compress_lz4(data),
        Compression::Zstd => compress_zstd(data, zstd_level),
    }
}

/// Decompresses data, refusing output larger than `max_size` bytes.
pub fn decompress(data: &[u8], algo: Compression, max_size: usize) -> Result<Vec<u8>> {
    match algo {
        Compression::None => Ok(data.to_vec()),
        Compression::Lz4 => decompress_lz4(data, max_size),
        Compression::Zstd => decompress_zstd(data, max_size),
    }
}

/// LZ4 block compression with the uncompressed size prepended.
fn compress_lz4(data: &[u8]) -> Result<Vec<u8>> {
    lz4::block::compress(data, None, true)
        .map_err(|e| CodecError::CompressionFailure(e.to_string()))
}

fn decompress_lz4(data: &[u8], max_size: usize) -> Result<Vec<u8>> {
    if data.len() < 4 {
        return Err(CodecError::CompressionFailure(
            "lz4 block missing size prefix".to_string(),
        ));
    }
    // Check the declared size before lz4 allocates for it.
    let declared = i32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    if declared < 0 {
        return Err(CodecError::CompressionFailure(format!(
            "lz4 block declares negative size {}",
            declared
        )));
    }
    if declared as usize > max_size {
        return Err(CodecError::LimitExceeded {
            what: "decompressed bytes",
            limit: max_size,
            actual: declared as usize,
        });
    }

    lz4::block::decompress(data, None).map_err(|e| CodecError::CompressionFailure(e.to_string()))
}

fn compress_zstd(data: &[u8], level: i32) -> Result<Vec<u8>> {
    zstd::encode_all(data, level).map_err(|e| CodecError::CompressionFailure(e.to_string()))
}

fn decompress_zstd(data: &[u8], max_size: usize) -> Result<Vec<u8>> {
    let decoder = zstd::stream::read::Decoder::new(data)
        .map_err(|e| CodecError::CompressionFailure(e.to_string()))?;

    let mut out = Vec::new();
    decoder
        .take(max_size as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|e| CodecError::CompressionFailure(e.to_string()))?;

    if out.len() > max_size {
        return Err(CodecError::LimitExceeded {
            what: "decompressed bytes",
            limit: max_size,
            actual: out.len(),
        });
    }
    Ok(out)
}
