//! Codec configuration.

use crate::error::{CodecError, Result};
use crate::format::{Compression, DEFAULT_COMPRESSION_THRESHOLD, DEFAULT_ZSTD_LEVEL};
use serde::{Deserialize, Serialize};

/// Knobs for encoding and decoding.
///
/// Deserializes from partial documents: missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Payloads strictly larger than this many bytes are compressed.
    pub compression_threshold: usize,

    /// Algorithm used above the threshold. `Compression::None` disables it.
    pub compression: Compression,

    /// zstd level (1..=22).
    pub zstd_level: i32,

    /// Largest accepted dimension count, on encode and decode.
    pub max_dimensions: usize,

    /// Largest accepted batch size, on encode and decode.
    pub max_batch_size: usize,

    /// Upper bound on a decompressed payload.
    pub max_decompressed_bytes: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            compression_threshold: DEFAULT_COMPRESSION_THRESHOLD,
            compression: Compression::Zstd,
            zstd_level: DEFAULT_ZSTD_LEVEL,
            max_dimensions: 1 << 24,
            max_batch_size: 1 << 20,
            max_decompressed_bytes: 256 * 1024 * 1024,
        }
    }
}

impl CodecConfig {
    /// Default limits with compression turned off.
    pub fn uncompressed() -> Self {
        Self {
            compression: Compression::None,
            ..Self::default()
        }
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<()> {
        if !(1..=22).contains(&self.zstd_level) {
            return Err(CodecError::InvalidConfig(format!(
                "zstd_level must be in 1..=22, got {}",
                self.zstd_level
            )));
        }
        if self.max_dimensions == 0 || self.max_dimensions > i32::MAX as usize {
            return Err(CodecError::InvalidConfig(
                "max_dimensions must be in 1..=i32::MAX".into(),
            ));
        }
        if self.max_batch_size == 0 || self.max_batch_size > i32::MAX as usize {
            return Err(CodecError::InvalidConfig(
                "max_batch_size must be in 1..=i32::MAX".into(),
            ));
        }
        if self.max_decompressed_bytes == 0 {
            return Err(CodecError::InvalidConfig(
                "max_decompressed_bytes must be > 0".into(),
            ));
        }
        Ok(())
    }
}
