//! ZVEC wire format constants and header layout.
//!
//! # Message Layout
//!
//! ```text
//! [Header: 6 bytes]
//!   - magic: [u8; 4] = "ZVEC"
//!   - version: u8 = 1
//!   - flags: u8 (high nibble = compression, low nibble = type tag)
//! [Payload]
//!   - type-specific body, compressed when the compression nibble is non-zero
//! ```
//!
//! All integers and floats are big-endian.
//!
//! | Nibble      | Value | Meaning |
//! |-------------|-------|---------|
//! | compression | 0     | uncompressed |
//! | compression | 1     | zstd frame |
//! | compression | 2     | LZ4 block, little-endian size prefix |
//! | type tag    | 1     | Dense |
//! | type tag    | 2     | Sparse |
//! | type tag    | 3     | Named |
//! | type tag    | 4     | Batch |

use crate::error::{CodecError, Result};
use bytes::{Buf, BufMut, BytesMut};
use serde::{Deserialize, Serialize};
use zvec_vector::VectorKind;

/// Magic bytes opening every message.
pub const WIRE_MAGIC: [u8; 4] = *b"ZVEC";

/// Current wire format version.
pub const FORMAT_VERSION: u8 = 1;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 6;

/// Payloads larger than this are considered for compression.
pub const DEFAULT_COMPRESSION_THRESHOLD: usize = 1024;

/// Default zstd level.
pub const DEFAULT_ZSTD_LEVEL: i32 = 3;

/// Compression type enumeration (the header's high nibble).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Compression {
    None = 0,
    Zstd = 1,
    Lz4 = 2,
}

impl Compression {
    /// Converts a nibble to a Compression type.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Compression::None),
            1 => Some(Compression::Zstd),
            2 => Some(Compression::Lz4),
            _ => None,
        }
    }

    /// Converts Compression to its nibble.
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

/// Decoded message header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireHeader {
    pub version: u8,
    pub compression: Compression,
    pub kind: VectorKind,
}

impl WireHeader {
    pub fn new(kind: VectorKind, compression: Compression) -> Self {
        Self {
            version: FORMAT_VERSION,
            compression,
            kind,
        }
    }

    /// The combined flags byte.
    pub fn flags(&self) -> u8 {
        (self.compression.to_u8() << 4) | self.kind.to_u8()
    }

    /// Encode header to bytes.
    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_slice(&WIRE_MAGIC);
        buf.put_u8(self.version);
        buf.put_u8(self.flags());
    }

    /// Decode header from bytes, advancing past it.
    ///
    /// Magic and version are checked before the flags byte is interpreted, so
    /// foreign input is always reported as `MalformedWireFormat`.
    pub fn decode(buf: &mut &[u8]) -> Result<Self> {
        if buf.len() < HEADER_SIZE {
            return Err(CodecError::MalformedWireFormat(format!(
                "message too short: {} bytes, header needs {}",
                buf.len(),
                HEADER_SIZE
            )));
        }

        let mut magic = [0u8; 4];
        buf.copy_to_slice(&mut magic);
        if magic != WIRE_MAGIC {
            return Err(CodecError::MalformedWireFormat(format!(
                "invalid magic: {:02x?}",
                magic
            )));
        }

        let version = buf.get_u8();
        if version != FORMAT_VERSION {
            return Err(CodecError::MalformedWireFormat(format!(
                "unsupported format version: {}",
                version
            )));
        }

        let flags = buf.get_u8();
        let compression = Compression::from_u8(flags >> 4).ok_or_else(|| {
            CodecError::MalformedWireFormat(format!("invalid compression flag: {}", flags >> 4))
        })?;
        let tag = flags & 0x0F;
        let kind = VectorKind::from_u8(tag).ok_or(CodecError::UnsupportedVectorType(tag))?;

        Ok(Self {
            version,
            compression,
            kind,
        })
    }
}
