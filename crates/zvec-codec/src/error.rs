//! Error types for zvec-codec operations.

use thiserror::Error;
use zvec_vector::VectorError;

/// Errors that can occur while encoding or decoding ZVEC bytes.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Bad magic, unknown version, truncated or otherwise corrupt input.
    #[error("malformed wire format: {0}")]
    MalformedWireFormat(String),

    /// The type tag names no known vector representation.
    #[error("unsupported vector type tag: {0}")]
    UnsupportedVectorType(u8),

    /// Compressor or decompressor failed.
    #[error("compression failure: {0}")]
    CompressionFailure(String),

    /// A configured size limit was exceeded.
    #[error("{what} limit exceeded: {actual} > {limit}")]
    LimitExceeded {
        what: &'static str,
        limit: usize,
        actual: usize,
    },

    /// Invalid configuration parameter.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Decoded data violates a vector invariant.
    #[error("invalid vector: {0}")]
    Vector(#[from] VectorError),
}

impl CodecError {
    pub(crate) fn truncated(what: &str, needed: usize, remaining: usize) -> Self {
        Self::MalformedWireFormat(format!(
            "truncated payload reading {}: need {} bytes, {} remaining",
            what, needed, remaining
        ))
    }
}

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
