//! ZVEC binary wire format for zvec vectors.
//!
//! Every message is self-describing: a fixed header names the format version,
//! the compression applied to the payload and the vector type, so a receiver
//! needs no out-of-band schema.
//!
//! # Message Layout
//!
//! ```text
//! ┌──────────────┬─────────┬───────────────────────┬──────────────────────┐
//! │ magic "ZVEC" │ version │ flags                 │ payload              │
//! │ 4 bytes      │ 1 byte  │ hi: compression       │ type-specific,       │
//! │              │         │ lo: type tag          │ maybe compressed     │
//! └──────────────┴─────────┴───────────────────────┴──────────────────────┘
//! ```
//!
//! # Features
//!
//! - **Deterministic**: the same vector and config always produce the same bytes
//! - **Compression**: zstd (default) or LZ4 above a size threshold, kept only
//!   when it actually shrinks the payload
//! - **Strict decoding**: truncated, trailing or non-canonical input is rejected
//! - **Bounded**: dimension, batch and decompression limits guard allocations
//! - **Observability**: vendor-neutral metrics via `zvec-observe::Meter` on [`WireCodec`]
//!
//! # Example
//!
//! ```
//! use zvec_codec::{decode, encode, peek_header, FORMAT_VERSION};
//! use zvec_vector::{DenseVector, Vector, VectorKind};
//!
//! let v = Vector::Dense(DenseVector::new(vec![0.5, -1.25, 3.0]).unwrap());
//! let bytes = encode(&v).unwrap();
//!
//! let header = peek_header(&bytes).unwrap();
//! assert_eq!(header.version, FORMAT_VERSION);
//! assert_eq!(header.kind, VectorKind::Dense);
//! assert_eq!(decode(&bytes).unwrap(), v);
//! ```

mod codec;
pub mod compress;
mod config;
mod error;
pub mod format;
mod payload;

pub use codec::{
    decode, decode_with, encode, encode_with, peek_header, supports, supports_kind, WireCodec,
};
pub use config::CodecConfig;
pub use error::{CodecError, Result};
pub use format::{Compression, WireHeader, FORMAT_VERSION, HEADER_SIZE, WIRE_MAGIC};
