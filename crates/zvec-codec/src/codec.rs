//! Encode/decode entry points.

use crate::compress::{compress, decompress, CompressFn};
use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::format::{Compression, WireHeader, HEADER_SIZE};
use crate::payload::{decode_payload, encode_payload, payload_size};
use bytes::{Bytes, BytesMut};
use std::any::TypeId;
use std::borrow::Cow;
use std::sync::Arc;
use zvec_observe::{obs_count, obs_hist, CodecEvt, CodecKind, Meter, NoopMeter, VizEvent};
use zvec_vector::{
    BatchVector, DenseVector, NamedVector, SparseVector, Vector, VectorKind, VectorModel,
};

/// Encode `vector` with the default configuration.
pub fn encode(vector: &Vector) -> Result<Bytes> {
    encode_with(vector, &CodecConfig::default())
}

/// Encode `vector` with an explicit configuration.
///
/// Compression failure is never returned: the message goes out uncompressed
/// and a warning is logged.
pub fn encode_with(vector: &Vector, config: &CodecConfig) -> Result<Bytes> {
    config.validate()?;
    encode_inner(vector, config, compress).map(|e| e.bytes)
}

/// Decode a message with the default configuration.
pub fn decode(bytes: &[u8]) -> Result<Vector> {
    decode_with(bytes, &CodecConfig::default())
}

/// Decode a message with an explicit configuration.
pub fn decode_with(bytes: &[u8], config: &CodecConfig) -> Result<Vector> {
    config.validate()?;
    decode_inner(bytes, config)
}

/// Parse and validate only the header of `bytes`.
pub fn peek_header(bytes: &[u8]) -> Result<WireHeader> {
    let mut slice = bytes;
    WireHeader::decode(&mut slice)
}

/// True for the types this codec can produce and consume.
pub fn supports(type_id: TypeId) -> bool {
    type_id == TypeId::of::<DenseVector>()
        || type_id == TypeId::of::<SparseVector>()
        || type_id == TypeId::of::<NamedVector>()
        || type_id == TypeId::of::<BatchVector>()
        || type_id == TypeId::of::<Vector>()
}

/// [`supports`] for a static type.
pub fn supports_kind<T: 'static>() -> bool {
    supports(TypeId::of::<T>())
}

/// Encoded message plus what happened while producing it.
struct Encoded {
    bytes: Bytes,
    payload_bytes: usize,
    compressed: bool,
    fell_back: bool,
}

fn check_limits(vector: &Vector, config: &CodecConfig) -> Result<()> {
    let dimensions = match vector {
        Vector::Batch(b) => {
            if b.len() > config.max_batch_size {
                return Err(CodecError::LimitExceeded {
                    what: "batch size",
                    limit: config.max_batch_size,
                    actual: b.len(),
                });
            }
            b.vector_dimensions()
        }
        other => other.dimensions(),
    };
    if dimensions > config.max_dimensions {
        return Err(CodecError::LimitExceeded {
            what: "dimensions",
            limit: config.max_dimensions,
            actual: dimensions,
        });
    }
    Ok(())
}

fn encode_inner(vector: &Vector, config: &CodecConfig, compressor: CompressFn) -> Result<Encoded> {
    check_limits(vector, config)?;

    let kind = vector.kind();
    let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload_size(vector));
    WireHeader::new(kind, Compression::None).encode(&mut buf);
    encode_payload(vector, &mut buf)?;

    let payload_bytes = buf.len() - HEADER_SIZE;
    let mut compressed = false;
    let mut fell_back = false;

    if config.compression != Compression::None && payload_bytes > config.compression_threshold {
        match compressor(&buf[HEADER_SIZE..], config.compression, config.zstd_level) {
            Ok(packed) if packed.len() < payload_bytes => {
                buf.truncate(HEADER_SIZE);
                buf[HEADER_SIZE - 1] = WireHeader::new(kind, config.compression).flags();
                buf.extend_from_slice(&packed);
                compressed = true;
            }
            Ok(packed) => {
                tracing::trace!(
                    kind = %kind,
                    payload_bytes,
                    packed_bytes = packed.len(),
                    "compression did not shrink payload, sending uncompressed"
                );
            }
            Err(e) => {
                tracing::warn!(
                    kind = %kind,
                    payload_bytes,
                    error = %e,
                    "compression failed, sending uncompressed"
                );
                fell_back = true;
            }
        }
    }

    tracing::debug!(
        kind = %kind,
        payload_bytes,
        wire_bytes = buf.len(),
        compressed,
        "encoded vector"
    );

    Ok(Encoded {
        bytes: buf.freeze(),
        payload_bytes,
        compressed,
        fell_back,
    })
}

fn decode_inner(bytes: &[u8], config: &CodecConfig) -> Result<Vector> {
    let mut rest = bytes;
    let header = WireHeader::decode(&mut rest)?;

    let payload: Cow<'_, [u8]> = match header.compression {
        Compression::None => Cow::Borrowed(rest),
        algo => Cow::Owned(decompress(rest, algo, config.max_decompressed_bytes)?),
    };

    tracing::trace!(
        kind = %header.kind,
        compression = ?header.compression,
        wire_bytes = bytes.len(),
        payload_bytes = payload.len(),
        "decoding vector"
    );

    decode_payload(header.kind, &payload, config)
}

fn kind_labels(kind: VectorKind) -> &'static [(&'static str, &'static str)] {
    match kind {
        VectorKind::Dense => &[("kind", "dense")],
        VectorKind::Sparse => &[("kind", "sparse")],
        VectorKind::Named => &[("kind", "named")],
        VectorKind::Batch => &[("kind", "batch")],
    }
}

/// A configured codec that reports to a [`Meter`].
///
/// The free functions cover most uses; this type is for callers that want a
/// validated config held once and metrics for every message.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use zvec_codec::{CodecConfig, WireCodec};
/// use zvec_observe::NoopMeter;
/// use zvec_vector::{DenseVector, Vector};
///
/// let codec = WireCodec::with_meter(CodecConfig::default(), Arc::new(NoopMeter)).unwrap();
/// let v = Vector::Dense(DenseVector::new(vec![1.0, 2.0]).unwrap());
/// let bytes = codec.encode(&v).unwrap();
/// assert_eq!(codec.decode(&bytes).unwrap(), v);
/// ```
pub struct WireCodec {
    config: CodecConfig,
    meter: Arc<dyn Meter>,
    compressor: CompressFn,
}

impl WireCodec {
    /// Create a codec with a noop meter.
    pub fn new(config: CodecConfig) -> Result<Self> {
        Self::with_meter(config, Arc::new(NoopMeter))
    }

    /// Create a codec reporting to `meter`.
    pub fn with_meter(config: CodecConfig, meter: Arc<dyn Meter>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            meter,
            compressor: compress,
        })
    }

    #[cfg(test)]
    fn with_compressor(mut self, compressor: CompressFn) -> Self {
        self.compressor = compressor;
        self
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn encode(&self, vector: &Vector) -> Result<Bytes> {
        let kind = vector.kind();
        let encoded = match encode_inner(vector, &self.config, self.compressor) {
            Ok(encoded) => encoded,
            Err(e) => {
                self.emit(kind.to_u8(), CodecKind::Rejected);
                return Err(e);
            }
        };

        let labels = kind_labels(kind);
        obs_count!(self.meter, "zvec_encode_bytes", labels, encoded.bytes.len());
        obs_hist!(self.meter, "zvec_encode_wire_bytes", labels, encoded.bytes.len());
        if encoded.fell_back {
            obs_count!(self.meter, "zvec_compression_fallbacks", labels, 1);
            self.emit(kind.to_u8(), CodecKind::CompressionFallback);
        }
        self.emit(
            kind.to_u8(),
            CodecKind::Encoded {
                payload_bytes: encoded.payload_bytes,
                wire_bytes: encoded.bytes.len(),
                compressed: encoded.compressed,
            },
        );

        Ok(encoded.bytes)
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<Vector> {
        match decode_inner(bytes, &self.config) {
            Ok(vector) => {
                let kind = vector.kind();
                obs_count!(self.meter, "zvec_decode_bytes", kind_labels(kind), bytes.len());
                self.emit(
                    kind.to_u8(),
                    CodecKind::Decoded {
                        wire_bytes: bytes.len(),
                    },
                );
                Ok(vector)
            }
            Err(e) => {
                tracing::debug!(error = %e, wire_bytes = bytes.len(), "rejected message");
                obs_count!(self.meter, "zvec_decode_rejects", &[], 1);
                // Only trust the tag once magic, version and flags have parsed.
                let tag = peek_header(bytes).map_or(0, |h| h.kind.to_u8());
                self.emit(tag, CodecKind::Rejected);
                Err(e)
            }
        }
    }

    fn emit(&self, type_tag: u8, kind: CodecKind) {
        self.meter
            .emit(VizEvent::Codec(CodecEvt { type_tag, kind }));
    }
}

impl Default for WireCodec {
    fn default() -> Self {
        Self {
            config: CodecConfig::default(),
            meter: Arc::new(NoopMeter),
            compressor: compress,
        }
    }
}

impl std::fmt::Debug for WireCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WireCodec")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
