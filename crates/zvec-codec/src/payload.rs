//! Per-type payload encoding/decoding.
//!
//! Payload layouts (before compression, big-endian):
//! ```text
//! Dense:
//!   - dimensions: i32
//!   - values: f32 × dimensions
//!
//! Sparse:
//!   - dimensions: i32
//!   - nnz: i32
//!   - entries: (index: i32, value: f32) × nnz, strictly ascending index
//!
//! Named:
//!   - metadata_len: i32
//!   - metadata:
//!     - name_count: i32
//!     - names: (byte_len: i32, utf8 bytes) × name_count
//!   - Dense payload
//!
//! Batch:
//!   - batch_size: i32
//!   - vector_dimensions: i32
//!   - Dense payload × batch_size
//! ```
//!
//! Decoding is strict: truncated input, trailing bytes, negative counts and
//! non-canonical sparse entries are all `MalformedWireFormat`. The decoder never
//! repairs input it does not expect.

use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use bytes::{Buf, BufMut, BytesMut};
use zvec_vector::{
    BatchVector, DenseVector, NamedVector, SparseVector, Vector, VectorKind, VectorModel,
};

/// Append the payload for `vector` to `buf`.
pub(crate) fn encode_payload(vector: &Vector, buf: &mut BytesMut) -> Result<()> {
    match vector {
        Vector::Dense(v) => put_dense(v.as_slice(), buf),
        Vector::Sparse(v) => put_sparse(v, buf),
        Vector::Named(v) => put_named(v, buf),
        Vector::Batch(v) => put_batch(v, buf),
    }
}

/// Exact payload size for `vector`, so the output buffer is allocated once.
pub(crate) fn payload_size(vector: &Vector) -> usize {
    match vector {
        Vector::Dense(v) => dense_size(v.dimensions()),
        Vector::Sparse(v) => 8 + 8 * v.non_zero_count(),
        Vector::Named(v) => 4 + metadata_size(v.names()) + dense_size(v.dimensions()),
        Vector::Batch(v) => 8 + v.len() * dense_size(v.vector_dimensions()),
    }
}

/// Decode a complete payload of the given kind.
pub(crate) fn decode_payload(kind: VectorKind, mut buf: &[u8], config: &CodecConfig) -> Result<Vector> {
    let vector = match kind {
        VectorKind::Dense => Vector::Dense(get_dense(&mut buf, config)?),
        VectorKind::Sparse => Vector::Sparse(get_sparse(&mut buf, config)?),
        VectorKind::Named => Vector::Named(get_named(&mut buf, config)?),
        VectorKind::Batch => Vector::Batch(get_batch(&mut buf, config)?),
    };

    if !buf.is_empty() {
        return Err(CodecError::MalformedWireFormat(format!(
            "{} trailing bytes after {} payload",
            buf.len(),
            kind
        )));
    }
    Ok(vector)
}

fn dense_size(dimensions: usize) -> usize {
    4 + 4 * dimensions
}

fn metadata_size(names: &[String]) -> usize {
    4 + names.iter().map(|n| 4 + n.len()).sum::<usize>()
}

/// Narrow a length to the wire's `i32`.
fn wire_len(what: &'static str, n: usize) -> Result<i32> {
    i32::try_from(n).map_err(|_| CodecError::LimitExceeded {
        what,
        limit: i32::MAX as usize,
        actual: n,
    })
}

fn put_dense(values: &[f32], buf: &mut BytesMut) -> Result<()> {
    buf.put_i32(wire_len("dimensions", values.len())?);
    for &val in values {
        buf.put_f32(val);
    }
    Ok(())
}

fn put_sparse(v: &SparseVector, buf: &mut BytesMut) -> Result<()> {
    buf.put_i32(wire_len("dimensions", v.dimensions())?);
    buf.put_i32(wire_len("non-zero count", v.non_zero_count())?);
    // iter() is ascending, which keeps the encoding canonical.
    for (index, value) in v.iter() {
        buf.put_i32(wire_len("sparse index", index)?);
        buf.put_f32(value);
    }
    Ok(())
}

fn put_named(v: &NamedVector, buf: &mut BytesMut) -> Result<()> {
    buf.put_i32(wire_len("metadata length", metadata_size(v.names()))?);
    buf.put_i32(wire_len("name count", v.names().len())?);
    for name in v.names() {
        buf.put_i32(wire_len("name length", name.len())?);
        buf.put_slice(name.as_bytes());
    }
    put_dense(v.values(), buf)
}

fn put_batch(v: &BatchVector, buf: &mut BytesMut) -> Result<()> {
    buf.put_i32(wire_len("batch size", v.len())?);
    buf.put_i32(wire_len("dimensions", v.vector_dimensions())?);
    for member in v {
        put_dense(member.as_slice(), buf)?;
    }
    Ok(())
}

fn ensure(buf: &[u8], what: &str, needed: usize) -> Result<()> {
    if buf.remaining() < needed {
        return Err(CodecError::truncated(what, needed, buf.remaining()));
    }
    Ok(())
}

/// Read a non-negative `i32` count.
fn get_count(buf: &mut &[u8], what: &str) -> Result<usize> {
    ensure(buf, what, 4)?;
    let n = buf.get_i32();
    if n < 0 {
        return Err(CodecError::MalformedWireFormat(format!(
            "negative {}: {}",
            what, n
        )));
    }
    Ok(n as usize)
}

fn check_limit(what: &'static str, limit: usize, actual: usize) -> Result<()> {
    if actual > limit {
        return Err(CodecError::LimitExceeded {
            what,
            limit,
            actual,
        });
    }
    Ok(())
}

fn get_dense(buf: &mut &[u8], config: &CodecConfig) -> Result<DenseVector> {
    let dimensions = get_count(buf, "dimensions")?;
    check_limit("dimensions", config.max_dimensions, dimensions)?;
    // Checked before allocating so a corrupt count cannot force a huge Vec.
    ensure(buf, "dense values", 4 * dimensions)?;

    let mut values = Vec::with_capacity(dimensions);
    for _ in 0..dimensions {
        values.push(buf.get_f32());
    }
    Ok(DenseVector::new(values)?)
}

fn get_sparse(buf: &mut &[u8], config: &CodecConfig) -> Result<SparseVector> {
    let dimensions = get_count(buf, "dimensions")?;
    check_limit("dimensions", config.max_dimensions, dimensions)?;
    let nnz = get_count(buf, "non-zero count")?;
    if nnz > dimensions {
        return Err(CodecError::MalformedWireFormat(format!(
            "sparse non-zero count {} exceeds dimensions {}",
            nnz, dimensions
        )));
    }
    ensure(buf, "sparse entries", 8 * nnz)?;

    let mut entries = Vec::with_capacity(nnz);
    let mut previous: Option<usize> = None;
    for _ in 0..nnz {
        let index = buf.get_i32();
        let value = buf.get_f32();

        if index < 0 || index as usize >= dimensions {
            return Err(CodecError::MalformedWireFormat(format!(
                "sparse index {} outside 0..{}",
                index, dimensions
            )));
        }
        let index = index as usize;
        if previous.is_some_and(|p| index <= p) {
            return Err(CodecError::MalformedWireFormat(format!(
                "sparse indices not strictly ascending at {}",
                index
            )));
        }
        if value == 0.0 || value.is_nan() {
            return Err(CodecError::MalformedWireFormat(format!(
                "sparse entry {} stores {}",
                index, value
            )));
        }

        previous = Some(index);
        entries.push((index, value));
    }

    Ok(SparseVector::new(dimensions, entries)?)
}

fn get_named(buf: &mut &[u8], config: &CodecConfig) -> Result<NamedVector> {
    let metadata_len = get_count(buf, "metadata length")?;
    ensure(buf, "metadata", metadata_len)?;
    let (mut metadata, rest) = buf.split_at(metadata_len);
    *buf = rest;

    let count = get_count(&mut metadata, "name count")?;
    check_limit("dimensions", config.max_dimensions, count)?;
    // Every name needs at least its length prefix.
    ensure(metadata, "names", 4 * count)?;

    let mut names = Vec::with_capacity(count);
    for _ in 0..count {
        let len = get_count(&mut metadata, "name length")?;
        ensure(metadata, "name bytes", len)?;
        let (bytes, rest) = metadata.split_at(len);
        let name = std::str::from_utf8(bytes).map_err(|e| {
            CodecError::MalformedWireFormat(format!("invalid UTF-8 in name: {}", e))
        })?;
        names.push(name.to_string());
        metadata = rest;
    }

    if !metadata.is_empty() {
        return Err(CodecError::MalformedWireFormat(format!(
            "{} unused metadata bytes",
            metadata.len()
        )));
    }

    let dense = get_dense(buf, config)?;
    Ok(NamedVector::new(names, dense)?)
}

fn get_batch(buf: &mut &[u8], config: &CodecConfig) -> Result<BatchVector> {
    let batch_size = get_count(buf, "batch size")?;
    check_limit("batch size", config.max_batch_size, batch_size)?;
    let vector_dimensions = get_count(buf, "dimensions")?;
    check_limit("dimensions", config.max_dimensions, vector_dimensions)?;

    if batch_size == 0 {
        return Err(CodecError::MalformedWireFormat("empty batch".to_string()));
    }
    ensure(buf, "batch members", batch_size * dense_size(vector_dimensions))?;

    let mut members = Vec::with_capacity(batch_size);
    for i in 0..batch_size {
        let member = get_dense(buf, config)?;
        if member.dimensions() != vector_dimensions {
            return Err(CodecError::MalformedWireFormat(format!(
                "batch member {} has {} dimensions, header says {}",
                i,
                member.dimensions(),
                vector_dimensions
            )));
        }
        members.push(member);
    }

    Ok(BatchVector::new(members)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zvec_vector::VectorError;

    fn encode(v: &Vector) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_payload(v, &mut buf).unwrap();
        assert_eq!(buf.len(), payload_size(v));
        buf.to_vec()
    }

    fn decode(kind: VectorKind, bytes: &[u8]) -> Result<Vector> {
        decode_payload(kind, bytes, &CodecConfig::default())
    }

    #[test]
    fn test_dense_layout() {
        let v = Vector::Dense(DenseVector::new(vec![0.5, -1.25, 3.0]).unwrap());
        let bytes = encode(&v);

        let mut expected = vec![0, 0, 0, 3];
        for f in [0.5f32, -1.25, 3.0] {
            expected.extend_from_slice(&f.to_be_bytes());
        }
        assert_eq!(bytes, expected);
        assert_eq!(decode(VectorKind::Dense, &bytes).unwrap(), v);
    }

    #[test]
    fn test_sparse_layout_is_ascending() {
        let v = Vector::Sparse(SparseVector::new(5, [(4, -1.0), (2, 4.0)]).unwrap());
        let bytes = encode(&v);

        let mut expected = vec![0, 0, 0, 5, 0, 0, 0, 2];
        expected.extend_from_slice(&2i32.to_be_bytes());
        expected.extend_from_slice(&4.0f32.to_be_bytes());
        expected.extend_from_slice(&4i32.to_be_bytes());
        expected.extend_from_slice(&(-1.0f32).to_be_bytes());
        assert_eq!(bytes, expected);

        let decoded = decode(VectorKind::Sparse, &bytes).unwrap();
        assert_eq!(decoded, v);
    }

    #[test]
    fn test_named_roundtrip() {
        let v = Vector::Named(
            NamedVector::from_pairs([("alpha", 1.0), ("βeta", 2.0), ("c", 0.0)]).unwrap(),
        );
        let bytes = encode(&v);
        // metadata_len = 4 (count) + (4+5) + (4+5) + (4+1)
        assert_eq!(&bytes[..4], &27i32.to_be_bytes());
        assert_eq!(decode(VectorKind::Named, &bytes).unwrap(), v);
    }

    #[test]
    fn test_batch_roundtrip() {
        let v = Vector::Batch(
            BatchVector::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap(),
        );
        let bytes = encode(&v);
        assert_eq!(&bytes[..8], &[0, 0, 0, 3, 0, 0, 0, 2]);
        assert_eq!(decode(VectorKind::Batch, &bytes).unwrap(), v);
    }

    #[test]
    fn test_truncated_payloads() {
        let v = Vector::Batch(BatchVector::from_rows(vec![vec![1.0, 2.0]; 3]).unwrap());
        let bytes = encode(&v);
        for cut in 0..bytes.len() {
            let err = decode(VectorKind::Batch, &bytes[..cut]).unwrap_err();
            assert!(
                matches!(err, CodecError::MalformedWireFormat(_)),
                "cut at {} gave {}",
                cut,
                err
            );
        }
    }

    #[test]
    fn test_trailing_bytes() {
        let v = Vector::Dense(DenseVector::new(vec![1.0]).unwrap());
        let mut bytes = encode(&v);
        bytes.push(0);
        assert!(matches!(
            decode(VectorKind::Dense, &bytes),
            Err(CodecError::MalformedWireFormat(_))
        ));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let bytes = 0i32.to_be_bytes();
        assert!(matches!(
            decode(VectorKind::Dense, &bytes),
            Err(CodecError::Vector(VectorError::InvalidDimension { .. }))
        ));
    }

    #[test]
    fn test_negative_count_rejected() {
        let bytes = (-3i32).to_be_bytes();
        assert!(matches!(
            decode(VectorKind::Dense, &bytes),
            Err(CodecError::MalformedWireFormat(_))
        ));
    }

    fn sparse_bytes(dims: i32, entries: &[(i32, f32)]) -> Vec<u8> {
        let mut b = Vec::new();
        b.extend_from_slice(&dims.to_be_bytes());
        b.extend_from_slice(&(entries.len() as i32).to_be_bytes());
        for &(i, v) in entries {
            b.extend_from_slice(&i.to_be_bytes());
            b.extend_from_slice(&v.to_be_bytes());
        }
        b
    }

    #[test]
    fn test_non_canonical_sparse_rejected() {
        let cases = [
            sparse_bytes(5, &[(3, 1.0), (1, 2.0)]), // descending
            sparse_bytes(5, &[(1, 1.0), (1, 2.0)]), // duplicate
            sparse_bytes(5, &[(1, 0.0)]),           // explicit zero
            sparse_bytes(5, &[(1, f32::NAN)]),      // NaN
            sparse_bytes(5, &[(5, 1.0)]),           // out of range
            sparse_bytes(5, &[(-1, 1.0)]),          // negative
            sparse_bytes(1, &[(0, 1.0), (0, 1.0)]), // nnz > dims
        ];
        for (i, bytes) in cases.iter().enumerate() {
            assert!(
                matches!(
                    decode(VectorKind::Sparse, bytes),
                    Err(CodecError::MalformedWireFormat(_))
                ),
                "case {}",
                i
            );
        }
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut b = Vec::new();
        let metadata_len = 4 + (4 + 1) * 2;
        b.extend_from_slice(&(metadata_len as i32).to_be_bytes());
        b.extend_from_slice(&2i32.to_be_bytes());
        for _ in 0..2 {
            b.extend_from_slice(&1i32.to_be_bytes());
            b.push(b'x');
        }
        b.extend_from_slice(&2i32.to_be_bytes());
        b.extend_from_slice(&1.0f32.to_be_bytes());
        b.extend_from_slice(&2.0f32.to_be_bytes());

        assert!(matches!(
            decode(VectorKind::Named, &b),
            Err(CodecError::Vector(VectorError::DuplicateOrInvalidName(_)))
        ));
    }

    #[test]
    fn test_batch_member_mismatch_rejected() {
        let mut b = Vec::new();
        b.extend_from_slice(&1i32.to_be_bytes());
        b.extend_from_slice(&2i32.to_be_bytes());
        b.extend_from_slice(&1i32.to_be_bytes());
        b.extend_from_slice(&1.0f32.to_be_bytes());
        // pad to satisfy the up-front size check
        b.extend_from_slice(&[0; 4]);

        assert!(matches!(
            decode(VectorKind::Batch, &b),
            Err(CodecError::MalformedWireFormat(_))
        ));
    }

    #[test]
    fn test_limits_enforced() {
        let config = CodecConfig {
            max_dimensions: 2,
            ..CodecConfig::default()
        };
        let v = Vector::Dense(DenseVector::new(vec![1.0, 2.0, 3.0]).unwrap());
        let bytes = encode(&v);
        assert!(matches!(
            decode_payload(VectorKind::Dense, &bytes, &config),
            Err(CodecError::LimitExceeded {
                what: "dimensions",
                limit: 2,
                actual: 3
            })
        ));
    }
}
