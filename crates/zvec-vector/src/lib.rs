//! Typed vector model for zvec.
//!
//! This crate provides the value types that travel over the ZVEC wire format
//! and feed the batch analytics engine:
//!
//! - **DenseVector**: every position materialized as an `f32`
//! - **SparseVector**: declared dimension count plus non-zero `(index, value)` pairs
//! - **NamedVector**: a dense vector with one unique feature name per dimension
//! - **BatchVector**: a non-empty run of equal-dimension dense vectors
//!
//! All four implement [`VectorModel`] and are unified by the [`Vector`] sum type,
//! whose discriminant ([`VectorKind`]) is the wire type tag.
//!
//! # Architecture
//!
//! ```text
//! application value
//!      ↓ build
//! zvec-vector:  DenseVector | SparseVector | NamedVector | BatchVector  <-- This crate
//!      ↓ encode                                  ↓ analyze
//! zvec-codec:   "ZVEC" bytes               zvec-batch: BatchEngine
//! ```
//!
//! Every type is an immutable value: operations that look like mutation return a
//! new instance and leave the receiver untouched.
//!
//! # Example
//!
//! ```
//! use zvec_vector::{DenseVector, SparseVector, VectorModel};
//!
//! let dense = DenseVector::new(vec![0.0, 0.0, 4.0, 0.0, -1.0]).unwrap();
//! let sparse = SparseVector::new(5, [(2, 4.0), (4, -1.0)]).unwrap();
//!
//! assert_eq!(sparse.to_array(), dense.to_array());
//! assert_eq!(sparse.non_zero_count(), 2);
//! assert!((dense.cosine_similarity(&sparse).unwrap() - 1.0).abs() < 1e-9);
//! ```

mod batch;
mod dense;
pub mod distance;
mod named;
mod pool;
mod sparse;
mod traits;
mod vector;

pub use batch::BatchVector;
pub use dense::DenseVector;
pub use distance::{euclidean_distance, inner_product, l1_norm, l2_norm};
pub use named::NamedVector;
pub use pool::{ScratchBuffer, ScratchPool, DEFAULT_POOL_CAPACITY};
pub use sparse::SparseVector;
pub use traits::VectorModel;
pub use vector::{Vector, VectorKind};

/// Error type for vector operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VectorError {
    #[error("invalid dimension in {op}: {dimensions} (must be > 0)")]
    InvalidDimension { op: &'static str, dimensions: usize },

    #[error("dimension mismatch in {op}: {expected} vs {actual}")]
    DimensionMismatch {
        op: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate or invalid feature name: {0}")]
    DuplicateOrInvalidName(String),

    #[error("index out of range in {op}: {index} (dimensions {dimensions})")]
    IndexOutOfRange {
        op: &'static str,
        index: usize,
        dimensions: usize,
    },

    #[error("degenerate vector in {op}: norm is zero")]
    DegenerateVector { op: &'static str },

    #[error("empty batch in {op}")]
    EmptyBatch { op: &'static str },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl VectorError {
    pub(crate) fn mismatch(op: &'static str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            op,
            expected,
            actual,
        }
    }
}

/// Result type for vector operations.
pub type Result<T> = std::result::Result<T, VectorError>;

/// Fails with `InvalidDimension` unless `dimensions > 0`.
#[inline]
pub(crate) fn check_dimensions(op: &'static str, dimensions: usize) -> Result<()> {
    if dimensions == 0 {
        return Err(VectorError::InvalidDimension { op, dimensions });
    }
    Ok(())
}

#[inline]
pub(crate) fn check_same_dimensions(op: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(VectorError::mismatch(op, expected, actual));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_context() {
        let err = VectorError::mismatch("dot_product", 128, 256);
        assert_eq!(err.to_string(), "dimension mismatch in dot_product: 128 vs 256");

        let err = VectorError::InvalidDimension {
            op: "DenseVector::new",
            dimensions: 0,
        };
        assert!(err.to_string().contains("DenseVector::new"));
    }
}
