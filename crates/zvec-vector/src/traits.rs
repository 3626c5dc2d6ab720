//! Core capability trait shared by every vector type.
//!
//! The `VectorModel` trait defines the common interface implemented by
//! `DenseVector`, `SparseVector`, `NamedVector`, `BatchVector` and the `Vector`
//! sum type, so similarity can be computed across representations.

use crate::distance;
use crate::sparse::SparseVector;
use crate::{check_same_dimensions, Result, VectorError};

/// Common interface for vector values.
///
/// Binary operations take `&dyn VectorModel` so a dense vector can be compared
/// against a sparse one without materializing both sides. The two hook methods
/// (`as_dense_slice`, `as_sparse`) let implementations pick a fast path; the
/// fallback is a full dense expansion through `to_array`.
///
/// # Thread Safety
///
/// Implementations are immutable values and must be `Send + Sync`.
pub trait VectorModel: Send + Sync {
    /// Number of dimensions (always > 0).
    fn dimensions(&self) -> usize;

    /// Fully materialized dense copy of the values, `dimensions()` long.
    fn to_array(&self) -> Vec<f32>;

    /// L2 norm.
    fn norm(&self) -> f64;

    /// L1 norm.
    fn norm_l1(&self) -> f64;

    /// True when every component is zero.
    fn is_zero(&self) -> bool {
        self.norm() == 0.0
    }

    /// Borrow the values when they are stored contiguously.
    fn as_dense_slice(&self) -> Option<&[f32]> {
        None
    }

    /// Downcast hook for the sparse fast path.
    fn as_sparse(&self) -> Option<&SparseVector> {
        None
    }

    /// Dot product with another vector of the same dimensionality.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` when the dimensions differ.
    fn dot_product(&self, other: &dyn VectorModel) -> Result<f32> {
        check_same_dimensions("dot_product", self.dimensions(), other.dimensions())?;

        // A sparse operand only needs its own non-zero positions visited.
        if let Some(sparse) = other.as_sparse() {
            return Ok(match self.as_dense_slice() {
                Some(values) => sparse.dot_dense(values),
                None => sparse.dot_dense(&self.to_array()),
            });
        }

        Ok(match (self.as_dense_slice(), other.as_dense_slice()) {
            (Some(a), Some(b)) => distance::inner_product(a, b),
            (Some(a), None) => distance::inner_product(a, &other.to_array()),
            (None, Some(b)) => distance::inner_product(&self.to_array(), b),
            (None, None) => distance::inner_product(&self.to_array(), &other.to_array()),
        })
    }

    /// Cosine similarity in [-1, 1].
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` when the dimensions differ
    /// - `DegenerateVector` when either operand has a norm of exactly zero
    fn cosine_similarity(&self, other: &dyn VectorModel) -> Result<f64> {
        const OP: &str = "cosine_similarity";
        check_same_dimensions(OP, self.dimensions(), other.dimensions())?;

        if let (Some(a), Some(b)) = (self.as_dense_slice(), other.as_dense_slice()) {
            return distance::cosine_similarity(a, b)
                .ok_or(VectorError::DegenerateVector { op: OP });
        }

        let (norm_a, norm_b) = (self.norm(), other.norm());
        if norm_a == 0.0 || norm_b == 0.0 {
            return Err(VectorError::DegenerateVector { op: OP });
        }

        let dot = self.dot_product(other)? as f64;
        Ok((dot / (norm_a * norm_b)).clamp(-1.0, 1.0))
    }
}
