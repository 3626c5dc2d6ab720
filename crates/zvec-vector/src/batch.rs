//! Batches of equal-dimension dense vectors.

use crate::dense::DenseVector;
use crate::traits::VectorModel;
use crate::{Result, VectorError};

/// Non-empty ordered collection of dense vectors sharing one dimensionality.
///
/// Validation happens in the constructor, so a malformed batch can never reach
/// the codec or the batch engine.
///
/// As a [`VectorModel`] a batch behaves like the row-major concatenation of
/// its members: `dimensions()` is `len() * vector_dimensions()`.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchVector {
    vectors: Vec<DenseVector>,
    vector_dimensions: usize,
}

impl BatchVector {
    /// Create a batch from its members.
    ///
    /// # Errors
    ///
    /// - `EmptyBatch` if `vectors` is empty
    /// - `DimensionMismatch` if any member differs from the first one
    ///
    /// # Example
    ///
    /// ```
    /// use zvec_vector::{BatchVector, DenseVector};
    ///
    /// let batch = BatchVector::new(vec![
    ///     DenseVector::new(vec![1.0, 1.0, 1.0]).unwrap(),
    ///     DenseVector::new(vec![3.0, 3.0, 3.0]).unwrap(),
    /// ])
    /// .unwrap();
    /// assert_eq!(batch.len(), 2);
    /// assert_eq!(batch.vector_dimensions(), 3);
    /// ```
    pub fn new(vectors: Vec<DenseVector>) -> Result<Self> {
        let first = vectors.first().ok_or(VectorError::EmptyBatch {
            op: "BatchVector::new",
        })?;
        let vector_dimensions = first.dimensions();

        if let Some(bad) = vectors
            .iter()
            .find(|v| v.dimensions() != vector_dimensions)
        {
            return Err(VectorError::mismatch(
                "BatchVector::new",
                vector_dimensions,
                bad.dimensions(),
            ));
        }

        Ok(Self {
            vectors,
            vector_dimensions,
        })
    }

    /// Build from raw rows.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let vectors = rows
            .into_iter()
            .map(DenseVector::new)
            .collect::<Result<Vec<_>>>()?;
        Self::new(vectors)
    }

    /// Number of member vectors (always >= 1).
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Dimensionality shared by every member.
    pub fn vector_dimensions(&self) -> usize {
        self.vector_dimensions
    }

    pub fn vectors(&self) -> &[DenseVector] {
        &self.vectors
    }

    pub fn get(&self, index: usize) -> Option<&DenseVector> {
        self.vectors.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DenseVector> {
        self.vectors.iter()
    }

    pub fn into_vectors(self) -> Vec<DenseVector> {
        self.vectors
    }
}

impl VectorModel for BatchVector {
    fn dimensions(&self) -> usize {
        self.vectors.len() * self.vector_dimensions
    }

    fn to_array(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.dimensions());
        for v in &self.vectors {
            out.extend_from_slice(v.as_slice());
        }
        out
    }

    fn norm(&self) -> f64 {
        self.vectors
            .iter()
            .map(|v| {
                let n = v.norm();
                n * n
            })
            .sum::<f64>()
            .sqrt()
    }

    fn norm_l1(&self) -> f64 {
        self.vectors.iter().map(|v| v.norm_l1()).sum()
    }

    fn is_zero(&self) -> bool {
        self.vectors.iter().all(|v| v.is_zero())
    }
}

impl<'a> IntoIterator for &'a BatchVector {
    type Item = &'a DenseVector;
    type IntoIter = std::slice::Iter<'a, DenseVector>;

    fn into_iter(self) -> Self::IntoIter {
        self.vectors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dense(values: &[f32]) -> DenseVector {
        DenseVector::from_slice(values).unwrap()
    }

    #[test]
    fn test_empty_batch_rejected() {
        assert!(matches!(
            BatchVector::new(vec![]),
            Err(VectorError::EmptyBatch { .. })
        ));
    }

    #[test]
    fn test_mismatched_batch_rejected() {
        let err = BatchVector::new(vec![dense(&[1.0, 2.0]), dense(&[1.0, 2.0, 3.0])]).unwrap_err();
        assert_eq!(
            err,
            VectorError::DimensionMismatch {
                op: "BatchVector::new",
                expected: 2,
                actual: 3,
            }
        );
    }

    #[test]
    fn test_from_rows() {
        let batch = BatchVector::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(batch.len(), 2);
        assert!(!batch.is_empty());
        assert_eq!(batch.get(1).unwrap().as_slice(), &[3.0, 4.0]);
        assert!(batch.get(2).is_none());

        assert!(BatchVector::from_rows(vec![vec![]]).is_err());
    }

    #[test]
    fn test_flattened_view() {
        let batch = BatchVector::new(vec![dense(&[3.0, 0.0]), dense(&[0.0, 4.0])]).unwrap();
        assert_eq!(batch.dimensions(), 4);
        assert_eq!(batch.to_array(), vec![3.0, 0.0, 0.0, 4.0]);
        assert!((batch.norm() - 5.0).abs() < 1e-12);
        assert!((batch.norm_l1() - 7.0).abs() < 1e-12);
        assert!(!batch.is_zero());

        let other = BatchVector::new(vec![dense(&[1.0, 1.0]), dense(&[1.0, 1.0])]).unwrap();
        assert!((batch.dot_product(&other).unwrap() - 7.0).abs() < 1e-6);
    }
}
