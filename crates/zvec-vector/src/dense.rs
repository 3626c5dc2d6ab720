//! Dense vectors: every dimension materialized.

use crate::distance;
use crate::sparse::SparseVector;
use crate::traits::VectorModel;
use crate::{check_dimensions, check_same_dimensions, Result, VectorError};
use serde::{Deserialize, Serialize};

/// Ordered sequence of `f32` values, at least one long.
///
/// The values are owned; nothing outside the vector can mutate them. Use
/// [`as_slice`](Self::as_slice) to borrow and [`into_vec`](Self::into_vec) to take
/// the storage back.
///
/// NaN components are accepted. Equality treats any NaN as equal to any other
/// NaN so that a decoded vector compares equal to the one that was encoded;
/// every other component compares with `==`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<f32>", into = "Vec<f32>")]
pub struct DenseVector {
    values: Vec<f32>,
}

impl DenseVector {
    /// Create a dense vector from owned values.
    ///
    /// # Errors
    ///
    /// `InvalidDimension` if `values` is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use zvec_vector::{DenseVector, VectorModel};
    ///
    /// let v = DenseVector::new(vec![3.0, 4.0]).unwrap();
    /// assert_eq!(v.dimensions(), 2);
    /// assert!((v.norm() - 5.0).abs() < 1e-12);
    /// ```
    pub fn new(values: Vec<f32>) -> Result<Self> {
        check_dimensions("DenseVector::new", values.len())?;
        Ok(Self { values })
    }

    /// Copy values out of a borrowed slice.
    pub fn from_slice(values: &[f32]) -> Result<Self> {
        Self::new(values.to_vec())
    }

    /// All-zero vector.
    pub fn zeros(dimensions: usize) -> Result<Self> {
        Self::filled(dimensions, 0.0)
    }

    /// Vector with every component set to `value`.
    pub fn filled(dimensions: usize, value: f32) -> Result<Self> {
        check_dimensions("DenseVector::filled", dimensions)?;
        Ok(Self {
            values: vec![value; dimensions],
        })
    }

    /// Component at `index`.
    pub fn get(&self, index: usize) -> Result<f32> {
        self.values
            .get(index)
            .copied()
            .ok_or(VectorError::IndexOutOfRange {
                op: "DenseVector::get",
                index,
                dimensions: self.values.len(),
            })
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f32> {
        self.values.iter()
    }

    /// Element-wise sum.
    pub fn add(&self, other: &DenseVector) -> Result<Self> {
        self.zip_with("DenseVector::add", other, |a, b| a + b)
    }

    /// Element-wise difference.
    pub fn subtract(&self, other: &DenseVector) -> Result<Self> {
        self.zip_with("DenseVector::subtract", other, |a, b| a - b)
    }

    /// Element-wise (Hadamard) product.
    pub fn hadamard(&self, other: &DenseVector) -> Result<Self> {
        self.zip_with("DenseVector::hadamard", other, |a, b| a * b)
    }

    /// Scalar multiplication.
    pub fn multiply(&self, scalar: f32) -> Self {
        Self {
            values: self.values.iter().map(|v| v * scalar).collect(),
        }
    }

    /// Unit-length copy of this vector.
    ///
    /// # Errors
    ///
    /// `DegenerateVector` if the norm is zero.
    pub fn normalize(&self) -> Result<Self> {
        let norm = self.norm();
        if norm == 0.0 {
            return Err(VectorError::DegenerateVector {
                op: "DenseVector::normalize",
            });
        }
        Ok(self.scaled_by_inverse(norm))
    }

    /// Euclidean distance to another vector.
    pub fn euclidean_distance(&self, other: &DenseVector) -> Result<f64> {
        check_same_dimensions(
            "euclidean_distance",
            self.values.len(),
            other.values.len(),
        )?;
        Ok(distance::euclidean_distance(&self.values, &other.values))
    }

    /// Sparse copy keeping only the non-zero (and non-NaN) components.
    pub fn to_sparse(&self) -> SparseVector {
        SparseVector::from_dense(self)
    }

    /// Wrap values already known to be non-empty.
    pub(crate) fn from_values(values: Vec<f32>) -> Self {
        debug_assert!(!values.is_empty());
        Self { values }
    }

    pub(crate) fn scaled_by_inverse(&self, norm: f64) -> Self {
        Self {
            values: self
                .values
                .iter()
                .map(|&v| (v as f64 / norm) as f32)
                .collect(),
        }
    }

    fn zip_with(
        &self,
        op: &'static str,
        other: &DenseVector,
        f: impl Fn(f32, f32) -> f32,
    ) -> Result<Self> {
        check_same_dimensions(op, self.values.len(), other.values.len())?;
        Ok(Self {
            values: self
                .values
                .iter()
                .zip(&other.values)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }
}

impl PartialEq for DenseVector {
    fn eq(&self, other: &Self) -> bool {
        self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(&a, &b)| a == b || (a.is_nan() && b.is_nan()))
    }
}

impl VectorModel for DenseVector {
    fn dimensions(&self) -> usize {
        self.values.len()
    }

    fn to_array(&self) -> Vec<f32> {
        self.values.clone()
    }

    fn norm(&self) -> f64 {
        distance::l2_norm(&self.values)
    }

    fn norm_l1(&self) -> f64 {
        distance::l1_norm(&self.values)
    }

    fn is_zero(&self) -> bool {
        self.values.iter().all(|&v| v == 0.0)
    }

    fn as_dense_slice(&self) -> Option<&[f32]> {
        Some(&self.values)
    }
}

impl TryFrom<Vec<f32>> for DenseVector {
    type Error = VectorError;

    fn try_from(values: Vec<f32>) -> Result<Self> {
        Self::new(values)
    }
}

impl From<DenseVector> for Vec<f32> {
    fn from(v: DenseVector) -> Self {
        v.values
    }
}

impl AsRef<[f32]> for DenseVector {
    fn as_ref(&self) -> &[f32] {
        &self.values
    }
}

impl<'a> IntoIterator for &'a DenseVector {
    type Item = &'a f32;
    type IntoIter = std::slice::Iter<'a, f32>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_with_nan() {
        let a = DenseVector::new(vec![1.0, f32::NAN, 2.0]).unwrap();
        let b = DenseVector::new(vec![1.0, f32::NAN, 2.0]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, a.clone());

        let c = DenseVector::new(vec![1.0, 0.0, 2.0]).unwrap();
        assert_ne!(a, c);
        assert_ne!(c, a);

        // Signed zeros are equal, as with `==`.
        let pos = DenseVector::new(vec![0.0]).unwrap();
        let neg = DenseVector::new(vec![-0.0]).unwrap();
        assert_eq!(pos, neg);
    }

    #[test]
    fn test_serde_json() {
        let v = DenseVector::new(vec![0.5, -1.25, 3.0]).unwrap();
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "[0.5,-1.25,3.0]");
        let back: DenseVector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);

        // Deserialization goes through `new`, so an empty array is rejected.
        assert!(serde_json::from_str::<DenseVector>("[]").is_err());
    }

    #[test]
    fn test_new_rejects_empty() {
        let err = DenseVector::new(vec![]).unwrap_err();
        assert!(matches!(err, VectorError::InvalidDimension { dimensions: 0, .. }));
        assert!(DenseVector::zeros(0).is_err());
    }

    #[test]
    fn test_constructor_owns_storage() {
        let mut source = vec![1.0, 2.0, 3.0];
        let v = DenseVector::from_slice(&source).unwrap();
        source[0] = 99.0;
        assert_eq!(v.as_slice(), &[1.0, 2.0, 3.0]);

        let mut copy = v.to_array();
        copy[1] = -5.0;
        assert_eq!(v.get(1).unwrap(), 2.0);
    }

    #[test]
    fn test_get_out_of_range() {
        let v = DenseVector::new(vec![1.0]).unwrap();
        assert!(matches!(
            v.get(1),
            Err(VectorError::IndexOutOfRange { index: 1, dimensions: 1, .. })
        ));
    }

    #[test]
    fn test_arithmetic() {
        let a = DenseVector::new(vec![1.0, 2.0, 3.0]).unwrap();
        let b = DenseVector::new(vec![4.0, 5.0, 6.0]).unwrap();

        assert_eq!(a.add(&b).unwrap().as_slice(), &[5.0, 7.0, 9.0]);
        assert_eq!(b.subtract(&a).unwrap().as_slice(), &[3.0, 3.0, 3.0]);
        assert_eq!(a.hadamard(&b).unwrap().as_slice(), &[4.0, 10.0, 18.0]);
        assert_eq!(a.multiply(2.0).as_slice(), &[2.0, 4.0, 6.0]);

        // Receivers are untouched.
        assert_eq!(a.as_slice(), &[1.0, 2.0, 3.0]);

        let short = DenseVector::new(vec![1.0]).unwrap();
        assert!(matches!(
            a.add(&short),
            Err(VectorError::DimensionMismatch { expected: 3, actual: 1, .. })
        ));
    }

    #[test]
    fn test_norms_and_zero() {
        let v = DenseVector::new(vec![3.0, -4.0]).unwrap();
        assert!((v.norm() - 5.0).abs() < 1e-12);
        assert!((v.norm_l1() - 7.0).abs() < 1e-12);
        assert!(!v.is_zero());
        assert!(DenseVector::zeros(4).unwrap().is_zero());
    }

    #[test]
    fn test_normalize() {
        let v = DenseVector::new(vec![3.0, 4.0]).unwrap();
        let n = v.normalize().unwrap();
        assert!((n.norm() - 1.0).abs() < 1e-6);
        assert!((n.get(0).unwrap() - 0.6).abs() < 1e-6);

        let zero = DenseVector::zeros(2).unwrap();
        assert!(matches!(
            zero.normalize(),
            Err(VectorError::DegenerateVector { .. })
        ));
    }

    #[test]
    fn test_dot_and_cosine() {
        let a = DenseVector::new(vec![1.0, 2.0, 3.0]).unwrap();
        let b = DenseVector::new(vec![4.0, 5.0, 6.0]).unwrap();
        assert!((a.dot_product(&b).unwrap() - 32.0).abs() < 1e-6);
        assert!((a.cosine_similarity(&a).unwrap() - 1.0).abs() < 1e-9);

        let c = DenseVector::new(vec![1.0, 2.0]).unwrap();
        let err = a.dot_product(&c).unwrap_err();
        assert_eq!(err.to_string(), "dimension mismatch in dot_product: 3 vs 2");

        let zero = DenseVector::zeros(3).unwrap();
        assert!(matches!(
            a.cosine_similarity(&zero),
            Err(VectorError::DegenerateVector { .. })
        ));
    }

    #[test]
    fn test_to_sparse_drops_zeros() {
        let v = DenseVector::new(vec![0.0, 1.5, 0.0, -2.0]).unwrap();
        let s = v.to_sparse();
        assert_eq!(s.non_zero_count(), 2);
        assert_eq!(s.dimensions(), 4);
        assert_eq!(s.to_array(), v.to_array());
    }

    #[test]
    fn test_euclidean_distance() {
        let a = DenseVector::new(vec![0.0, 0.0]).unwrap();
        let b = DenseVector::new(vec![3.0, 4.0]).unwrap();
        assert!((a.euclidean_distance(&b).unwrap() - 5.0).abs() < 1e-9);
    }
}
