//! Sparse vectors: a declared dimension count plus the non-zero entries.
//!
//! Entries live in a `BTreeMap`, so iteration is always in ascending index
//! order. The codec relies on that for its canonical encoding.

use crate::dense::DenseVector;
use crate::traits::VectorModel;
use crate::{check_dimensions, check_same_dimensions, Result, VectorError};
use std::collections::BTreeMap;

/// Vector stored as `index -> value` for its non-zero components.
///
/// # Invariants
///
/// - `dimensions > 0`
/// - every stored index is `< dimensions`
/// - no stored value is `0.0` or NaN; such values are dropped on construction
///   and by every operation that produces a new vector
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVector {
    dimensions: usize,
    entries: BTreeMap<usize, f32>,
}

/// Zero and NaN are never stored.
#[inline]
fn is_storable(value: f32) -> bool {
    value != 0.0 && !value.is_nan()
}

impl SparseVector {
    /// Create a sparse vector from `(index, value)` pairs.
    ///
    /// Zero and NaN values are dropped. A later pair for the same index replaces
    /// an earlier one.
    ///
    /// # Errors
    ///
    /// - `InvalidDimension` if `dimensions == 0`
    /// - `IndexOutOfRange` if any index is `>= dimensions`
    ///
    /// # Example
    ///
    /// ```
    /// use zvec_vector::{SparseVector, VectorModel};
    ///
    /// let v = SparseVector::new(5, [(2, 4.0), (4, -1.0), (0, 0.0)]).unwrap();
    /// assert_eq!(v.non_zero_count(), 2);
    /// assert_eq!(v.to_array(), vec![0.0, 0.0, 4.0, 0.0, -1.0]);
    /// ```
    pub fn new(
        dimensions: usize,
        entries: impl IntoIterator<Item = (usize, f32)>,
    ) -> Result<Self> {
        check_dimensions("SparseVector::new", dimensions)?;

        let mut map = BTreeMap::new();
        for (index, value) in entries {
            if index >= dimensions {
                return Err(VectorError::IndexOutOfRange {
                    op: "SparseVector::new",
                    index,
                    dimensions,
                });
            }
            if is_storable(value) {
                map.insert(index, value);
            } else {
                map.remove(&index);
            }
        }

        Ok(Self {
            dimensions,
            entries: map,
        })
    }

    /// Sparse vector with no stored entries.
    pub fn empty(dimensions: usize) -> Result<Self> {
        Self::new(dimensions, std::iter::empty())
    }

    /// Keep the non-zero components of a dense vector.
    pub fn from_dense(dense: &DenseVector) -> Self {
        let entries = dense
            .iter()
            .enumerate()
            .filter(|(_, &v)| is_storable(v))
            .map(|(i, &v)| (i, v))
            .collect();
        Self {
            dimensions: dense.dimensions(),
            entries,
        }
    }

    /// Value at `index` (zero when not stored).
    pub fn get(&self, index: usize) -> Result<f32> {
        self.check_index("SparseVector::get", index)?;
        Ok(self.entries.get(&index).copied().unwrap_or(0.0))
    }

    /// Copy with `index` set to `value`; zero or NaN removes the entry.
    pub fn set(&self, index: usize, value: f32) -> Result<Self> {
        self.check_index("SparseVector::set", index)?;
        let mut entries = self.entries.clone();
        if is_storable(value) {
            entries.insert(index, value);
        } else {
            entries.remove(&index);
        }
        Ok(Self {
            dimensions: self.dimensions,
            entries,
        })
    }

    /// Element-wise sum. Entries that cancel to zero are dropped.
    pub fn add(&self, other: &SparseVector) -> Result<Self> {
        self.merge("SparseVector::add", other, |a, b| a + b)
    }

    /// Element-wise difference. Entries that cancel to zero are dropped.
    pub fn subtract(&self, other: &SparseVector) -> Result<Self> {
        self.merge("SparseVector::subtract", other, |a, b| a - b)
    }

    /// Scalar multiplication. Multiplying by zero yields an empty vector.
    pub fn multiply(&self, scalar: f32) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|(&i, &v)| (i, v * scalar))
            .filter(|&(_, v)| is_storable(v))
            .collect();
        Self {
            dimensions: self.dimensions,
            entries,
        }
    }

    /// Number of stored (non-zero) entries.
    pub fn non_zero_count(&self) -> usize {
        self.entries.len()
    }

    /// Fraction of dimensions that are stored.
    pub fn density(&self) -> f64 {
        self.entries.len() as f64 / self.dimensions as f64
    }

    /// Stored entries in ascending index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (usize, f32)> + '_ {
        self.entries.iter().map(|(&i, &v)| (i, v))
    }

    /// Stored indices in ascending order.
    pub fn indices(&self) -> Vec<usize> {
        self.entries.keys().copied().collect()
    }

    /// Materialize into a dense vector of `dimensions` components.
    ///
    /// `dimensions` may differ from this vector's own count as long as every
    /// stored index fits.
    ///
    /// # Errors
    ///
    /// - `InvalidDimension` if `dimensions == 0`
    /// - `IndexOutOfRange` if a stored index does not fit
    pub fn to_dense(&self, dimensions: usize) -> Result<DenseVector> {
        check_dimensions("SparseVector::to_dense", dimensions)?;
        if let Some((&max_index, _)) = self.entries.last_key_value() {
            if max_index >= dimensions {
                return Err(VectorError::IndexOutOfRange {
                    op: "SparseVector::to_dense",
                    index: max_index,
                    dimensions,
                });
            }
        }
        let mut values = vec![0.0f32; dimensions];
        for (&i, &v) in &self.entries {
            values[i] = v;
        }
        DenseVector::new(values)
    }

    /// Materialize into a dense vector of this vector's own dimension count.
    pub fn to_dense_vector(&self) -> DenseVector {
        let mut values = vec![0.0f32; self.dimensions];
        for (&i, &v) in &self.entries {
            values[i] = v;
        }
        DenseVector::from_values(values)
    }

    /// Dot product against contiguous values, visiting stored entries only.
    pub(crate) fn dot_dense(&self, values: &[f32]) -> f32 {
        debug_assert_eq!(self.dimensions, values.len());
        self.entries.iter().map(|(&i, &v)| v * values[i]).sum()
    }

    /// Sparse-sparse dot product.
    ///
    /// Walks the smaller entry map and looks each index up in the larger one,
    /// so the cost scales with `min(nnz_a, nnz_b)` rather than with the
    /// dimension count.
    pub(crate) fn dot_sparse(&self, other: &SparseVector) -> f32 {
        let (small, large) = if self.entries.len() <= other.entries.len() {
            (&self.entries, &other.entries)
        } else {
            (&other.entries, &self.entries)
        };

        small
            .iter()
            .filter_map(|(i, &a)| large.get(i).map(|&b| a * b))
            .sum()
    }

    fn check_index(&self, op: &'static str, index: usize) -> Result<()> {
        if index >= self.dimensions {
            return Err(VectorError::IndexOutOfRange {
                op,
                index,
                dimensions: self.dimensions,
            });
        }
        Ok(())
    }

    fn merge(
        &self,
        op: &'static str,
        other: &SparseVector,
        f: impl Fn(f32, f32) -> f32,
    ) -> Result<Self> {
        check_same_dimensions(op, self.dimensions, other.dimensions)?;

        let mut entries = BTreeMap::new();
        for &i in self.entries.keys().chain(other.entries.keys()) {
            if entries.contains_key(&i) {
                continue;
            }
            let a = self.entries.get(&i).copied().unwrap_or(0.0);
            let b = other.entries.get(&i).copied().unwrap_or(0.0);
            let v = f(a, b);
            if is_storable(v) {
                entries.insert(i, v);
            }
        }

        Ok(Self {
            dimensions: self.dimensions,
            entries,
        })
    }
}

impl VectorModel for SparseVector {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn to_array(&self) -> Vec<f32> {
        self.to_dense_vector().into_vec()
    }

    fn norm(&self) -> f64 {
        self.entries
            .values()
            .map(|&v| (v as f64) * (v as f64))
            .sum::<f64>()
            .sqrt()
    }

    fn norm_l1(&self) -> f64 {
        self.entries.values().map(|&v| (v as f64).abs()).sum()
    }

    fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    fn as_sparse(&self) -> Option<&SparseVector> {
        Some(self)
    }

    fn dot_product(&self, other: &dyn VectorModel) -> Result<f32> {
        check_same_dimensions("dot_product", self.dimensions, other.dimensions())?;

        if let Some(sparse) = other.as_sparse() {
            return Ok(self.dot_sparse(sparse));
        }

        Ok(match other.as_dense_slice() {
            Some(values) => self.dot_dense(values),
            None => self.dot_dense(&other.to_array()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SparseVector {
        SparseVector::new(5, [(2, 4.0), (4, -1.0)]).unwrap()
    }

    #[test]
    fn test_to_array() {
        assert_eq!(sample().to_array(), vec![0.0, 0.0, 4.0, 0.0, -1.0]);
    }

    #[test]
    fn test_construction_drops_zero_and_nan() {
        let v = SparseVector::new(4, [(0, 0.0), (1, f32::NAN), (2, 1.0)]).unwrap();
        assert_eq!(v.non_zero_count(), 1);
        assert_eq!(v.indices(), vec![2]);
    }

    #[test]
    fn test_later_pair_replaces_earlier() {
        let v = SparseVector::new(3, [(1, 2.0), (1, 5.0)]).unwrap();
        assert_eq!(v.get(1).unwrap(), 5.0);

        let v = SparseVector::new(3, [(1, 2.0), (1, 0.0)]).unwrap();
        assert_eq!(v.non_zero_count(), 0);
    }

    #[test]
    fn test_invalid_construction() {
        assert!(matches!(
            SparseVector::new(0, std::iter::empty()),
            Err(VectorError::InvalidDimension { .. })
        ));
        assert!(matches!(
            SparseVector::new(3, [(3, 1.0)]),
            Err(VectorError::IndexOutOfRange { index: 3, dimensions: 3, .. })
        ));
    }

    #[test]
    fn test_get_and_set() {
        let v = sample();
        assert_eq!(v.get(2).unwrap(), 4.0);
        assert_eq!(v.get(0).unwrap(), 0.0);
        assert!(v.get(5).is_err());

        let w = v.set(0, 7.0).unwrap();
        assert_eq!(w.non_zero_count(), 3);
        // Receiver unchanged.
        assert_eq!(v.non_zero_count(), 2);

        let cleared = w.set(2, 0.0).unwrap();
        assert_eq!(cleared.indices(), vec![0, 4]);

        assert!(matches!(
            v.set(9, 1.0),
            Err(VectorError::IndexOutOfRange { index: 9, .. })
        ));
    }

    #[test]
    fn test_add_subtract_multiply_canonicalize() {
        let a = sample();
        let b = SparseVector::new(5, [(2, -4.0), (3, 1.0)]).unwrap();

        let sum = a.add(&b).unwrap();
        assert_eq!(sum.indices(), vec![3, 4]);

        let diff = a.subtract(&a).unwrap();
        assert!(diff.is_zero());
        assert_eq!(diff.non_zero_count(), 0);

        let scaled = a.multiply(0.0);
        assert_eq!(scaled.non_zero_count(), 0);

        let doubled = a.multiply(2.0);
        assert_eq!(doubled.get(2).unwrap(), 8.0);

        let other_dims = SparseVector::empty(6).unwrap();
        assert!(matches!(
            a.add(&other_dims),
            Err(VectorError::DimensionMismatch { expected: 5, actual: 6, .. })
        ));
    }

    #[test]
    fn test_dot_products() {
        let a = sample();
        let b = SparseVector::new(5, [(2, 0.5), (1, 3.0), (4, 2.0)]).unwrap();
        // 4*0.5 + (-1)*2 = 0
        assert_eq!(a.dot_product(&b).unwrap(), 0.0);
        assert_eq!(b.dot_product(&a).unwrap(), 0.0);

        let dense = DenseVector::new(vec![1.0, 1.0, 1.0, 1.0, 1.0]).unwrap();
        assert_eq!(a.dot_product(&dense).unwrap(), 3.0);
        assert_eq!(dense.dot_product(&a).unwrap(), 3.0);

        let short = DenseVector::new(vec![1.0]).unwrap();
        assert!(a.dot_product(&short).is_err());
    }

    #[test]
    fn test_cosine_against_dense() {
        let a = sample();
        let dense = a.to_dense_vector();
        assert!((a.cosine_similarity(&dense).unwrap() - 1.0).abs() < 1e-9);

        let empty = SparseVector::empty(5).unwrap();
        assert!(matches!(
            a.cosine_similarity(&empty),
            Err(VectorError::DegenerateVector { .. })
        ));
    }

    #[test]
    fn test_to_dense_with_dimensions() {
        let a = sample();
        let wide = a.to_dense(8).unwrap();
        assert_eq!(wide.dimensions(), 8);
        assert_eq!(wide.get(4).unwrap(), -1.0);

        assert!(matches!(
            a.to_dense(4),
            Err(VectorError::IndexOutOfRange { index: 4, dimensions: 4, .. })
        ));
        assert!(a.to_dense(0).is_err());
    }

    #[test]
    fn test_norms_and_density() {
        let v = SparseVector::new(4, [(0, 3.0), (3, -4.0)]).unwrap();
        assert!((v.norm() - 5.0).abs() < 1e-12);
        assert!((v.norm_l1() - 7.0).abs() < 1e-12);
        assert!((v.density() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_iteration_is_ascending() {
        let v = SparseVector::new(10, [(9, 1.0), (0, 2.0), (5, 3.0)]).unwrap();
        let indices: Vec<usize> = v.iter().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 5, 9]);
    }
}
