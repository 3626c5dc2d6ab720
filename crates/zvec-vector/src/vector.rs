//! The closed set of vector representations.

use crate::batch::BatchVector;
use crate::dense::DenseVector;
use crate::named::NamedVector;
use crate::sparse::SparseVector;
use crate::traits::VectorModel;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Discriminant of [`Vector`]; the numeric value is the wire type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum VectorKind {
    Dense = 1,
    Sparse = 2,
    Named = 3,
    Batch = 4,
}

impl VectorKind {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(Self::Dense),
            2 => Some(Self::Sparse),
            3 => Some(Self::Named),
            4 => Some(Self::Batch),
            _ => None,
        }
    }

    pub fn to_u8(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dense => "dense",
            Self::Sparse => "sparse",
            Self::Named => "named",
            Self::Batch => "batch",
        }
    }
}

impl std::fmt::Display for VectorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Any vector value.
///
/// Decoding produces this type with a single exhaustive `match` on the type tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Vector {
    Dense(DenseVector),
    Sparse(SparseVector),
    Named(NamedVector),
    Batch(BatchVector),
}

impl Vector {
    pub fn kind(&self) -> VectorKind {
        match self {
            Self::Dense(_) => VectorKind::Dense,
            Self::Sparse(_) => VectorKind::Sparse,
            Self::Named(_) => VectorKind::Named,
            Self::Batch(_) => VectorKind::Batch,
        }
    }

    /// Borrow as the capability trait.
    pub fn as_model(&self) -> &dyn VectorModel {
        match self {
            Self::Dense(v) => v,
            Self::Sparse(v) => v,
            Self::Named(v) => v,
            Self::Batch(v) => v,
        }
    }

    pub fn as_dense(&self) -> Option<&DenseVector> {
        match self {
            Self::Dense(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_named(&self) -> Option<&NamedVector> {
        match self {
            Self::Named(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_batch(&self) -> Option<&BatchVector> {
        match self {
            Self::Batch(v) => Some(v),
            _ => None,
        }
    }

    /// Dense form of any single vector. Batches flatten row-major.
    pub fn to_dense_vector(&self) -> DenseVector {
        match self {
            Self::Dense(v) => v.clone(),
            Self::Sparse(v) => v.to_dense_vector(),
            Self::Named(v) => v.to_dense_vector(),
            Self::Batch(v) => DenseVector::from_values(v.to_array()),
        }
    }
}

impl VectorModel for Vector {
    fn dimensions(&self) -> usize {
        self.as_model().dimensions()
    }

    fn to_array(&self) -> Vec<f32> {
        self.as_model().to_array()
    }

    fn norm(&self) -> f64 {
        self.as_model().norm()
    }

    fn norm_l1(&self) -> f64 {
        self.as_model().norm_l1()
    }

    fn is_zero(&self) -> bool {
        self.as_model().is_zero()
    }

    fn as_dense_slice(&self) -> Option<&[f32]> {
        self.as_model().as_dense_slice()
    }

    fn as_sparse(&self) -> Option<&SparseVector> {
        self.as_model().as_sparse()
    }

    fn dot_product(&self, other: &dyn VectorModel) -> Result<f32> {
        self.as_model().dot_product(other)
    }

    fn cosine_similarity(&self, other: &dyn VectorModel) -> Result<f64> {
        self.as_model().cosine_similarity(other)
    }
}

impl From<DenseVector> for Vector {
    fn from(v: DenseVector) -> Self {
        Self::Dense(v)
    }
}

impl From<SparseVector> for Vector {
    fn from(v: SparseVector) -> Self {
        Self::Sparse(v)
    }
}

impl From<NamedVector> for Vector {
    fn from(v: NamedVector) -> Self {
        Self::Named(v)
    }
}

impl From<BatchVector> for Vector {
    fn from(v: BatchVector) -> Self {
        Self::Batch(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        for tag in 1..=4u8 {
            let kind = VectorKind::from_u8(tag).unwrap();
            assert_eq!(kind.to_u8(), tag);
        }
        assert_eq!(VectorKind::from_u8(0), None);
        assert_eq!(VectorKind::from_u8(5), None);
        assert_eq!(VectorKind::Named.to_string(), "named");
    }

    #[test]
    fn test_kind_serde_matches_display() {
        for tag in 1..=4u8 {
            let kind = VectorKind::from_u8(tag).unwrap();
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
            assert_eq!(serde_json::from_str::<VectorKind>(&json).unwrap(), kind);
        }
        assert!(serde_json::from_str::<VectorKind>("\"matrix\"").is_err());
    }

    #[test]
    fn test_dispatch_through_enum() {
        let sparse: Vector = SparseVector::new(3, [(1, 2.0)]).unwrap().into();
        let dense: Vector = DenseVector::new(vec![0.0, 3.0, 0.0]).unwrap().into();

        assert_eq!(sparse.kind(), VectorKind::Sparse);
        assert_eq!(dense.kind(), VectorKind::Dense);
        assert_eq!(sparse.dot_product(&dense).unwrap(), 6.0);
        assert_eq!(dense.dot_product(&sparse).unwrap(), 6.0);
        assert!((sparse.cosine_similarity(&dense).unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(sparse.to_dense_vector().as_slice(), &[0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_batch_flattens() {
        let batch: Vector = BatchVector::from_rows(vec![vec![1.0], vec![2.0]])
            .unwrap()
            .into();
        assert_eq!(batch.dimensions(), 2);
        assert_eq!(batch.to_dense_vector().as_slice(), &[1.0, 2.0]);
    }
}
