//! Named vectors: a dense vector with one feature label per dimension.

use crate::dense::DenseVector;
use crate::traits::VectorModel;
use crate::{check_same_dimensions, Result, VectorError};
use std::collections::HashMap;

/// Dense vector paired with unique, non-blank feature names.
///
/// # Invariants
///
/// - `names.len() == vector.dimensions()`
/// - names are unique and not blank
#[derive(Debug, Clone)]
pub struct NamedVector {
    names: Vec<String>,
    vector: DenseVector,
    /// name -> dimension
    positions: HashMap<String, usize>,
}

impl NamedVector {
    /// Pair `names` with the dimensions of `vector`.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if the name count differs from the dimensions
    /// - `DuplicateOrInvalidName` for a blank or repeated name
    ///
    /// # Example
    ///
    /// ```
    /// use zvec_vector::{DenseVector, NamedVector};
    ///
    /// let v = NamedVector::new(
    ///     vec!["age".into(), "income".into()],
    ///     DenseVector::new(vec![42.0, 1.5]).unwrap(),
    /// )
    /// .unwrap();
    /// assert_eq!(v.get("income"), Some(1.5));
    /// ```
    pub fn new(names: Vec<String>, vector: DenseVector) -> Result<Self> {
        check_same_dimensions("NamedVector::new", vector.dimensions(), names.len())?;

        let mut positions = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(VectorError::DuplicateOrInvalidName(format!(
                    "blank name at dimension {}",
                    i
                )));
            }
            if positions.insert(name.clone(), i).is_some() {
                return Err(VectorError::DuplicateOrInvalidName(format!(
                    "duplicate name {:?} at dimension {}",
                    name, i
                )));
            }
        }

        Ok(Self {
            names,
            vector,
            positions,
        })
    }

    /// Build from `(name, value)` pairs in dimension order.
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, f32)>) -> Result<Self> {
        let (names, values): (Vec<String>, Vec<f32>) =
            pairs.into_iter().map(|(n, v)| (n.into(), v)).unzip();
        Self::new(names, DenseVector::new(values)?)
    }

    /// Label every dimension `f0`, `f1`, ...
    pub fn with_generated_names(vector: DenseVector) -> Self {
        let names: Vec<String> = (0..vector.dimensions()).map(|i| format!("f{}", i)).collect();
        let positions = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
        Self {
            names,
            vector,
            positions,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[f32] {
        self.vector.as_slice()
    }

    pub fn vector(&self) -> &DenseVector {
        &self.vector
    }

    /// Dense copy without the labels.
    pub fn to_dense_vector(&self) -> DenseVector {
        self.vector.clone()
    }

    pub fn into_parts(self) -> (Vec<String>, DenseVector) {
        (self.names, self.vector)
    }

    /// Value of the named feature.
    pub fn get(&self, name: &str) -> Option<f32> {
        self.positions
            .get(name)
            .map(|&i| self.vector.as_slice()[i])
    }

    /// Dimension of the named feature.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Same names, new values.
    pub fn with_values(&self, vector: DenseVector) -> Result<Self> {
        check_same_dimensions(
            "NamedVector::with_values",
            self.names.len(),
            vector.dimensions(),
        )?;
        Ok(Self {
            names: self.names.clone(),
            vector,
            positions: self.positions.clone(),
        })
    }

    /// The `k` features with the largest values, largest first.
    ///
    /// Equal values keep dimension order, so the result is deterministic.
    pub fn top_k_features(&self, k: usize) -> Vec<(&str, f32)> {
        let mut ranked: Vec<(&str, f32)> = self
            .names
            .iter()
            .map(String::as_str)
            .zip(self.vector.iter().copied())
            .collect();
        // Stable sort: ties stay in dimension order.
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(k);
        ranked
    }

    /// Project onto a subset of features, in the order given.
    ///
    /// # Errors
    ///
    /// `DuplicateOrInvalidName` for an unknown or repeated name, and
    /// `InvalidDimension` when `names` is empty.
    pub fn select(&self, names: &[&str]) -> Result<Self> {
        let mut values = Vec::with_capacity(names.len());
        for name in names {
            let i = self.index_of(name).ok_or_else(|| {
                VectorError::DuplicateOrInvalidName(format!("unknown name {:?}", name))
            })?;
            values.push(self.vector.as_slice()[i]);
        }
        let names = names.iter().map(|n| n.to_string()).collect();
        Self::new(names, DenseVector::new(values)?)
    }
}

impl PartialEq for NamedVector {
    fn eq(&self, other: &Self) -> bool {
        // `positions` is derived from `names`.
        self.names == other.names && self.vector == other.vector
    }
}

impl VectorModel for NamedVector {
    fn dimensions(&self) -> usize {
        self.vector.dimensions()
    }

    fn to_array(&self) -> Vec<f32> {
        self.vector.to_array()
    }

    fn norm(&self) -> f64 {
        self.vector.norm()
    }

    fn norm_l1(&self) -> f64 {
        self.vector.norm_l1()
    }

    fn is_zero(&self) -> bool {
        self.vector.is_zero()
    }

    fn as_dense_slice(&self) -> Option<&[f32]> {
        Some(self.vector.as_slice())
    }
}
