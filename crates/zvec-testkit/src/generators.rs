//! proptest strategies for vector values.

use proptest::collection::{btree_set, vec};
use proptest::prelude::*;
use zvec_vector::{BatchVector, DenseVector, NamedVector, SparseVector, Vector};

/// Upper bound on dimensions used by the default strategies.
pub const MAX_TEST_DIMS: usize = 64;

/// Finite component values, zero included.
pub fn arb_value() -> impl Strategy<Value = f32> {
    prop_oneof![
        1 => Just(0.0f32),
        8 => -1000.0f32..1000.0f32,
    ]
}

/// Dense vector of exactly `dims` components.
pub fn arb_dense_with_dims(dims: usize) -> impl Strategy<Value = DenseVector> {
    vec(arb_value(), dims).prop_map(|values| DenseVector::new(values).unwrap())
}

/// Dense vector of 1..=`max_dims` components.
pub fn arb_dense(max_dims: usize) -> impl Strategy<Value = DenseVector> {
    (1..=max_dims).prop_flat_map(arb_dense_with_dims)
}

/// Sparse vector of 1..=`max_dims` dimensions; zero values are generated on
/// purpose so canonicalization is exercised.
pub fn arb_sparse(max_dims: usize) -> impl Strategy<Value = SparseVector> {
    (1..=max_dims).prop_flat_map(|dims| {
        vec((0..dims, arb_value()), 0..=dims)
            .prop_map(move |entries| SparseVector::new(dims, entries).unwrap())
    })
}

/// Named vector with unique, non-blank names.
pub fn arb_named(max_dims: usize) -> impl Strategy<Value = NamedVector> {
    (1..=max_dims).prop_flat_map(|dims| {
        (
            btree_set("[a-z][a-z0-9_]{0,11}", dims),
            arb_dense_with_dims(dims),
        )
            .prop_map(|(names, dense)| {
                NamedVector::new(names.into_iter().collect(), dense).unwrap()
            })
    })
}

/// Batch of 1..=`max_len` members of one shared dimensionality.
pub fn arb_batch(max_len: usize, max_dims: usize) -> impl Strategy<Value = BatchVector> {
    (1..=max_dims).prop_flat_map(move |dims| {
        vec(arb_dense_with_dims(dims), 1..=max_len)
            .prop_map(|members| BatchVector::new(members).unwrap())
    })
}

/// Any vector representation.
pub fn arb_vector() -> impl Strategy<Value = Vector> {
    prop_oneof![
        arb_dense(MAX_TEST_DIMS).prop_map(Vector::from),
        arb_sparse(MAX_TEST_DIMS).prop_map(Vector::from),
        arb_named(MAX_TEST_DIMS).prop_map(Vector::from),
        arb_batch(8, MAX_TEST_DIMS).prop_map(Vector::from),
    ]
}

/// Two dense vectors of equal dimensionality, both with a non-zero norm.
pub fn non_degenerate_pair(max_dims: usize) -> impl Strategy<Value = (DenseVector, DenseVector)> {
    (1..=max_dims)
        .prop_flat_map(|dims| (arb_dense_with_dims(dims), arb_dense_with_dims(dims)))
        .prop_filter("both operands need a non-zero norm", |(a, b)| {
            a.iter().any(|&x| x != 0.0) && b.iter().any(|&x| x != 0.0)
        })
}
