use proptest::prelude::*;
use zvec_testkit::{arb_batch, arb_dense, arb_sparse, arb_vector, non_degenerate_pair};
use zvec_vector::{SparseVector, VectorError, VectorModel};

proptest! {
    #[test]
    fn test_property_dimensions_positive(v in arb_vector()) {
        prop_assert!(v.dimensions() > 0);
        prop_assert_eq!(v.to_array().len(), v.dimensions());
    }

    #[test]
    fn test_property_cosine_bounds((a, b) in non_degenerate_pair(48)) {
        let cos = a.cosine_similarity(&b).unwrap();
        prop_assert!((-1.0..=1.0).contains(&cos), "cosine {} out of range", cos);

        let self_cos = a.cosine_similarity(&a).unwrap();
        prop_assert!((self_cos - 1.0).abs() < 1e-6, "self cosine {}", self_cos);
    }

    #[test]
    fn test_property_sparse_never_stores_zero(v in arb_sparse(48)) {
        prop_assert!(v.iter().all(|(_, x)| x != 0.0 && !x.is_nan()));
        let zeros_in_dense = v.to_array().iter().filter(|&&x| x != 0.0).count();
        prop_assert_eq!(zeros_in_dense, v.non_zero_count());
    }

    #[test]
    fn test_property_sparse_dot_matches_dense(a in arb_sparse(32), scale in -4.0f32..4.0) {
        let b = a.multiply(scale);
        let sparse_dot = a.dot_product(&b).unwrap() as f64;
        let dense_dot = a.to_dense_vector().dot_product(&b.to_dense_vector()).unwrap() as f64;
        let tolerance = 1e-3 * (1.0 + dense_dot.abs());
        prop_assert!((sparse_dot - dense_dot).abs() <= tolerance,
            "sparse {} vs dense {}", sparse_dot, dense_dot);
    }

    #[test]
    fn test_property_dense_sparse_roundtrip(v in arb_dense(48)) {
        let sparse = SparseVector::from_dense(&v);
        prop_assert_eq!(sparse.to_dense_vector(), v);
    }

    #[test]
    fn test_property_batch_uniform(batch in arb_batch(6, 16)) {
        let dims = batch.vector_dimensions();
        prop_assert!(batch.iter().all(|v| v.dimensions() == dims));
        prop_assert_eq!(batch.dimensions(), batch.len() * dims);
    }
}

#[test]
fn test_mismatch_reports_both_dimensions() {
    let a = SparseVector::empty(128).unwrap();
    let b = SparseVector::empty(256).unwrap();
    let err = a.dot_product(&b).unwrap_err();
    assert_eq!(
        err,
        VectorError::DimensionMismatch {
            op: "dot_product",
            expected: 128,
            actual: 256
        }
    );
    assert_eq!(err.to_string(), "dimension mismatch in dot_product: 128 vs 256");
}
