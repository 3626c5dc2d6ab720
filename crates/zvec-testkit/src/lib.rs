//! Property-test tooling for the zvec crates.
//!
//! This crate provides proptest strategies that only ever produce valid values:
//! - Dense, sparse, named and batch vectors within configurable size bounds
//! - The `Vector` sum type across all four representations
//! - Non-degenerate vector pairs for similarity properties
//!
//! # Usage
//!
//! ```ignore
//! use proptest::prelude::*;
//! use zvec_testkit::arb_vector;
//!
//! proptest! {
//!     #[test]
//!     fn never_empty(v in arb_vector()) {
//!         prop_assert!(zvec_vector::VectorModel::dimensions(&v) > 0);
//!     }
//! }
//! ```

pub mod generators;

pub use generators::{
    arb_batch, arb_dense, arb_dense_with_dims, arb_named, arb_sparse, arb_value, arb_vector,
    non_degenerate_pair, MAX_TEST_DIMS,
};
