//! Batch analytics for zvec.
//!
//! [`BatchEngine`] computes statistics, similarity matrices and top-k queries
//! over a [`BatchVector`](zvec_vector::BatchVector). Large batches fan
//! per-member work out over rayon; reductions stay sequential so every result
//! is reproducible bit for bit.
//!
//! An optional [`ScratchPool`](zvec_vector::ScratchPool) can be injected with
//! [`BatchEngine::with_pool`] to recycle accumulator buffers between calls.

mod config;
mod engine;
mod similarity;

pub use config::{BatchConfig, DEFAULT_PARALLEL_THRESHOLD};
pub use engine::BatchEngine;
pub use similarity::{SimilarityMatch, SimilarityMatrix};
