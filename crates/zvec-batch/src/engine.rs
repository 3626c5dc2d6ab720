//! Batch analytics over [`BatchVector`]s.
//!
//! Element-wise reductions (sum, mean, standard deviation) accumulate in `f64`
//! and walk the batch sequentially in member order. Per-member work (scoring,
//! normalization, matrix rows) fans out over rayon once a batch reaches
//! [`BatchConfig::parallel_threshold`]. Each output element is computed by one
//! thread from the same inputs in the same order, so results are bit-identical
//! with or without parallelism and with or without a scratch pool.

use crate::config::BatchConfig;
use crate::similarity::{rank, SimilarityMatch, SimilarityMatrix};
use rayon::prelude::*;
use std::sync::Arc;
use zvec_observe::{obs_gauge, obs_timed, BatchEvt, Meter, NoopMeter, VizEvent};
use zvec_vector::distance::{cosine_similarity, inner_product};
use zvec_vector::{
    BatchVector, DenseVector, Result, ScratchBuffer, ScratchPool, SparseVector, VectorError,
    VectorModel,
};

/// Stateless batch operations, configured once.
///
/// # Example
///
/// ```
/// use zvec_batch::BatchEngine;
/// use zvec_vector::BatchVector;
///
/// let engine = BatchEngine::default();
/// let batch = BatchVector::from_rows(vec![vec![1.0, 1.0, 1.0], vec![3.0, 3.0, 3.0]]).unwrap();
///
/// assert_eq!(engine.mean(&batch).unwrap().as_slice(), &[2.0, 2.0, 2.0]);
/// assert_eq!(engine.standard_deviation(&batch).unwrap().as_slice(), &[1.0, 1.0, 1.0]);
/// ```
pub struct BatchEngine {
    config: BatchConfig,
    pool: Option<Arc<ScratchPool>>,
    meter: Arc<dyn Meter>,
}

impl BatchEngine {
    pub fn new(config: BatchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            pool: None,
            meter: Arc::new(NoopMeter),
        })
    }

    /// Reuse accumulator buffers from `pool`.
    pub fn with_pool(mut self, pool: Arc<ScratchPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn with_meter(mut self, meter: Arc<dyn Meter>) -> Self {
        self.meter = meter;
        self
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub fn pool(&self) -> Option<&Arc<ScratchPool>> {
        self.pool.as_ref()
    }

    /// Element-wise sum of all members.
    pub fn sum(&self, batch: &BatchVector) -> Result<DenseVector> {
        self.observe("sum", batch, false);
        let acc = self.accumulate(batch);
        DenseVector::new(acc.iter().map(|&s| s as f32).collect())
    }

    /// Element-wise arithmetic mean.
    pub fn mean(&self, batch: &BatchVector) -> Result<DenseVector> {
        self.observe("mean", batch, false);
        let mean = self.mean_f64(batch);
        DenseVector::new(mean.iter().map(|&m| m as f32).collect())
    }

    /// Element-wise population standard deviation (divides by the batch size).
    pub fn standard_deviation(&self, batch: &BatchVector) -> Result<DenseVector> {
        self.observe("standard_deviation", batch, false);
        let n = batch.len() as f64;
        let mean = self.mean_f64(batch);

        let mut squares = self.scratch(batch.vector_dimensions());
        for member in batch {
            for ((acc, &m), &x) in squares.iter_mut().zip(mean.iter()).zip(member.iter()) {
                let d = x as f64 - m;
                *acc += d * d;
            }
        }

        DenseVector::new(squares.iter().map(|&s| (s / n).sqrt() as f32).collect())
    }

    /// L2-normalize every member. Zero-norm members are kept as they are.
    pub fn normalize(&self, batch: &BatchVector) -> Result<BatchVector> {
        let parallel = self.is_parallel(batch.len());
        self.observe("normalize", batch, parallel);

        let members = self
            .map_members(batch, |_, v| {
                if v.is_zero() {
                    Ok(v.clone())
                } else {
                    v.normalize()
                }
            })
            .into_iter()
            .collect::<Result<Vec<_>>>()?;
        BatchVector::new(members)
    }

    /// `n × n` matrix of dot products between members.
    pub fn pairwise_dot_products(&self, batch: &BatchVector) -> SimilarityMatrix {
        let parallel = self.is_parallel(batch.len());
        self.observe("pairwise_dot_products", batch, parallel);

        obs_timed!(self.meter, "zvec_batch_pairwise_ms", &[("op", "dot")], {
            self.map_members(batch, |_, a| {
                batch
                    .iter()
                    .map(|b| inner_product(a.as_slice(), b.as_slice()) as f64)
                    .collect::<Vec<f64>>()
            })
        })
    }

    /// `n × n` matrix of cosine similarities between members.
    ///
    /// The diagonal is exactly 1.0. Off-diagonal entries involving a
    /// zero-norm member or a NaN component are 0.0.
    pub fn pairwise_cosine_similarities(&self, batch: &BatchVector) -> SimilarityMatrix {
        let parallel = self.is_parallel(batch.len());
        self.observe("pairwise_cosine_similarities", batch, parallel);

        obs_timed!(self.meter, "zvec_batch_pairwise_ms", &[("op", "cosine")], {
            self.map_members(batch, |i, a| {
                batch
                    .iter()
                    .enumerate()
                    .map(|(j, b)| {
                        if i == j {
                            1.0
                        } else {
                            cosine_score(a, b)
                        }
                    })
                    .collect::<Vec<f64>>()
            })
        })
    }

    /// The `k` members most cosine-similar to `query`, best first.
    ///
    /// Equal scores keep batch order. `k == 0` yields nothing and `k` larger
    /// than the batch yields every member. Members with zero norm or a NaN
    /// component score 0.0, so they never outrank a real match.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if `query` does not match the batch
    /// - `DegenerateVector` if `query` has zero norm
    pub fn find_most_similar(
        &self,
        batch: &BatchVector,
        query: &DenseVector,
        k: usize,
    ) -> Result<Vec<SimilarityMatch>> {
        if query.dimensions() != batch.vector_dimensions() {
            return Err(VectorError::DimensionMismatch {
                op: "find_most_similar",
                expected: batch.vector_dimensions(),
                actual: query.dimensions(),
            });
        }
        if query.is_zero() {
            return Err(VectorError::DegenerateVector {
                op: "find_most_similar",
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let parallel = self.is_parallel(batch.len());
        self.observe("find_most_similar", batch, parallel);

        let mut matches = self.map_members(batch, |i, v| {
            SimilarityMatch::new(i, cosine_score(query, v))
        });
        rank(&mut matches);
        matches.truncate(k);
        Ok(matches)
    }

    /// Consecutive batches of at most `chunk_size` members; the last may be shorter.
    pub fn split(&self, batch: &BatchVector, chunk_size: usize) -> Result<Vec<BatchVector>> {
        if chunk_size == 0 {
            return Err(VectorError::InvalidArgument(
                "split chunk_size must be > 0".into(),
            ));
        }
        self.observe("split", batch, false);

        batch
            .vectors()
            .chunks(chunk_size)
            .map(|chunk| BatchVector::new(chunk.to_vec()))
            .collect()
    }

    /// Members of `a` followed by members of `b`.
    pub fn concat(&self, a: &BatchVector, b: &BatchVector) -> Result<BatchVector> {
        if a.vector_dimensions() != b.vector_dimensions() {
            return Err(VectorError::DimensionMismatch {
                op: "concat",
                expected: a.vector_dimensions(),
                actual: b.vector_dimensions(),
            });
        }
        self.observe("concat", a, false);

        let mut members = Vec::with_capacity(a.len() + b.len());
        members.extend_from_slice(a.vectors());
        members.extend_from_slice(b.vectors());
        BatchVector::new(members)
    }

    /// Materialize sparse vectors into a dense batch of `dimensions` columns.
    ///
    /// # Errors
    ///
    /// - `EmptyBatch` for an empty input
    /// - `IndexOutOfRange` if a stored index does not fit `dimensions`
    pub fn sparse_to_dense_batch(
        &self,
        vectors: &[SparseVector],
        dimensions: usize,
    ) -> Result<BatchVector> {
        if vectors.is_empty() {
            return Err(VectorError::EmptyBatch {
                op: "sparse_to_dense_batch",
            });
        }
        tracing::debug!(
            op = "sparse_to_dense_batch",
            batch_size = vectors.len(),
            dimensions,
            "batch op"
        );

        let members = vectors
            .iter()
            .map(|s| s.to_dense(dimensions))
            .collect::<Result<Vec<_>>>()?;
        BatchVector::new(members)
    }

    /// Euclidean distance of each member to the batch mean.
    pub fn centroid_distances(&self, batch: &BatchVector) -> Vec<f64> {
        let parallel = self.is_parallel(batch.len());
        self.observe("centroid_distances", batch, parallel);

        let mean = self.mean_f64(batch);
        let centroid: &[f64] = &mean;
        self.map_members(batch, |_, v| {
            v.iter()
                .zip(centroid)
                .map(|(&x, &m)| {
                    let d = x as f64 - m;
                    d * d
                })
                .sum::<f64>()
                .sqrt()
        })
    }

    fn is_parallel(&self, len: usize) -> bool {
        len >= self.config.parallel_threshold
    }

    fn scratch(&self, len: usize) -> ScratchBuffer<'_> {
        ScratchBuffer::acquire(self.pool.as_deref(), len)
    }

    /// Per-member sums, in batch order.
    fn accumulate(&self, batch: &BatchVector) -> ScratchBuffer<'_> {
        let mut acc = self.scratch(batch.vector_dimensions());
        for member in batch {
            for (a, &x) in acc.iter_mut().zip(member.iter()) {
                *a += x as f64;
            }
        }
        acc
    }

    fn mean_f64(&self, batch: &BatchVector) -> ScratchBuffer<'_> {
        let n = batch.len() as f64;
        let mut acc = self.accumulate(batch);
        for a in acc.iter_mut() {
            *a /= n;
        }
        acc
    }

    /// Apply `f` to every `(index, member)`, in parallel for large batches.
    /// Output order always matches batch order.
    fn map_members<T, F>(&self, batch: &BatchVector, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize, &DenseVector) -> T + Send + Sync,
    {
        if self.is_parallel(batch.len()) {
            batch
                .vectors()
                .par_iter()
                .enumerate()
                .map(|(i, v)| f(i, v))
                .collect()
        } else {
            batch.iter().enumerate().map(|(i, v)| f(i, v)).collect()
        }
    }

    fn observe(&self, op: &'static str, batch: &BatchVector, parallel: bool) {
        tracing::debug!(
            op,
            batch_size = batch.len(),
            dimensions = batch.vector_dimensions(),
            parallel,
            "batch op"
        );
        self.meter.emit(VizEvent::Batch(BatchEvt {
            op,
            batch_size: batch.len(),
            dimensions: batch.vector_dimensions(),
            parallel,
        }));
        if let Some(pool) = &self.pool {
            obs_gauge!(self.meter, "zvec_scratch_pool_idle", &[], pool.idle());
        }
    }
}

/// Cosine similarity, or 0.0 when it is undefined or NaN.
fn cosine_score(a: &DenseVector, b: &DenseVector) -> f64 {
    match cosine_similarity(a.as_slice(), b.as_slice()) {
        Some(s) if !s.is_nan() => s,
        _ => 0.0,
    }
}

impl Default for BatchEngine {
    fn default() -> Self {
        Self {
            config: BatchConfig::default(),
            pool: None,
            meter: Arc::new(NoopMeter),
        }
    }
}

impl std::fmt::Debug for BatchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchEngine")
            .field("config", &self.config)
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}
