//! Similarity results.

use serde::{Deserialize, Serialize};

/// Square matrix of pairwise scores, row `i` column `j` for members `i` and `j`.
pub type SimilarityMatrix = Vec<Vec<f64>>;

/// A batch member scored against a query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatch {
    /// Position of the member in the batch.
    pub index: usize,
    /// Cosine similarity to the query (higher = more similar).
    pub similarity: f64,
}

impl SimilarityMatch {
    pub fn new(index: usize, similarity: f64) -> Self {
        Self { index, similarity }
    }
}

/// Order `matches` best first. Stable, so equal scores keep batch order.
pub(crate) fn rank(matches: &mut [SimilarityMatch]) {
    matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
}
