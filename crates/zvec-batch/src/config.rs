//! Batch engine configuration.

use serde::{Deserialize, Serialize};
use zvec_vector::{Result, VectorError};

/// Batches with at least this many members fan out across the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Minimum batch size for parallel per-member work. Reductions never
    /// run in parallel regardless of this value.
    pub parallel_threshold: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl BatchConfig {
    /// Never fan out.
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.parallel_threshold == 0 {
            return Err(VectorError::InvalidArgument(
                "parallel_threshold must be > 0".into(),
            ));
        }
        Ok(())
    }
}
