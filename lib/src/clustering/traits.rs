//! Strategy interfaces for clustering and partition scoring.
//!
//! The greedy cluster-count search only sees these traits, so swapping the
//! exact algorithm for the approximate one (or a test double) is a matter of
//! passing a different implementation.

use crate::preprocessing::error::EncodingError;
use crate::sparse::CsrMatrix;

/// Hard clustering routine: one label per row.
pub trait Clusterer: Send + Sync {
    /// Short algorithm name for logs and reports.
    fn name(&self) -> &'static str;

    /// Partition the rows of `data` into at most `n_clusters` groups.
    ///
    /// The result has one label in `[0, n_clusters)` per row. Fewer distinct
    /// labels than `n_clusters` may be returned when the data has fewer
    /// distinct points; callers must tolerate that.
    ///
    /// Implementations must be deterministic for a fixed `seed`.
    fn fit_predict(
        &self,
        data: &CsrMatrix,
        n_clusters: usize,
        seed: u64,
    ) -> Result<Vec<usize>, EncodingError>;
}

/// Internal clustering quality metric. Higher is better.
pub trait QualityScorer: Send + Sync {
    /// Short metric name for logs and reports.
    fn name(&self) -> &'static str;

    /// Score a labelling of `data`.
    ///
    /// Returns `Ok(None)` when the partition cannot be scored (fewer than two
    /// distinct labels). An unscored partition never wins against a scored one.
    fn score(&self, data: &CsrMatrix, labels: &[usize]) -> Result<Option<f64>, EncodingError>;
}
