//! Greedy cluster-count selection.
//!
//! For a column with `u` distinct values the candidate counts are
//!
//! ```text
//! k_min = max(2, u / 5)
//! k_max = max(k_min + 1, min(u, u / 2 + 2))
//! ```
//!
//! with `k_max` capped at the absolute ceiling and `k_min` pulled down to
//! `ceiling - 1` when it exceeds the ceiling. Every `k` in the range is
//! clustered and scored; the highest score wins and ties go to the smaller
//! `k`. Quality is not assumed to be monotonic in `k`, so the scan is linear.

use std::ops::RangeInclusive;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clustering::traits::{Clusterer, QualityScorer};
use crate::preprocessing::error::EncodingError;
use crate::sparse::CsrMatrix;

/// Default absolute ceiling on the number of clusters.
pub const DEFAULT_MAX_CLUSTERS: usize = 200;

/// Inclusive range of candidate cluster counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRange {
    pub k_min: usize,
    pub k_max: usize,
}

impl SearchRange {
    /// Derive the search range from a column's distinct-value count.
    pub fn for_cardinality(n_unique: usize, max_clusters: usize) -> Self {
        let mut k_min = (n_unique / 5).max(2);
        let mut k_max = (k_min + 1).max(n_unique.min(n_unique / 2 + 2));
        if k_max > max_clusters {
            k_max = max_clusters;
        }
        if k_min > max_clusters {
            k_min = max_clusters.saturating_sub(1);
        }
        Self { k_min, k_max }
    }

    /// Drop candidates with more clusters than there are rows.
    pub fn capped_at(self, n_rows: usize) -> Self {
        Self {
            k_min: self.k_min,
            k_max: self.k_max.min(n_rows),
        }
    }

    pub fn iter(&self) -> RangeInclusive<usize> {
        self.k_min..=self.k_max
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        (self.k_max + 1).saturating_sub(self.k_min)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One evaluated candidate of the search.
#[derive(Clone, Debug)]
pub struct ClusterCandidate {
    pub k: usize,
    pub labels: Vec<usize>,
    /// `None` when the partition collapsed to a single cluster.
    pub score: Option<f64>,
}

/// Score of one candidate, as kept in reports.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub k: usize,
    pub score: Option<f64>,
}

/// Outcome of a search.
#[derive(Clone, Debug)]
pub struct Selection {
    pub k: usize,
    pub labels: Vec<usize>,
    pub score: Option<f64>,
    /// Every candidate's score in ascending `k`.
    pub trace: Vec<CandidateScore>,
}

/// Bounded linear search over cluster counts.
///
/// # Example
/// ```ignore
/// use catencode_rs::clustering::{ClusterCountSelector, KMeans, SearchRange, SilhouetteScorer};
///
/// let kmeans = KMeans::new();
/// let silhouette = SilhouetteScorer::new();
/// let selection = ClusterCountSelector::new(&kmeans, &silhouette)
///     .with_seed(42)
///     .select(&rows, SearchRange::for_cardinality(120, 200))?;
/// ```
pub struct ClusterCountSelector<'a> {
    clusterer: &'a dyn Clusterer,
    scorer: &'a dyn QualityScorer,
    seed: u64,
    parallel: bool,
}

impl<'a> ClusterCountSelector<'a> {
    pub fn new(clusterer: &'a dyn Clusterer, scorer: &'a dyn QualityScorer) -> Self {
        Self {
            clusterer,
            scorer,
            seed: 42,
            parallel: true,
        }
    }

    /// Seed handed to every clustering call.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Evaluate candidates concurrently.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn evaluate(&self, data: &CsrMatrix, k: usize) -> Result<ClusterCandidate, EncodingError> {
        let labels = self.clusterer.fit_predict(data, k, self.seed)?;
        let score = self
            .scorer
            .score(data, &labels)?
            .filter(|s| !s.is_nan());
        debug!(
            k,
            score,
            clusterer = self.clusterer.name(),
            scorer = self.scorer.name(),
            "evaluated cluster count"
        );
        Ok(ClusterCandidate { k, labels, score })
    }

    /// Run the search and return the best candidate.
    ///
    /// Candidates above the row count are skipped. If no candidate can be
    /// scored the smallest `k` is returned.
    pub fn select(&self, data: &CsrMatrix, range: SearchRange) -> Result<Selection, EncodingError> {
        let requested = range;
        let range = range.capped_at(data.n_rows());
        if range != requested {
            debug!(
                n_rows = data.n_rows(),
                k_max = requested.k_max,
                "cluster search range capped at row count"
            );
        }
        if range.is_empty() || range.k_min == 0 {
            return Err(EncodingError::invalid(
                "max_clusters",
                format!("empty cluster search range {}..={}", range.k_min, range.k_max),
            ));
        }

        let ks: Vec<usize> = range.iter().collect();
        let candidates: Vec<ClusterCandidate> = if self.parallel {
            ks.par_iter()
                .map(|&k| self.evaluate(data, k))
                .collect::<Result<_, _>>()?
        } else {
            ks.iter()
                .map(|&k| self.evaluate(data, k))
                .collect::<Result<_, _>>()?
        };

        Ok(reduce_candidates(candidates))
    }
}

/// Keep the strictly best score in ascending `k`, so ties go to the smaller `k`.
fn reduce_candidates(mut candidates: Vec<ClusterCandidate>) -> Selection {
    candidates.sort_by_key(|c| c.k);
    let trace: Vec<CandidateScore> = candidates
        .iter()
        .map(|c| CandidateScore {
            k: c.k,
            score: c.score,
        })
        .collect();

    let mut best_idx = 0;
    let mut best_score: Option<f64> = None;
    for (idx, candidate) in candidates.iter().enumerate() {
        if let Some(score) = candidate.score {
            if best_score.map_or(true, |best| score > best) {
                best_idx = idx;
                best_score = Some(score);
            }
        }
    }

    let best = candidates.swap_remove(best_idx);
    Selection {
        k: best.k,
        labels: best.labels,
        score: best_score,
        trace,
    }
}
