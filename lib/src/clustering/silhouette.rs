//! Silhouette score over sparse rows.
//!
//! For row `i` with mean intra-cluster distance `a` and smallest mean
//! distance to another cluster `b`:
//!
//! ```text
//! s(i) = (b - a) / max(a, b)
//! ```
//!
//! `s(i)` is 0 for members of singleton clusters. The score is the mean of
//! `s(i)` over all rows and lies in `[-1, 1]`.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::clustering::traits::QualityScorer;
use crate::preprocessing::error::EncodingError;
use crate::sparse::CsrMatrix;

/// Euclidean silhouette scorer.
#[derive(Clone, Debug)]
pub struct SilhouetteScorer {
    parallel: bool,
}

impl Default for SilhouetteScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SilhouetteScorer {
    pub fn new() -> Self {
        Self { parallel: true }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl QualityScorer for SilhouetteScorer {
    fn name(&self) -> &'static str {
        "silhouette"
    }

    fn score(&self, data: &CsrMatrix, labels: &[usize]) -> Result<Option<f64>, EncodingError> {
        let n = data.n_rows();
        if labels.len() != n {
            return Err(EncodingError::InvalidShape {
                expected: format!("{} labels", n),
                got: format!("{} labels", labels.len()),
            });
        }

        // Labels may have gaps; score only the clusters that are present.
        let mut dense_ids: BTreeMap<usize, usize> = BTreeMap::new();
        for &label in labels {
            let next = dense_ids.len();
            dense_ids.entry(label).or_insert(next);
        }
        let n_clusters = dense_ids.len();
        if n_clusters < 2 || n_clusters == n {
            return Ok(None);
        }

        let members: Vec<usize> = labels.iter().map(|l| dense_ids[l]).collect();
        let mut sizes = vec![0usize; n_clusters];
        for &m in &members {
            sizes[m] += 1;
        }

        let norms = data.row_squared_norms();
        let sample = |i: usize| -> f64 {
            let own = members[i];
            if sizes[own] <= 1 {
                return 0.0;
            }
            let mut sums = vec![0.0; n_clusters];
            for j in 0..n {
                if j != i {
                    sums[members[j]] += data.row_squared_distance(i, j, &norms).sqrt();
                }
            }
            let a = sums[own] / (sizes[own] - 1) as f64;
            let b = (0..n_clusters)
                .filter(|&c| c != own)
                .map(|c| sums[c] / sizes[c] as f64)
                .fold(f64::INFINITY, f64::min);
            let denom = a.max(b);
            if denom > 0.0 {
                (b - a) / denom
            } else {
                0.0
            }
        };

        let values: Vec<f64> = if self.parallel {
            (0..n).into_par_iter().map(sample).collect()
        } else {
            (0..n).map(sample).collect()
        };
        let mean = values.iter().sum::<f64>() / n as f64;
        if !mean.is_finite() {
            return Err(EncodingError::NumericalError(format!(
                "silhouette score is not finite: {}",
                mean
            )));
        }
        Ok(Some(mean))
    }
}
