//! Mini-batch k-means for large inputs.
//!
//! Trades exactness for a bounded cost per step: centres are moved towards
//! the rows of small random batches with a per-centre learning rate of
//! `1 / (points seen)`, and the run stops early once the smoothed batch
//! inertia stops improving.
//!
//! Centres that win almost no rows are periodically moved onto random rows
//! of the current batch, so clusters do not stay empty on sparse data.

use ndarray::Array2;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::clustering::centers::{
    assign_to_centers, center_norms, kmeans_plus_plus, nearest_center,
};
use crate::clustering::kmeans::{check_cluster_count, KMeansFit};
use crate::clustering::traits::Clusterer;
use crate::preprocessing::error::EncodingError;
use crate::sparse::CsrMatrix;

/// Steps between two checks for starved centres.
const REASSIGN_EVERY: usize = 10;

/// Mini-batch k-means clusterer.
#[derive(Clone, Debug)]
pub struct MiniBatchKMeans {
    batch_size: usize,
    max_iter: usize,
    max_no_improvement: usize,
    n_init: usize,
    reassignment_ratio: f64,
    parallel: bool,
}

impl Default for MiniBatchKMeans {
    fn default() -> Self {
        Self::new()
    }
}

impl MiniBatchKMeans {
    /// Batches of 1000 rows, at most 100 passes, early stop after 10 flat steps.
    pub fn new() -> Self {
        Self {
            batch_size: 1000,
            max_iter: 100,
            max_no_improvement: 10,
            n_init: 3,
            reassignment_ratio: 0.01,
            parallel: true,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Maximum number of passes over the data.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Steps without improvement of the smoothed inertia before stopping.
    pub fn with_max_no_improvement(mut self, steps: usize) -> Self {
        self.max_no_improvement = steps;
        self
    }

    /// Number of k-means++ seedings tried on the init subsample.
    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    /// Centres whose count falls below `ratio` times the largest count are
    /// reassigned. Zero disables reassignment.
    pub fn with_reassignment_ratio(mut self, ratio: f64) -> Self {
        self.reassignment_ratio = ratio;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Fit and return labels, full-data inertia and the number of steps taken.
    pub fn fit(
        &self,
        data: &CsrMatrix,
        n_clusters: usize,
        seed: u64,
    ) -> Result<KMeansFit, EncodingError> {
        check_cluster_count(data, n_clusters)?;
        if self.batch_size == 0 {
            return Err(EncodingError::invalid("minibatch_batch_size", "must be at least 1"));
        }
        if self.max_iter == 0 {
            return Err(EncodingError::invalid("minibatch_max_iter", "must be at least 1"));
        }
        if self.n_init == 0 {
            return Err(EncodingError::invalid("n_init", "must be at least 1"));
        }

        let n = data.n_rows();
        let row_norms = data.row_squared_norms();
        let batch_size = self.batch_size.min(n);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let init_size = (3 * batch_size).max(3 * n_clusters).min(n);
        let mut init_rows = index::sample(&mut rng, n, init_size).into_vec();
        init_rows.sort_unstable();
        let mut centers = self.seed_centers(data, &row_norms, &init_rows, n_clusters, &mut rng);

        let mut counts = vec![0.0f64; n_clusters];
        let n_steps = self.max_iter * n.div_ceil(batch_size);
        let alpha = (2.0 * batch_size as f64 / (n as f64 + 1.0)).min(1.0);
        let mut smoothed: Option<f64> = None;
        let mut best_smoothed = f64::INFINITY;
        let mut no_improvement = 0;
        let mut steps = 0;

        for step in 0..n_steps {
            steps = step + 1;
            let batch: Vec<usize> = (0..batch_size).map(|_| rng.gen_range(0..n)).collect();
            let norms = center_norms(&centers);
            let assignment: Vec<(usize, f64)> = batch
                .iter()
                .map(|&i| nearest_center(&data.row(i), row_norms[i], &centers, &norms))
                .collect();
            let batch_inertia =
                assignment.iter().map(|&(_, d)| d).sum::<f64>() / batch_size as f64;

            for (&i, &(c, _)) in batch.iter().zip(&assignment) {
                counts[c] += 1.0;
                let eta = 1.0 / counts[c];
                let mut center = centers.row_mut(c);
                center *= 1.0 - eta;
                data.row(i).scaled_add_to(eta, &mut center);
            }

            if self.reassignment_ratio > 0.0 && steps % REASSIGN_EVERY == 0 && steps < n_steps {
                let moved = reassign_starved_centers(
                    data,
                    &mut centers,
                    &mut counts,
                    &batch,
                    self.reassignment_ratio,
                    &mut rng,
                );
                if moved > 0 {
                    trace!(step, moved, "reassigned starved centres");
                }
            }

            let ewa = match smoothed {
                Some(prev) => prev * (1.0 - alpha) + batch_inertia * alpha,
                None => batch_inertia,
            };
            smoothed = Some(ewa);
            trace!(step, batch_inertia, ewa, "mini-batch step");

            if ewa < best_smoothed {
                best_smoothed = ewa;
                no_improvement = 0;
            } else {
                no_improvement += 1;
                if no_improvement >= self.max_no_improvement {
                    debug!(step, "mini-batch k-means converged: no improvement");
                    break;
                }
            }
        }

        let assignment = assign_to_centers(data, &row_norms, &centers, self.parallel);
        let inertia = assignment.iter().map(|&(_, d)| d).sum();
        Ok(KMeansFit {
            labels: assignment.into_iter().map(|(c, _)| c).collect(),
            inertia,
            n_iter: steps,
        })
    }

    /// Best of `n_init` k-means++ seedings, judged by inertia on the init rows.
    fn seed_centers(
        &self,
        data: &CsrMatrix,
        row_norms: &[f64],
        init_rows: &[usize],
        n_clusters: usize,
        rng: &mut ChaCha8Rng,
    ) -> Array2<f64> {
        let mut best: Option<(f64, Array2<f64>)> = None;
        for _ in 0..self.n_init {
            let centers = kmeans_plus_plus(data, row_norms, init_rows, n_clusters, rng);
            let norms = center_norms(&centers);
            let inertia: f64 = init_rows
                .iter()
                .map(|&i| nearest_center(&data.row(i), row_norms[i], &centers, &norms).1)
                .sum();
            if best.as_ref().map_or(true, |(b, _)| inertia < *b) {
                best = Some((inertia, centers));
            }
        }
        match best {
            Some((_, centers)) => centers,
            None => kmeans_plus_plus(data, row_norms, init_rows, n_clusters, rng),
        }
    }
}

/// Move centres with a count below `ratio * max(counts)` onto random batch rows.
///
/// A moved centre takes the smallest count among the kept centres so that it
/// is neither frozen nor immediately starved again. Returns the number moved.
fn reassign_starved_centers(
    data: &CsrMatrix,
    centers: &mut Array2<f64>,
    counts: &mut [f64],
    batch: &[usize],
    ratio: f64,
    rng: &mut ChaCha8Rng,
) -> usize {
    let max_count = counts.iter().copied().fold(0.0, f64::max);
    let threshold = ratio * max_count;
    let starved: Vec<usize> = (0..counts.len())
        .filter(|&c| counts[c] < threshold)
        .collect();
    if starved.is_empty() || batch.is_empty() {
        return 0;
    }

    let floor = counts
        .iter()
        .copied()
        .filter(|&n| n >= threshold)
        .fold(max_count, f64::min);
    for &c in &starved {
        let row = batch[rng.gen_range(0..batch.len())];
        let mut center = centers.row_mut(c);
        center.fill(0.0);
        data.row(row).scaled_add_to(1.0, &mut center);
        counts[c] = floor;
    }
    starved.len()
}

impl Clusterer for MiniBatchKMeans {
    fn name(&self) -> &'static str {
        "minibatch_kmeans"
    }

    fn fit_predict(
        &self,
        data: &CsrMatrix,
        n_clusters: usize,
        seed: u64,
    ) -> Result<Vec<usize>, EncodingError> {
        self.fit(data, n_clusters, seed).map(|fit| fit.labels)
    }
}
