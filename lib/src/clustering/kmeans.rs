//! Exact (Lloyd) k-means over sparse rows.
//!
//! Each restart is seeded with greedy k-means++ and refined with full Lloyd
//! iterations. The restart with the lowest inertia wins; on equal inertia the
//! earlier restart is kept. All restarts draw from one RNG seeded with the
//! caller's seed, so a fixed seed gives identical labels on every run.
//!
//! # Example
//! ```ignore
//! use catencode_rs::clustering::{Clusterer, KMeans};
//!
//! let kmeans = KMeans::new().with_n_init(5);
//! let labels = kmeans.fit_predict(&tfidf_rows, 8, 42)?;
//! ```

use ndarray::Array2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use crate::clustering::centers::{assign_to_centers, kmeans_plus_plus};
use crate::clustering::traits::Clusterer;
use crate::preprocessing::error::EncodingError;
use crate::sparse::CsrMatrix;

/// Result of a k-means fit.
#[derive(Clone, Debug)]
pub struct KMeansFit {
    /// Cluster label of every row.
    pub labels: Vec<usize>,
    /// Sum of squared distances of rows to their centre.
    pub inertia: f64,
    /// Lloyd iterations used by the winning restart.
    pub n_iter: usize,
}

/// Validate `n_clusters` against the data. Shared with the mini-batch variant.
pub(crate) fn check_cluster_count(data: &CsrMatrix, n_clusters: usize) -> Result<(), EncodingError> {
    if data.n_rows() == 0 {
        return Err(EncodingError::EmptyData(
            "Cannot cluster an empty matrix".to_string(),
        ));
    }
    if n_clusters == 0 {
        return Err(EncodingError::invalid("n_clusters", "must be at least 1"));
    }
    if n_clusters > data.n_rows() {
        return Err(EncodingError::invalid(
            "n_clusters",
            format!(
                "{} clusters requested for {} rows",
                n_clusters,
                data.n_rows()
            ),
        ));
    }
    Ok(())
}

/// Exact k-means clusterer.
#[derive(Clone, Debug)]
pub struct KMeans {
    n_init: usize,
    max_iter: usize,
    tol: f64,
    parallel: bool,
}

impl Default for KMeans {
    fn default() -> Self {
        Self::new()
    }
}

impl KMeans {
    /// Create a k-means clusterer with 5 restarts, 300 iterations and `tol = 1e-4`.
    pub fn new() -> Self {
        Self {
            n_init: 5,
            max_iter: 300,
            tol: 1e-4,
            parallel: true,
        }
    }

    /// Set the number of seeded restarts.
    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    /// Set the Lloyd iteration cap per restart.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the relative centre-shift tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Enable or disable row-parallel assignment.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Fit and return labels, inertia and iteration count.
    pub fn fit(
        &self,
        data: &CsrMatrix,
        n_clusters: usize,
        seed: u64,
    ) -> Result<KMeansFit, EncodingError> {
        check_cluster_count(data, n_clusters)?;
        if self.n_init == 0 {
            return Err(EncodingError::invalid("n_init", "must be at least 1"));
        }
        if self.max_iter == 0 {
            return Err(EncodingError::invalid("kmeans_max_iter", "must be at least 1"));
        }

        let row_norms = data.row_squared_norms();
        let tol = self.tol * data.mean_feature_variance();
        let rows: Vec<usize> = (0..data.n_rows()).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut best: Option<KMeansFit> = None;
        for run in 0..self.n_init {
            let centers = kmeans_plus_plus(data, &row_norms, &rows, n_clusters, &mut rng);
            let fit = self.lloyd(data, &row_norms, centers, tol);
            trace!(run, inertia = fit.inertia, n_iter = fit.n_iter, "k-means restart");
            if best.as_ref().map_or(true, |b| fit.inertia < b.inertia) {
                best = Some(fit);
            }
        }

        best.ok_or_else(|| EncodingError::invalid("n_init", "must be at least 1"))
    }

    fn lloyd(
        &self,
        data: &CsrMatrix,
        row_norms: &[f64],
        mut centers: Array2<f64>,
        tol: f64,
    ) -> KMeansFit {
        let mut labels: Vec<usize> = Vec::new();
        let mut n_iter = 0;

        for iter in 0..self.max_iter {
            n_iter = iter + 1;
            let assignment = assign_to_centers(data, row_norms, &centers, self.parallel);
            let new_labels: Vec<usize> = assignment.iter().map(|&(c, _)| c).collect();
            if new_labels == labels {
                break;
            }
            labels = new_labels;

            let distances: Vec<f64> = assignment.iter().map(|&(_, d)| d).collect();
            let new_centers = update_centers(data, &labels, &distances, &centers);
            let shift: f64 = (&new_centers - &centers).mapv(|x| x * x).sum();
            centers = new_centers;
            if shift <= tol {
                break;
            }
        }

        let assignment = assign_to_centers(data, row_norms, &centers, self.parallel);
        let inertia = assignment.iter().map(|&(_, d)| d).sum();
        KMeansFit {
            labels: assignment.into_iter().map(|(c, _)| c).collect(),
            inertia,
            n_iter,
        }
    }
}

/// Recompute centres as member means.
///
/// Empty clusters take over the rows farthest from their current centre,
/// skipping rows whose own cluster would become empty. A cluster that still
/// has no member keeps its previous centre.
fn update_centers(
    data: &CsrMatrix,
    labels: &[usize],
    distances: &[f64],
    previous: &Array2<f64>,
) -> Array2<f64> {
    let k = previous.nrows();
    let mut sums = Array2::<f64>::zeros(previous.raw_dim());
    let mut counts = vec![0usize; k];
    for (i, &label) in labels.iter().enumerate() {
        data.row(i).scaled_add_to(1.0, &mut sums.row_mut(label));
        counts[label] += 1;
    }

    let empty: Vec<usize> = (0..k).filter(|&c| counts[c] == 0).collect();
    if !empty.is_empty() {
        let mut farthest: Vec<usize> = (0..labels.len()).collect();
        farthest.sort_by(|&a, &b| {
            distances[b]
                .partial_cmp(&distances[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let mut donors = farthest.into_iter();
        for &cluster in &empty {
            for point in donors.by_ref() {
                let owner = labels[point];
                if counts[owner] > 1 {
                    let row = data.row(point);
                    row.scaled_add_to(-1.0, &mut sums.row_mut(owner));
                    counts[owner] -= 1;
                    row.scaled_add_to(1.0, &mut sums.row_mut(cluster));
                    counts[cluster] += 1;
                    break;
                }
            }
        }
    }

    let mut centers = previous.clone();
    for (c, &count) in counts.iter().enumerate() {
        if count > 0 {
            let mean = &sums.row(c) / count as f64;
            centers.row_mut(c).assign(&mean);
        }
    }
    centers
}

impl Clusterer for KMeans {
    fn name(&self) -> &'static str {
        "kmeans"
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
