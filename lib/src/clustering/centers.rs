//! Centre seeding and nearest-centre assignment shared by the k-means variants.

use ndarray::{Array2, ArrayView1};
use rand::Rng;
use rayon::prelude::*;

use crate::sparse::{CsrMatrix, SparseRow};

/// Squared Euclidean distance between a sparse row and a dense centre.
fn squared_distance(
    row: &SparseRow<'_>,
    row_norm: f64,
    center: &ArrayView1<'_, f64>,
    center_norm: f64,
) -> f64 {
    (row_norm + center_norm - 2.0 * row.dot_dense(center)).max(0.0)
}

/// Squared norm of every centre.
pub(crate) fn center_norms(centers: &Array2<f64>) -> Vec<f64> {
    centers.rows().into_iter().map(|c| c.dot(&c)).collect()
}

/// Index of and squared distance to the closest centre. Ties go to the lower index.
pub(crate) fn nearest_center(
    row: &SparseRow<'_>,
    row_norm: f64,
    centers: &Array2<f64>,
    norms: &[f64],
) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (c, center) in centers.rows().into_iter().enumerate() {
        let d = squared_distance(row, row_norm, &center, norms[c]);
        if d < best.1 {
            best = (c, d);
        }
    }
    best
}

/// Assign every row to its nearest centre.
///
/// Output order follows row order whether or not the work is parallel.
pub(crate) fn assign_to_centers(
    data: &CsrMatrix,
    row_norms: &[f64],
    centers: &Array2<f64>,
    parallel: bool,
) -> Vec<(usize, f64)> {
    let norms = center_norms(centers);
    let nearest = |i: usize| nearest_center(&data.row(i), row_norms[i], centers, &norms);
    if parallel {
        (0..data.n_rows()).into_par_iter().map(nearest).collect()
    } else {
        (0..data.n_rows()).map(nearest).collect()
    }
}

/// Greedy k-means++ seeding over the rows listed in `candidates`.
///
/// Each new centre is the best of `2 + ln(k)` draws proportional to the
/// squared distance to the closest existing centre. When every candidate
/// coincides with an existing centre the draw falls back to uniform.
pub(crate) fn kmeans_plus_plus<R: Rng>(
    data: &CsrMatrix,
    row_norms: &[f64],
    candidates: &[usize],
    k: usize,
    rng: &mut R,
) -> Array2<f64> {
    let n = candidates.len();
    let mut centers = Array2::<f64>::zeros((k, data.n_cols()));
    if n == 0 || k == 0 {
        return centers;
    }
    let n_local_trials = 2 + (k as f64).ln().floor() as usize;

    let first = candidates[rng.gen_range(0..n)];
    data.row(first).scaled_add_to(1.0, &mut centers.row_mut(0));
    let mut closest: Vec<f64> = candidates
        .iter()
        .map(|&i| data.row_squared_distance(i, first, row_norms))
        .collect();
    let mut potential: f64 = closest.iter().sum();

    for c in 1..k {
        let chosen = if potential > 0.0 {
            let mut cumulative = Vec::with_capacity(n);
            let mut running = 0.0;
            for d in &closest {
                running += d;
                cumulative.push(running);
            }

            let mut best_candidate = candidates[0];
            let mut best_potential = f64::INFINITY;
            let mut best_closest = Vec::new();
            for _ in 0..n_local_trials {
                let target = rng.gen::<f64>() * potential;
                let pos = cumulative.partition_point(|&s| s <= target).min(n - 1);
                let candidate = candidates[pos];
                let trial: Vec<f64> = candidates
                    .iter()
                    .zip(&closest)
                    .map(|(&i, &d)| d.min(data.row_squared_distance(i, candidate, row_norms)))
                    .collect();
                let trial_potential: f64 = trial.iter().sum();
                if trial_potential < best_potential {
                    best_candidate = candidate;
                    best_potential = trial_potential;
                    best_closest = trial;
                }
            }
            if !best_closest.is_empty() {
                closest = best_closest;
                potential = best_potential;
            }
            best_candidate
        } else {
            candidates[rng.gen_range(0..n)]
        };

        data.row(chosen).scaled_add_to(1.0, &mut centers.row_mut(c));
    }

    centers
}
