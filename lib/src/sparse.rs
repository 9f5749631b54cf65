//! Compressed sparse row matrix.
//!
//! Vectorized text columns are very sparse (a handful of terms per row out of
//! up to a few hundred vocabulary entries), so rows are stored in CSR form and
//! cluster centres are kept dense as [`ndarray::Array2`] rows.

use ndarray::{ArrayView1, ArrayViewMut1};

use crate::preprocessing::error::EncodingError;

/// A borrowed sparse row: sorted column indices and their values.
#[derive(Clone, Copy, Debug)]
pub struct SparseRow<'a> {
    pub indices: &'a [usize],
    pub values: &'a [f64],
}

impl<'a> SparseRow<'a> {
    /// Squared L2 norm.
    pub fn squared_norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum()
    }

    /// Dot product with another sparse row (merge of sorted indices).
    pub fn dot(&self, other: &SparseRow<'_>) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut acc = 0.0;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    acc += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        acc
    }

    /// Dot product with a dense vector.
    pub fn dot_dense(&self, dense: &ArrayView1<'_, f64>) -> f64 {
        self.indices
            .iter()
            .zip(self.values)
            .map(|(&idx, &v)| v * dense[idx])
            .sum()
    }

    /// `dense += scale * self`
    pub fn scaled_add_to(&self, scale: f64, dense: &mut ArrayViewMut1<'_, f64>) {
        for (&idx, &v) in self.indices.iter().zip(self.values) {
            dense[idx] += scale * v;
        }
    }
}

/// Row-major sparse matrix in CSR layout.
#[derive(Clone, Debug, PartialEq)]
pub struct CsrMatrix {
    n_rows: usize,
    n_cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
}

impl CsrMatrix {
    /// Build a matrix from per-row `(column, value)` entries.
    ///
    /// Entries of a row are sorted by column; zero values are dropped.
    pub fn from_rows(n_cols: usize, rows: Vec<Vec<(usize, f64)>>) -> Result<Self, EncodingError> {
        let n_rows = rows.len();
        let mut indptr = Vec::with_capacity(n_rows + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);

        for (r, mut row) in rows.into_iter().enumerate() {
            row.sort_by_key(|&(c, _)| c);
            for (c, v) in row {
                if c >= n_cols {
                    return Err(EncodingError::InvalidShape {
                        expected: format!("column index < {}", n_cols),
                        got: format!("{} in row {}", c, r),
                    });
                }
                if !v.is_finite() {
                    return Err(EncodingError::NumericalError(format!(
                        "non-finite value {} at ({}, {})",
                        v, r, c
                    )));
                }
                if v != 0.0 {
                    indices.push(c);
                    data.push(v);
                }
            }
            indptr.push(indices.len());
        }

        Ok(Self {
            n_rows,
            n_cols,
            indptr,
            indices,
            data,
        })
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    pub fn row(&self, i: usize) -> SparseRow<'_> {
        let (start, end) = (self.indptr[i], self.indptr[i + 1]);
        SparseRow {
            indices: &self.indices[start..end],
            values: &self.data[start..end],
        }
    }

    /// Squared L2 norm of every row.
    pub fn row_squared_norms(&self) -> Vec<f64> {
        (0..self.n_rows).map(|i| self.row(i).squared_norm()).collect()
    }

    /// Squared Euclidean distance between rows `i` and `j`.
    pub fn row_squared_distance(&self, i: usize, j: usize, norms: &[f64]) -> f64 {
        (norms[i] + norms[j] - 2.0 * self.row(i).dot(&self.row(j))).max(0.0)
    }

    /// Mean of the per-feature variances, used to scale convergence tolerances.
    pub fn mean_feature_variance(&self) -> f64 {
        if self.n_rows == 0 || self.n_cols == 0 {
            return 0.0;
        }
        let n = self.n_rows as f64;
        let mut sum = vec![0.0; self.n_cols];
        let mut sum_sq = vec![0.0; self.n_cols];
        for (&c, &v) in self.indices.iter().zip(&self.data) {
            sum[c] += v;
            sum_sq[c] += v * v;
        }
        let total: f64 = sum
            .iter()
            .zip(&sum_sq)
            .map(|(&s, &sq)| {
                let mean = s / n;
                (sq / n - mean * mean).max(0.0)
            })
            .sum();
        total / self.n_cols as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array1;

    fn sample() -> CsrMatrix {
        // [[1, 0, 2],
        //  [0, 0, 0],
        //  [0, 3, 4]]
        CsrMatrix::from_rows(
            3,
            vec![
                vec![(2, 2.0), (0, 1.0)],
                vec![],
                vec![(1, 3.0), (2, 4.0)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_shape_and_nnz() {
        let m = sample();
        assert_eq!(m.shape(), (3, 3));
        assert_eq!(m.nnz(), 4);
        assert_eq!(m.row(0).indices, &[0, 2]);
        assert!(m.row(1).indices.is_empty());
    }

    #[test]
    fn test_zero_entries_dropped() {
        let m = CsrMatrix::from_rows(2, vec![vec![(0, 0.0), (1, 1.0)]]).unwrap();
        assert_eq!(m.nnz(), 1);
    }

    #[test]
    fn test_out_of_range_column_rejected() {
        let result = CsrMatrix::from_rows(2, vec![vec![(5, 1.0)]]);
        assert!(matches!(result, Err(EncodingError::InvalidShape { .. })));
    }

    #[test]
    fn test_sparse_dot_and_distance() {
        let m = sample();
        assert_relative_eq!(m.row(0).dot(&m.row(2)), 8.0);
        let norms = m.row_squared_norms();
        assert_eq!(norms, vec![5.0, 0.0, 25.0]);
        // |(1, -3, -2)|^2 = 14
        assert_relative_eq!(m.row_squared_distance(0, 2, &norms), 14.0);
        assert_relative_eq!(m.row_squared_distance(1, 1, &norms), 0.0);
    }

    #[test]
    fn test_dense_ops() {
        let m = sample();
        let mut dense = Array1::<f64>::zeros(3);
        m.row(2).scaled_add_to(0.5, &mut dense.view_mut());
        assert_eq!(dense.to_vec(), vec![0.0, 1.5, 2.0]);
        assert_relative_eq!(m.row(0).dot_dense(&dense.view()), 4.0);
    }

    #[test]
    fn test_mean_feature_variance() {
        let m = CsrMatrix::from_rows(1, vec![vec![(0, 1.0)], vec![], vec![(0, 1.0)], vec![]])
            .unwrap();
        // values [1, 0, 1, 0]: variance 0.25
        assert_relative_eq!(m.mean_feature_variance(), 0.25);
    }
}
