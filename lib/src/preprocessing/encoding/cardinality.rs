//! Routing of text columns by cardinality.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::preprocessing::config::EncoderConfig;

/// Encoding chosen for a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncodingPath {
    /// One indicator column per distinct value plus a null indicator.
    OneHot,
    /// TF-IDF vectorization followed by clustering into a label column.
    Cluster,
}

/// How the cluster count of a clustered column was chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMethod {
    /// Silhouette-scored linear search, exact k-means.
    GreedySearch,
    /// `clamp(u / 10, 2, heuristic_max_clusters)`, mini-batch k-means.
    Heuristic,
}

impl fmt::Display for EncodingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingPath::OneHot => write!(f, "one_hot"),
            EncodingPath::Cluster => write!(f, "cluster"),
        }
    }
}

impl fmt::Display for SelectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMethod::GreedySearch => write!(f, "greedy"),
            SelectionMethod::Heuristic => write!(f, "heuristic"),
        }
    }
}

/// Number of distinct non-null values.
pub fn count_unique(values: &[Option<String>]) -> usize {
    values
        .iter()
        .flatten()
        .map(String::as_str)
        .collect::<HashSet<&str>>()
        .len()
}

/// Heuristic cluster count for the approximate path: `clamp(u / 10, 2, max)`.
pub fn heuristic_cluster_count(n_unique: usize, max_clusters: usize) -> usize {
    (n_unique / 10).max(2).min(max_clusters)
}

/// Decides one-hot vs clustering, and greedy vs heuristic cluster counts.
///
/// Pure function of the distinct-value count, the row count and the
/// configured thresholds.
#[derive(Clone, Copy, Debug)]
pub struct CardinalityClassifier {
    binary_threshold: usize,
    fast_threshold: usize,
    large_dataset_row_cutoff: usize,
}

impl CardinalityClassifier {
    pub fn new(binary_threshold: usize, fast_threshold: usize, large_dataset_row_cutoff: usize) -> Self {
        Self {
            binary_threshold,
            fast_threshold,
            large_dataset_row_cutoff,
        }
    }

    pub fn from_config(config: &EncoderConfig) -> Self {
        Self::new(
            config.binary_threshold,
            config.fast_threshold,
            config.large_dataset_row_cutoff,
        )
    }

    /// `OneHot` when `n_unique <= binary_threshold`, otherwise `Cluster`.
    pub fn classify(&self, n_unique: usize) -> EncodingPath {
        if n_unique <= self.binary_threshold {
            EncodingPath::OneHot
        } else {
            EncodingPath::Cluster
        }
    }

    /// The heuristic path is forced by high cardinality or by a large table.
    /// The two triggers are independent.
    pub fn selection_method(&self, n_unique: usize, n_rows: usize) -> SelectionMethod {
        if n_unique > self.fast_threshold || n_rows > self.large_dataset_row_cutoff {
            SelectionMethod::Heuristic
        } else {
            SelectionMethod::GreedySearch
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn classifier() -> CardinalityClassifier {
        CardinalityClassifier::from_config(&EncoderConfig::default())
    }

    #[test]
    fn test_count_unique_ignores_nulls() {
        let values = vec![
            Some("a".to_string()),
            None,
            Some("b".to_string()),
            Some("a".to_string()),
            None,
        ];
        assert_eq!(count_unique(&values), 2);
        assert_eq!(count_unique(&[]), 0);
    }

    #[rstest]
    #[case(0, EncodingPath::OneHot)]
    #[case(3, EncodingPath::OneHot)]
    #[case(10, EncodingPath::OneHot)]
    #[case(11, EncodingPath::Cluster)]
    #[case(5000, EncodingPath::Cluster)]
    fn test_classify(#[case] n_unique: usize, #[case] expected: EncodingPath) {
        assert_eq!(classifier().classify(n_unique), expected);
    }

    #[rstest]
    #[case(50, 2000, SelectionMethod::GreedySearch)]
    #[case(51, 100, SelectionMethod::Heuristic)]
    #[case(20, 2001, SelectionMethod::Heuristic)]
    #[case(120, 300, SelectionMethod::Heuristic)]
    #[case(5000, 10_000, SelectionMethod::Heuristic)]
    fn test_selection_method(
        #[case] n_unique: usize,
        #[case] n_rows: usize,
        #[case] expected: SelectionMethod,
    ) {
        assert_eq!(classifier().selection_method(n_unique, n_rows), expected);
    }

    #[rstest]
    #[case(11, 2)]
    #[case(35, 3)]
    #[case(499, 49)]
    #[case(5000, 50)]
    fn test_heuristic_cluster_count(#[case] n_unique: usize, #[case] expected: usize) {
        assert_eq!(heuristic_cluster_count(n_unique, 50), expected);
    }
}
