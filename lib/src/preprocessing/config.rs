//! Encoder configuration.

use serde::{Deserialize, Serialize};

use crate::clustering::DEFAULT_MAX_CLUSTERS;
use crate::preprocessing::error::EncodingError;
use crate::text::DEFAULT_MAX_FEATURES;

/// Configuration for [`AdaptiveCategoricalEncoder`](crate::preprocessing::AdaptiveCategoricalEncoder).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Columns with at most this many distinct values are one-hot encoded.
    pub binary_threshold: usize,
    /// Columns with more distinct values than this skip the greedy search.
    pub fast_threshold: usize,
    /// Vocabulary cap of the TF-IDF vectorizer.
    pub max_vocabulary_size: usize,
    /// Tables with more rows than this skip the greedy search.
    pub large_dataset_row_cutoff: usize,
    /// Seed threaded through every clustering call.
    pub random_seed: u64,
    /// Restarts of exact k-means.
    pub n_init: usize,
    /// Remove encoded source columns from the output.
    pub drop_original_columns: bool,
    /// Absolute ceiling on the searched cluster count.
    pub max_clusters: usize,
    /// Upper bound of the heuristic cluster count.
    pub heuristic_max_clusters: usize,
    /// Lloyd iteration cap per k-means restart.
    pub kmeans_max_iter: usize,
    /// Relative centre-shift tolerance of k-means.
    pub kmeans_tol: f64,
    /// Rows per mini-batch step.
    pub minibatch_batch_size: usize,
    /// Maximum passes over the data for mini-batch k-means.
    pub minibatch_max_iter: usize,
    /// Flat steps before mini-batch k-means stops early.
    pub minibatch_max_no_improvement: usize,
    /// Encode columns and search candidates on the rayon pool.
    pub parallel: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            binary_threshold: 10,
            fast_threshold: 50,
            max_vocabulary_size: DEFAULT_MAX_FEATURES,
            large_dataset_row_cutoff: 2000,
            random_seed: 42,
            n_init: 5,
            drop_original_columns: true,
            max_clusters: DEFAULT_MAX_CLUSTERS,
            heuristic_max_clusters: 50,
            kmeans_max_iter: 300,
            kmeans_tol: 1e-4,
            minibatch_batch_size: 1000,
            minibatch_max_iter: 100,
            minibatch_max_no_improvement: 10,
            parallel: true,
        }
    }
}

fn at_least(param: &'static str, value: usize, min: usize) -> Result<(), EncodingError> {
    if value < min {
        return Err(EncodingError::invalid(
            param,
            format!("must be at least {}, got {}", min, value),
        ));
    }
    Ok(())
}

impl EncoderConfig {
    /// Check every field. Called before any column is touched.
    ///
    /// `max_clusters` must be at least 3 so that pulling `k_min` down to
    /// `max_clusters - 1` still leaves a valid range starting at 2.
    pub fn validate(&self) -> Result<(), EncodingError> {
        at_least("binary_threshold", self.binary_threshold, 1)?;
        at_least("fast_threshold", self.fast_threshold, 1)?;
        at_least("max_vocabulary_size", self.max_vocabulary_size, 1)?;
        at_least("large_dataset_row_cutoff", self.large_dataset_row_cutoff, 1)?;
        at_least("n_init", self.n_init, 1)?;
        at_least("max_clusters", self.max_clusters, 3)?;
        at_least("heuristic_max_clusters", self.heuristic_max_clusters, 2)?;
        at_least("kmeans_max_iter", self.kmeans_max_iter, 1)?;
        at_least("minibatch_batch_size", self.minibatch_batch_size, 1)?;
        at_least("minibatch_max_iter", self.minibatch_max_iter, 1)?;
        at_least(
            "minibatch_max_no_improvement",
            self.minibatch_max_no_improvement,
            1,
        )?;
        if !self.kmeans_tol.is_finite() || self.kmeans_tol < 0.0 {
            return Err(EncodingError::invalid(
                "kmeans_tol",
                format!("must be finite and non-negative, got {}", self.kmeans_tol),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialization::SerializableParams;
    use rstest::rstest;

    #[test]
    fn test_default_config_is_valid() {
        let config = EncoderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.binary_threshold, 10);
        assert_eq!(config.fast_threshold, 50);
        assert_eq!(config.max_vocabulary_size, 500);
        assert_eq!(config.large_dataset_row_cutoff, 2000);
        assert_eq!(config.n_init, 5);
        assert_eq!(config.max_clusters, 200);
    }

    #[rstest]
    #[case::binary(EncoderConfig { binary_threshold: 0, ..Default::default() }, "binary_threshold")]
    #[case::fast(EncoderConfig { fast_threshold: 0, ..Default::default() }, "fast_threshold")]
    #[case::vocab(EncoderConfig { max_vocabulary_size: 0, ..Default::default() }, "max_vocabulary_size")]
    #[case::rows(EncoderConfig { large_dataset_row_cutoff: 0, ..Default::default() }, "large_dataset_row_cutoff")]
    #[case::restarts(EncoderConfig { n_init: 0, ..Default::default() }, "n_init")]
    #[case::ceiling(EncoderConfig { max_clusters: 2, ..Default::default() }, "max_clusters")]
    #[case::heuristic(EncoderConfig { heuristic_max_clusters: 1, ..Default::default() }, "heuristic_max_clusters")]
    #[case::tol(EncoderConfig { kmeans_tol: f64::NAN, ..Default::default() }, "kmeans_tol")]
    #[case::batch(EncoderConfig { minibatch_batch_size: 0, ..Default::default() }, "minibatch_batch_size")]
    fn test_invalid_config_names_parameter(#[case] config: EncoderConfig, #[case] expected: &str) {
        match config.validate() {
            Err(EncodingError::InvalidParameter { param, .. }) => assert_eq!(param, expected),
            other => panic!("expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_config_save_load() {
        let config = EncoderConfig {
            binary_threshold: 4,
            random_seed: 7,
            drop_original_columns: false,
            ..Default::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("encoder.bin");
        config.save_to_file(&path).unwrap();
        let loaded = EncoderConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_json() {
        let json = serde_json::to_string(&EncoderConfig::default()).unwrap();
        let back: EncoderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EncoderConfig::default());
    }
}
