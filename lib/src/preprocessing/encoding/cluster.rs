//! Cluster encoding for high-cardinality text columns.
//!
//! The column is vectorized with TF-IDF, then either searched greedily for
//! the best-scoring cluster count (exact k-means) or clustered directly with
//! a heuristic count (mini-batch k-means).

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::clustering::{
    CandidateScore, ClusterCountSelector, Clusterer, KMeans, MiniBatchKMeans, QualityScorer,
    SearchRange, SilhouetteScorer,
};
use crate::preprocessing::config::EncoderConfig;
use crate::preprocessing::encoding::cardinality::{
    heuristic_cluster_count, CardinalityClassifier, SelectionMethod,
};
use crate::preprocessing::error::EncodingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::text::TfidfVectorizer;

/// Suffix of the cluster label column.
pub const CLUSTER_COLUMN_SUFFIX: &str = "tfidf_cluster";

/// Clustering routines used by the cluster path.
///
/// `exact` backs the greedy search, `approximate` the heuristic path and
/// `scorer` ranks greedy candidates.
#[derive(Clone)]
pub struct ClusteringStrategies {
    pub exact: Arc<dyn Clusterer>,
    pub approximate: Arc<dyn Clusterer>,
    pub scorer: Arc<dyn QualityScorer>,
}

impl ClusteringStrategies {
    pub fn new(
        exact: Arc<dyn Clusterer>,
        approximate: Arc<dyn Clusterer>,
        scorer: Arc<dyn QualityScorer>,
    ) -> Self {
        Self {
            exact,
            approximate,
            scorer,
        }
    }

    /// k-means, mini-batch k-means and the silhouette, tuned from `config`.
    pub fn from_config(config: &EncoderConfig) -> Self {
        let exact = KMeans::new()
            .with_n_init(config.n_init)
            .with_max_iter(config.kmeans_max_iter)
            .with_tol(config.kmeans_tol)
            .with_parallel(config.parallel);
        let approximate = MiniBatchKMeans::new()
            .with_batch_size(config.minibatch_batch_size)
            .with_max_iter(config.minibatch_max_iter)
            .with_max_no_improvement(config.minibatch_max_no_improvement)
            .with_parallel(config.parallel);
        let scorer = SilhouetteScorer::new().with_parallel(config.parallel);
        Self::new(Arc::new(exact), Arc::new(approximate), Arc::new(scorer))
    }
}

impl fmt::Debug for ClusteringStrategies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusteringStrategies")
            .field("exact", &self.exact.name())
            .field("approximate", &self.approximate.name())
            .field("scorer", &self.scorer.name())
            .finish()
    }
}

/// Labels produced for one column along with how they were obtained.
#[derive(Clone, Debug)]
pub struct ClusterAssignment {
    /// One label per row, in `[0, n_clusters)`.
    pub labels: Vec<usize>,
    pub n_clusters: usize,
    pub method: SelectionMethod,
    /// Score of the chosen partition. Only set by the greedy search.
    pub score: Option<f64>,
    /// Every greedy candidate in ascending `k`. Empty for the heuristic path.
    pub trace: Vec<CandidateScore>,
    /// Vocabulary size of the TF-IDF matrix.
    pub n_terms: usize,
}

/// Vectorize `values` and assign every row to a cluster.
///
/// `n_unique` is the distinct non-null count the column was routed with.
///
/// # Errors
/// [`EncodingError::EmptyVocabulary`] when no row yields a token, plus
/// whatever the configured clusterer or scorer returns.
pub fn cluster_column(
    name: &str,
    values: &[Option<String>],
    n_unique: usize,
    config: &EncoderConfig,
    strategies: &ClusteringStrategies,
) -> Result<ClusterAssignment, EncodingError> {
    let fitted = TfidfVectorizer::new(config.max_vocabulary_size)
        .fit(values)
        .map_err(|e| match e {
            EncodingError::EmptyVocabulary(_) => {
                EncodingError::EmptyVocabulary(format!("column `{}`", name))
            }
            other => other,
        })?;
    let n_terms = fitted.n_features_out();
    let matrix = fitted.transform(values)?;

    let method = CardinalityClassifier::from_config(config).selection_method(n_unique, values.len());
    debug!(column = name, n_unique, n_terms, %method, "clustering column");

    match method {
        SelectionMethod::GreedySearch => {
            let range = SearchRange::for_cardinality(n_unique, config.max_clusters);
            let selection =
                ClusterCountSelector::new(strategies.exact.as_ref(), strategies.scorer.as_ref())
                    .with_seed(config.random_seed)
                    .with_parallel(config.parallel)
                    .select(&matrix, range)?;
            Ok(ClusterAssignment {
                labels: selection.labels,
                n_clusters: selection.k,
                method,
                score: selection.score,
                trace: selection.trace,
                n_terms,
            })
        }
        SelectionMethod::Heuristic => {
            let k = heuristic_cluster_count(n_unique, config.heuristic_max_clusters);
            let labels = strategies
                .approximate
                .fit_predict(&matrix, k, config.random_seed)?;
            Ok(ClusterAssignment {
                labels,
                n_clusters: k,
                method,
                score: None,
                trace: Vec::new(),
                n_terms,
            })
        }
    }
}
