//! Per-column categorical encoders.
//!
//! # Available Encoders
//!
//! ## OneHotEncoder
//! One 0/1 column per distinct value plus a `_nan` indicator.
//!
//! ```ignore
//! // color: ["red", null, "blue"]
//! // color_blue: [0, 0, 1]
//! // color_red:  [1, 0, 0]
//! // color_nan:  [0, 1, 0]
//! ```
//!
//! ## Cluster encoding
//! TF-IDF vectors clustered with k-means into a single
//! `{column}_tfidf_cluster` label column. See [`cluster_column`].
//!
//! [`CardinalityClassifier`] decides which of the two a column gets.

pub mod cardinality;
pub mod cluster;
mod one_hot;

pub use cardinality::{
    count_unique, heuristic_cluster_count, CardinalityClassifier, EncodingPath, SelectionMethod,
};
pub use cluster::{cluster_column, ClusterAssignment, ClusteringStrategies, CLUSTER_COLUMN_SUFFIX};
pub use one_hot::{FittedOneHotEncoder, OneHotEncoder, NULL_INDICATOR_SUFFIX};

use crate::table::Column;

/// Output columns produced for one source column.
#[derive(Clone, Debug, PartialEq)]
pub enum EncodingResult {
    /// Indicator columns: categories in lexicographic order, then `_nan`.
    OneHot { columns: Vec<Column> },
    /// A single label column.
    ClusterAssignment { labels: Column },
}

impl EncodingResult {
    pub fn columns(&self) -> &[Column] {
        match self {
            EncodingResult::OneHot { columns } => columns,
            EncodingResult::ClusterAssignment { labels } => std::slice::from_ref(labels),
        }
    }

    pub fn into_columns(self) -> Vec<Column> {
        match self {
            EncodingResult::OneHot { columns } => columns,
            EncodingResult::ClusterAssignment { labels } => vec![labels],
        }
    }

    pub fn path(&self) -> EncodingPath {
        match self {
            EncodingResult::OneHot { .. } => EncodingPath::OneHot,
            EncodingResult::ClusterAssignment { .. } => EncodingPath::Cluster,
        }
    }
}
