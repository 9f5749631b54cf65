//! # catencode-rs
//!
//! Adaptive encoding of categorical text columns for tabular machine learning.
//!
//! Low-cardinality columns become one-hot indicators. High-cardinality
//! columns are vectorized with TF-IDF and collapsed into a single cluster
//! label column, with the number of clusters chosen by silhouette score or,
//! for large inputs, by a fixed heuristic.
//!
//! ## Quick Start
//!
//! ```rust
//! use catencode_rs::preprocessing::AdaptiveCategoricalEncoder;
//! use catencode_rs::table::{Column, Table};
//!
//! let table = Table::new(vec![
//!     Column::text("color", vec![Some("red"), Some("blue"), None, Some("red")]),
//!     Column::numeric("price", vec![Some(1.0), Some(2.5), Some(3.0), None]),
//! ])
//! .unwrap();
//!
//! let encoded = AdaptiveCategoricalEncoder::new().encode(&table).unwrap();
//! assert_eq!(
//!     encoded.table.column_names(),
//!     vec!["price", "color_blue", "color_red", "color_nan"]
//! );
//! ```
//!
//! ## Module Structure
//!
//! - `table` — In-memory columns and tables
//! - `sparse` — CSR matrix for vectorized text
//! - `text` — TF-IDF vectorizer
//! - `clustering` — k-means, mini-batch k-means, silhouette and the cluster-count search
//! - `preprocessing` — Encoders, configuration, the table orchestrator and its report
//! - `serialization` — Persistence of configs and reports

/// In-memory tabular data.
pub mod table;

/// Sparse row storage.
pub mod sparse;

/// Text vectorization.
pub mod text;

/// Clustering algorithms and quality metrics.
pub mod clustering;

/// Categorical encoders and the table-level orchestrator.
pub mod preprocessing;

/// Persistence of configs and reports.
pub mod serialization;

pub use preprocessing::{
    describe_text_columns, AdaptiveCategoricalEncoder, EncodedTable, EncoderConfig,
    EncodingError, EncodingReport,
};
pub use table::{Column, ColumnData, Table};
