//! Adaptive encoding of categorical text columns.
//!
//! Each text column is routed by its number of distinct values:
//!
//! - at most `binary_threshold` values: one-hot encoding with a null indicator
//! - more: TF-IDF vectors clustered with k-means into one label column, with
//!   the cluster count chosen by a silhouette-scored search, or by a
//!   heuristic with mini-batch k-means for high-cardinality columns and
//!   large tables
//!
//! # Core Traits
//!
//! - [`Transformer`]: Unfitted transformer with hyperparameters
//! - [`FittedTransformer`]: Fitted transformer for one encoding pass
//!
//! # Example
//!
//! ```ignore
//! use catencode_rs::preprocessing::AdaptiveCategoricalEncoder;
//! use catencode_rs::table::{Column, Table};
//!
//! let table = Table::new(vec![
//!     Column::text("color", vec![Some("red"), Some("blue"), None]),
//! ])?;
//!
//! let encoded = AdaptiveCategoricalEncoder::new().encode(&table)?;
//! // color_blue, color_red, color_nan
//! println!("{}", encoded.report.to_json()?);
//! ```

pub mod adaptive;
pub mod config;
pub mod describe;
pub mod encoding;
pub mod error;
pub mod report;
pub mod traits;

pub use adaptive::{encode_column, AdaptiveCategoricalEncoder, EncodedColumn, EncodedTable};
pub use config::EncoderConfig;
pub use describe::{describe_text_columns, TextColumnProfile};
pub use encoding::{
    CardinalityClassifier, ClusterAssignment, ClusteringStrategies, EncodingPath, EncodingResult,
    FittedOneHotEncoder, OneHotEncoder, SelectionMethod,
};
pub use error::EncodingError;
pub use report::{ColumnOutcome, ColumnReport, EncodingReport};
pub use traits::{FittedTransformer, Transformer};
