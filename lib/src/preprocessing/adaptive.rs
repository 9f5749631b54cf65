//! Table-level orchestrator.
//!
//! Every text column is encoded independently by [`encode_column`]. The
//! results are merged into a copy of the input table in input order; the
//! input table itself is never modified.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::clustering::{Clusterer, QualityScorer};
use crate::preprocessing::config::EncoderConfig;
use crate::preprocessing::encoding::{
    cluster_column, count_unique, CardinalityClassifier, ClusteringStrategies, EncodingPath,
    EncodingResult, OneHotEncoder, CLUSTER_COLUMN_SUFFIX,
};
use crate::preprocessing::error::EncodingError;
use crate::preprocessing::report::{ColumnOutcome, ColumnReport, EncodingReport};
use crate::preprocessing::traits::Transformer;
use crate::table::{Column, ColumnData, Table};

/// Encoded output of one source column.
#[derive(Clone, Debug)]
pub struct EncodedColumn {
    pub result: EncodingResult,
    pub report: ColumnReport,
}

/// Encoded table together with its per-column report.
#[derive(Clone, Debug)]
pub struct EncodedTable {
    pub table: Table,
    pub report: EncodingReport,
}

/// Encode a single text column.
///
/// Depends only on the column and the configuration, so columns can be
/// encoded in any order or concurrently.
///
/// # Errors
/// [`EncodingError::UnsupportedColumn`] for non-text columns,
/// [`EncodingError::EmptyVocabulary`] for clustered columns without a
/// single token, and any clustering failure.
pub fn encode_column(
    column: &Column,
    config: &EncoderConfig,
    strategies: &ClusteringStrategies,
) -> Result<EncodedColumn, EncodingError> {
    let values = column
        .as_text()
        .ok_or_else(|| EncodingError::UnsupportedColumn {
            column: column.name().to_string(),
            dtype: column.data().dtype(),
        })?;
    let unique_values = count_unique(values);

    match CardinalityClassifier::from_config(config).classify(unique_values) {
        EncodingPath::OneHot => {
            let columns = OneHotEncoder::new().fit_transform(column)?;
            let output_columns = columns.iter().map(|c| c.name().to_string()).collect();
            info!(
                column = column.name(),
                path = %EncodingPath::OneHot,
                unique_values,
                features = columns.len(),
                "one-hot encoded column"
            );
            Ok(EncodedColumn {
                result: EncodingResult::OneHot { columns },
                report: ColumnReport {
                    column: column.name().to_string(),
                    path: EncodingPath::OneHot,
                    unique_values,
                    output_columns,
                    n_clusters: None,
                    method: None,
                    n_terms: None,
                    score: None,
                    trace: Vec::new(),
                },
            })
        }
        EncodingPath::Cluster => {
            let assignment =
                cluster_column(column.name(), values, unique_values, config, strategies)?;
            let name = format!("{}_{}", column.name(), CLUSTER_COLUMN_SUFFIX);
            info!(
                column = column.name(),
                path = %EncodingPath::Cluster,
                unique_values,
                k = assignment.n_clusters,
                method = %assignment.method,
                score = assignment.score,
                "cluster encoded column"
            );
            Ok(EncodedColumn {
                result: EncodingResult::ClusterAssignment {
                    labels: Column::new(name.clone(), ColumnData::Label(assignment.labels)),
                },
                report: ColumnReport {
                    column: column.name().to_string(),
                    path: EncodingPath::Cluster,
                    unique_values,
                    output_columns: vec![name],
                    n_clusters: Some(assignment.n_clusters),
                    method: Some(assignment.method),
                    n_terms: Some(assignment.n_terms),
                    score: assignment.score,
                    trace: assignment.trace,
                },
            })
        }
    }
}

/// Encodes every text column of a table by cardinality.
///
/// Low-cardinality columns are one-hot encoded; the rest are vectorized with
/// TF-IDF and replaced by a cluster label column.
///
/// # Example
/// ```ignore
/// use catencode_rs::preprocessing::AdaptiveCategoricalEncoder;
///
/// let encoded = AdaptiveCategoricalEncoder::new()
///     .with_binary_threshold(10)
///     .with_random_seed(7)
///     .encode(&table)?;
///
/// for outcome in &encoded.report.columns {
///     println!("{:?}", outcome);
/// }
/// ```
#[derive(Clone, Default)]
pub struct AdaptiveCategoricalEncoder {
    config: EncoderConfig,
    exact: Option<Arc<dyn Clusterer>>,
    approximate: Option<Arc<dyn Clusterer>>,
    scorer: Option<Arc<dyn QualityScorer>>,
}

impl fmt::Debug for AdaptiveCategoricalEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdaptiveCategoricalEncoder")
            .field("config", &self.config)
            .field("exact", &self.exact.as_ref().map(|c| c.name()))
            .field("approximate", &self.approximate.as_ref().map(|c| c.name()))
            .field("scorer", &self.scorer.as_ref().map(|s| s.name()))
            .finish()
    }
}

impl AdaptiveCategoricalEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: EncoderConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn with_binary_threshold(mut self, threshold: usize) -> Self {
        self.config.binary_threshold = threshold;
        self
    }

    pub fn with_fast_threshold(mut self, threshold: usize) -> Self {
        self.config.fast_threshold = threshold;
        self
    }

    pub fn with_max_vocabulary_size(mut self, size: usize) -> Self {
        self.config.max_vocabulary_size = size;
        self
    }

    pub fn with_large_dataset_row_cutoff(mut self, rows: usize) -> Self {
        self.config.large_dataset_row_cutoff = rows;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.config.random_seed = seed;
        self
    }

    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.config.n_init = n_init;
        self
    }

    pub fn with_drop_original_columns(mut self, drop: bool) -> Self {
        self.config.drop_original_columns = drop;
        self
    }

    pub fn with_max_clusters(mut self, max_clusters: usize) -> Self {
        self.config.max_clusters = max_clusters;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Replace the clustering routine of the greedy search.
    pub fn with_exact_clusterer(mut self, clusterer: Arc<dyn Clusterer>) -> Self {
        self.exact = Some(clusterer);
        self
    }

    /// Replace the clustering routine of the heuristic path.
    pub fn with_approximate_clusterer(mut self, clusterer: Arc<dyn Clusterer>) -> Self {
        self.approximate = Some(clusterer);
        self
    }

    /// Replace the candidate scorer of the greedy search.
    pub fn with_scorer(mut self, scorer: Arc<dyn QualityScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    fn strategies(&self) -> ClusteringStrategies {
        let defaults = ClusteringStrategies::from_config(&self.config);
        ClusteringStrategies::new(
            self.exact.clone().unwrap_or(defaults.exact),
            self.approximate.clone().unwrap_or(defaults.approximate),
            self.scorer.clone().unwrap_or(defaults.scorer),
        )
    }

    /// Encode all text columns of `table`.
    ///
    /// Output columns are appended after the surviving source columns,
    /// grouped by source column in input order. A column that fails to encode
    /// is recorded in the report and its source column is kept.
    ///
    /// # Errors
    /// Only configuration errors abort the call, and they do so before any
    /// column is processed.
    pub fn encode(&self, table: &Table) -> Result<EncodedTable, EncodingError> {
        self.config.validate()?;
        let strategies = self.strategies();

        let text_columns: Vec<&Column> = table.text_columns().collect();
        info!(
            n_rows = table.n_rows(),
            text_columns = text_columns.len(),
            ?strategies,
            "encoding table"
        );

        let results: Vec<Result<EncodedColumn, EncodingError>> = if self.config.parallel {
            text_columns
                .par_iter()
                .map(|column| encode_column(column, &self.config, &strategies))
                .collect()
        } else {
            text_columns
                .iter()
                .map(|column| encode_column(column, &self.config, &strategies))
                .collect()
        };

        // Produced names may not shadow any input column or an earlier output.
        let mut taken: HashSet<String> = table
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let mut outcomes = Vec::with_capacity(results.len());
        let mut accepted: Vec<(&str, EncodingResult)> = Vec::new();

        for (column, result) in text_columns.iter().zip(results) {
            let encoded = result.and_then(|encoded| claim_names(&mut taken, encoded));
            match encoded {
                Ok(encoded) => {
                    debug!(
                        column = column.name(),
                        path = %encoded.result.path(),
                        outputs = encoded.result.columns().len(),
                        "column accepted"
                    );
                    outcomes.push(ColumnOutcome::Encoded(encoded.report));
                    accepted.push((column.name(), encoded.result));
                }
                Err(e) => {
                    warn!(
                        column = column.name(),
                        error = %e,
                        "column encoding failed, source column kept"
                    );
                    outcomes.push(ColumnOutcome::failed(column.name(), &e));
                }
            }
        }

        let mut output = table.clone();
        if self.config.drop_original_columns {
            for (source, _) in &accepted {
                output.drop_column(source)?;
            }
        }
        for (_, result) in accepted {
            for column in result.into_columns() {
                output.push_column(column)?;
            }
        }
        debug!(
            n_columns = output.n_columns(),
            failed = outcomes.iter().filter(|o| o.is_failed()).count(),
            "table encoded"
        );

        Ok(EncodedTable {
            table: output,
            report: EncodingReport {
                n_rows: table.n_rows(),
                columns: outcomes,
            },
        })
    }
}

fn claim_names(
    taken: &mut HashSet<String>,
    encoded: EncodedColumn,
) -> Result<EncodedColumn, EncodingError> {
    let names: Vec<&str> = encoded.result.columns().iter().map(Column::name).collect();
    let mut fresh: HashSet<&str> = HashSet::with_capacity(names.len());
    for &name in &names {
        if taken.contains(name) || !fresh.insert(name) {
            return Err(EncodingError::DuplicateColumn(name.to_string()));
        }
    }
    taken.extend(names.into_iter().map(str::to_string));
    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_table() -> Table {
        Table::new(vec![
            Column::text("color", vec![Some("red"), Some("blue"), None, Some("red")]),
            Column::numeric("price", vec![Some(1.0), Some(2.0), Some(3.0), None]),
        ])
        .unwrap()
    }

    #[test]
    fn test_encode_column_rejects_numeric() {
        let column = Column::numeric("price", vec![Some(1.0)]);
        let config = EncoderConfig::default();
        let strategies = ClusteringStrategies::from_config(&config);
        assert!(matches!(
            encode_column(&column, &config, &strategies),
            Err(EncodingError::UnsupportedColumn { .. })
        ));
    }

    #[test]
    fn test_one_hot_appended_after_sources() {
        let encoded = AdaptiveCategoricalEncoder::new()
            .encode(&small_table())
            .unwrap();
        assert_eq!(
            encoded.table.column_names(),
            vec!["price", "color_blue", "color_red", "color_nan"]
        );
        assert_eq!(encoded.table.n_rows(), 4);
        let report = encoded.report.column("color").unwrap().as_encoded().unwrap();
        assert_eq!(report.path, EncodingPath::OneHot);
        assert_eq!(report.unique_values, 2);
    }

    #[test]
    fn test_keep_original_columns() {
        let encoded = AdaptiveCategoricalEncoder::new()
            .with_drop_original_columns(false)
            .encode(&small_table())
            .unwrap();
        assert_eq!(
            encoded.table.column_names(),
            vec!["color", "price", "color_blue", "color_red", "color_nan"]
        );
    }

    #[test]
    fn test_input_table_untouched() {
        let table = small_table();
        let before = table.clone();
        AdaptiveCategoricalEncoder::new().encode(&table).unwrap();
        assert_eq!(table, before);
    }

    #[test]
    fn test_name_collision_fails_column() {
        let table = Table::new(vec![
            Column::text("a", vec![Some("x"), Some("y")]),
            Column::numeric("a_nan", vec![Some(0.0), Some(1.0)]),
        ])
        .unwrap();
        let encoded = AdaptiveCategoricalEncoder::new().encode(&table).unwrap();
        assert!(encoded.report.column("a").unwrap().is_failed());
        assert_eq!(encoded.table.column_names(), vec!["a", "a_nan"]);
    }

    #[test]
    fn test_encode_column_result_matches_report() {
        let config = EncoderConfig::default();
        let strategies = ClusteringStrategies::from_config(&config);
        let color = Column::text("color", vec![Some("red"), None]);
        let encoded = encode_column(&color, &config, &strategies).unwrap();

        assert_eq!(encoded.result.path(), EncodingPath::OneHot);
        let names: Vec<&str> = encoded.result.columns().iter().map(Column::name).collect();
        assert_eq!(names, encoded.report.output_columns);
        assert_eq!(encoded.report.n_terms, None);
    }

    #[test]
    fn test_literal_nan_value_is_encoded() {
        let table = Table::new(vec![Column::text(
            "status",
            vec![Some("ok"), Some("nan"), None, Some("ok")],
        )])
        .unwrap();
        let encoded = AdaptiveCategoricalEncoder::new().encode(&table).unwrap();

        assert!(!encoded.report.columns[0].is_failed());
        assert_eq!(
            encoded.table.column_names(),
            vec!["status_nan", "status_ok", "status_nan_1"]
        );
        let indicator = encoded.table.column("status_nan_1").unwrap();
        assert_eq!(indicator.as_binary().unwrap(), &[0, 0, 1, 0]);
    }

    #[test]
    fn test_two_row_cluster_column() {
        let table = Table::new(vec![Column::text(
            "title",
            vec![Some("alpha beta"), Some("gamma delta")],
        )])
        .unwrap();
        let encoded = AdaptiveCategoricalEncoder::new()
            .with_binary_threshold(1)
            .encode(&table)
            .unwrap();

        let report = encoded.report.column("title").unwrap().as_encoded().unwrap();
        assert_eq!(report.path, EncodingPath::Cluster);
        assert_eq!(report.n_clusters, Some(2));
        assert_eq!(report.n_terms, Some(4));
        assert!(report.score.is_none());
        let labels = encoded.table.column("title_tfidf_cluster").unwrap();
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn test_invalid_config_aborts() {
        let result = AdaptiveCategoricalEncoder::new()
            .with_binary_threshold(0)
            .encode(&small_table());
        assert!(matches!(
            result,
            Err(EncodingError::InvalidParameter {
                param: "binary_threshold",
                ..
            })
        ));
    }
}
