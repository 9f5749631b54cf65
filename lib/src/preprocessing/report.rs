//! Per-column report returned with every encoded table.
//!
//! The report is observability only. Failures are also logged, and the
//! failing column's source stays in the output table.

use serde::{Deserialize, Serialize};

use crate::clustering::CandidateScore;
use crate::preprocessing::encoding::{EncodingPath, SelectionMethod};
use crate::preprocessing::error::EncodingError;

/// What happened to one encoded column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnReport {
    pub column: String,
    pub path: EncodingPath,
    /// Distinct non-null values.
    pub unique_values: usize,
    /// Names of the columns appended to the output.
    pub output_columns: Vec<String>,
    /// Cluster path only.
    pub n_clusters: Option<usize>,
    pub method: Option<SelectionMethod>,
    /// TF-IDF vocabulary size. Cluster path only.
    #[serde(default)]
    pub n_terms: Option<usize>,
    /// Silhouette of the chosen partition, when the greedy search could score it.
    pub score: Option<f64>,
    /// Candidate scores in ascending `k`. Empty unless the greedy search ran.
    #[serde(default)]
    pub trace: Vec<CandidateScore>,
}

/// Outcome of one text column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ColumnOutcome {
    Encoded(ColumnReport),
    Failed { column: String, error: String },
}

impl ColumnOutcome {
    pub(crate) fn failed(column: &str, error: &EncodingError) -> Self {
        ColumnOutcome::Failed {
            column: column.to_string(),
            error: error.to_string(),
        }
    }

    /// Name of the source column.
    pub fn column(&self) -> &str {
        match self {
            ColumnOutcome::Encoded(report) => &report.column,
            ColumnOutcome::Failed { column, .. } => column,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ColumnOutcome::Failed { .. })
    }

    pub fn as_encoded(&self) -> Option<&ColumnReport> {
        match self {
            ColumnOutcome::Encoded(report) => Some(report),
            ColumnOutcome::Failed { .. } => None,
        }
    }
}

/// Report of one `encode` call, one outcome per text column in input order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EncodingReport {
    pub n_rows: usize,
    pub columns: Vec<ColumnOutcome>,
}

impl EncodingReport {
    /// Outcome for a source column, if it was a text column.
    pub fn column(&self, name: &str) -> Option<&ColumnOutcome> {
        self.columns.iter().find(|outcome| outcome.column() == name)
    }

    pub fn encoded(&self) -> impl Iterator<Item = &ColumnReport> {
        self.columns.iter().filter_map(ColumnOutcome::as_encoded)
    }

    pub fn n_failed(&self) -> usize {
        self.columns.iter().filter(|o| o.is_failed()).count()
    }

    pub fn to_json(&self) -> Result<String, EncodingError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, EncodingError> {
        Ok(serde_json::from_str(json)?)
    }
}
