//! One-hot encoding for low-cardinality text columns.
//!
//! Produces one 0/1 column per distinct non-null value plus a null indicator.
//! Every row has exactly one 1 across those columns.
//!
//! The indicator is named `{column}_nan`. When a value already renders to that
//! name (the literal string `"nan"`), the indicator becomes `{column}_nan_1`,
//! or the first free `{column}_nan_{i}`.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::preprocessing::error::EncodingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::table::{Column, ColumnData};

/// Suffix of the null indicator column.
pub const NULL_INDICATOR_SUFFIX: &str = "nan";

fn text_values(column: &Column) -> Result<&[Option<String>], EncodingError> {
    column
        .as_text()
        .ok_or_else(|| EncodingError::UnsupportedColumn {
            column: column.name().to_string(),
            dtype: column.data().dtype(),
        })
}

/// One-hot encoder for a text column.
///
/// # Example
/// ```ignore
/// use catencode_rs::preprocessing::{OneHotEncoder, Transformer};
/// use catencode_rs::table::Column;
///
/// let color = Column::text("color", vec![Some("red"), None, Some("blue")]);
/// let columns = OneHotEncoder::new().fit_transform(&color)?;
/// // color_blue: [0, 0, 1]
/// // color_red:  [1, 0, 0]
/// // color_nan:  [0, 1, 0]
/// ```
#[derive(Clone, Debug, Default)]
pub struct OneHotEncoder;

impl OneHotEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for OneHotEncoder {
    type Input = Column;
    type Output = Vec<Column>;
    type Fitted = FittedOneHotEncoder;

    fn fit(&self, column: &Self::Input) -> Result<Self::Fitted, EncodingError> {
        let values = text_values(column)?;
        let categories: BTreeSet<&str> = values.iter().flatten().map(String::as_str).collect();
        let categories: Vec<String> = categories.into_iter().map(str::to_string).collect();
        let index = categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();

        let null_indicator = null_indicator_name(column.name(), &categories);

        Ok(FittedOneHotEncoder {
            column: column.name().to_string(),
            categories,
            index,
            null_indicator,
        })
    }
}

fn null_indicator_name(column: &str, categories: &[String]) -> String {
    let base = format!("{}_{}", column, NULL_INDICATOR_SUFFIX);
    let taken: HashSet<String> = categories
        .iter()
        .map(|c| format!("{}_{}", column, c))
        .collect();
    let mut name = base.clone();
    let mut suffix = 1;
    while taken.contains(&name) {
        name = format!("{}_{}", base, suffix);
        suffix += 1;
    }
    name
}

/// Fitted one-hot encoder.
#[derive(Clone, Debug)]
pub struct FittedOneHotEncoder {
    column: String,
    /// Distinct non-null values in lexicographic order.
    categories: Vec<String>,
    index: BTreeMap<String, usize>,
    null_indicator: String,
}

impl FittedOneHotEncoder {
    /// Distinct non-null values seen during fit, in output order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Name of the null indicator column.
    pub fn null_indicator(&self) -> &str {
        &self.null_indicator
    }

    /// Output column names: one per category, then the null indicator.
    pub fn feature_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|c| format!("{}_{}", self.column, c))
            .chain(std::iter::once(self.null_indicator.clone()))
            .collect()
    }
}

impl FittedTransformer for FittedOneHotEncoder {
    type Input = Column;
    type Output = Vec<Column>;

    fn transform(&self, column: &Self::Input) -> Result<Self::Output, EncodingError> {
        let values = text_values(column)?;
        let n_out = self.n_features_out();
        let null_slot = n_out - 1;
        let mut indicators = vec![vec![0u8; values.len()]; n_out];

        for (row, value) in values.iter().enumerate() {
            let slot = match value {
                Some(v) => *self
                    .index
                    .get(v)
                    .ok_or_else(|| EncodingError::UnknownCategory {
                        column: self.column.clone(),
                        value: v.clone(),
                    })?,
                None => null_slot,
            };
            indicators[slot][row] = 1;
        }

        Ok(self
            .feature_names()
            .into_iter()
            .zip(indicators)
            .map(|(name, values)| Column::new(name, ColumnData::Binary(values)))
            .collect())
    }

    fn n_features_out(&self) -> usize {
        self.categories.len() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors() -> Column {
        Column::text(
            "color",
            vec![
                Some("red"),
                Some("red"),
                Some("blue"),
                Some("green"),
                Some("red"),
                Some("blue"),
            ],
        )
    }

    fn row_sums(columns: &[Column]) -> Vec<u32> {
        let n = columns[0].len();
        (0..n)
            .map(|r| {
                columns
                    .iter()
                    .map(|c| c.as_binary().unwrap()[r] as u32)
                    .sum()
            })
            .collect()
    }

    #[test]
    fn test_one_hot_three_values_plus_null_indicator() {
        let columns = OneHotEncoder::new().fit_transform(&colors()).unwrap();
        let names: Vec<&str> = columns.iter().map(Column::name).collect();
        assert_eq!(
            names,
            vec!["color_blue", "color_green", "color_red", "color_nan"]
        );
        assert_eq!(row_sums(&columns), vec![1; 6]);
        assert_eq!(columns[2].as_binary().unwrap(), &[1, 1, 0, 0, 1, 0]);
        assert!(columns[3].as_binary().unwrap().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_nulls_set_only_indicator() {
        let column = Column::text("size", vec![Some("S"), None, Some("M"), None]);
        let columns = OneHotEncoder::new().fit_transform(&column).unwrap();
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[2].name(), "size_nan");
        assert_eq!(columns[2].as_binary().unwrap(), &[0, 1, 0, 1]);
        assert_eq!(row_sums(&columns), vec![1; 4]);
    }

    #[test]
    fn test_all_null_column_yields_only_indicator() {
        let column = Column::text::<String>("empty", vec![None, None]);
        let fitted = OneHotEncoder::new().fit(&column).unwrap();
        assert_eq!(fitted.n_features_out(), 1);
        let columns = fitted.transform(&column).unwrap();
        assert_eq!(columns[0].as_binary().unwrap(), &[1, 1]);
    }

    #[test]
    fn test_zero_row_column() {
        let column = Column::text::<String>("none", vec![]);
        let columns = OneHotEncoder::new().fit_transform(&column).unwrap();
        assert_eq!(columns.len(), 1);
        assert!(columns[0].is_empty());
    }

    #[test]
    fn test_case_sensitive_categories() {
        let column = Column::text("c", vec![Some("A"), Some("a")]);
        let fitted = OneHotEncoder::new().fit(&column).unwrap();
        assert_eq!(fitted.categories(), &["A".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let fitted = OneHotEncoder::new().fit(&colors()).unwrap();
        let other = Column::text("color", vec![Some("purple")]);
        assert!(matches!(
            fitted.transform(&other),
            Err(EncodingError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn test_numeric_column_rejected() {
        let column = Column::numeric("x", vec![Some(1.0)]);
        assert!(matches!(
            OneHotEncoder::new().fit(&column),
            Err(EncodingError::UnsupportedColumn { dtype: "numeric", .. })
        ));
    }

    #[test]
    fn test_literal_nan_value_keeps_names_unique() {
        let column = Column::text("status", vec![Some("ok"), Some("nan"), None, Some("ok")]);
        let columns = OneHotEncoder::new().fit_transform(&column).unwrap();
        let names: Vec<&str> = columns.iter().map(Column::name).collect();
        assert_eq!(names, vec!["status_nan", "status_ok", "status_nan_1"]);
        assert_eq!(columns[0].as_binary().unwrap(), &[0, 1, 0, 0]);
        assert_eq!(columns[2].as_binary().unwrap(), &[0, 0, 1, 0]);
        assert_eq!(row_sums(&columns), vec![1; 4]);
    }

    #[test]
    fn test_null_indicator_skips_every_taken_suffix() {
        let column = Column::text("s", vec![Some("nan"), Some("nan_1"), None]);
        let fitted = OneHotEncoder::new().fit(&column).unwrap();
        assert_eq!(fitted.null_indicator(), "s_nan_2");
    }

    #[test]
    fn test_stable_across_runs() {
        let a = OneHotEncoder::new().fit_transform(&colors()).unwrap();
        let b = OneHotEncoder::new().fit_transform(&colors()).unwrap();
        assert_eq!(a, b);
    }
}
