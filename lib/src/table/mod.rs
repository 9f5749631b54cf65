//! In-memory tabular data.
//!
//! A [`Table`] is an ordered list of named, equally long [`Column`]s. Text
//! columns are the categorical inputs of the encoder; every other variant is
//! carried through untouched.
//!
//! # Example
//!
//! ```rust
//! use catencode_rs::table::{Column, Table};
//!
//! let table = Table::new(vec![
//!     Column::text("color", vec![Some("red"), None, Some("blue")]),
//!     Column::numeric("price", vec![Some(1.5), Some(2.0), None]),
//! ])
//! .unwrap();
//!
//! assert_eq!(table.n_rows(), 3);
//! assert_eq!(table.text_columns().count(), 1);
//! ```

use crate::preprocessing::error::EncodingError;

/// Values stored in a single column.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    /// Categorical / free text values. `None` is a missing value.
    Text(Vec<Option<String>>),
    /// Floating point values. `None` is a missing value.
    Numeric(Vec<Option<f64>>),
    /// 0/1 indicator values, as produced by one-hot encoding.
    Binary(Vec<u8>),
    /// Integer labels, as produced by cluster assignment.
    Label(Vec<usize>),
}

impl ColumnData {
    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Text(v) => v.len(),
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Binary(v) => v.len(),
            ColumnData::Label(v) => v.len(),
        }
    }

    /// Returns `true` if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short type name used in logs and error messages.
    pub fn dtype(&self) -> &'static str {
        match self {
            ColumnData::Text(_) => "text",
            ColumnData::Numeric(_) => "numeric",
            ColumnData::Binary(_) => "binary",
            ColumnData::Label(_) => "label",
        }
    }
}

/// A named column.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    /// Create a column from a name and its values.
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Convenience constructor for a text column.
    pub fn text<S: Into<String>>(name: impl Into<String>, values: Vec<Option<S>>) -> Self {
        Self::new(
            name,
            ColumnData::Text(values.into_iter().map(|v| v.map(Into::into)).collect()),
        )
    }

    /// Convenience constructor for a numeric column.
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self::new(name, ColumnData::Numeric(values))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` for categorical (text) columns.
    pub fn is_text(&self) -> bool {
        matches!(self.data, ColumnData::Text(_))
    }

    /// Borrow the values of a text column.
    pub fn as_text(&self) -> Option<&[Option<String>]> {
        match &self.data {
            ColumnData::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow the values of a binary column.
    pub fn as_binary(&self) -> Option<&[u8]> {
        match &self.data {
            ColumnData::Binary(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow the values of a label column.
    pub fn as_labels(&self) -> Option<&[usize]> {
        match &self.data {
            ColumnData::Label(v) => Some(v),
            _ => None,
        }
    }
}

/// An ordered collection of equally long, uniquely named columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Build a table, checking that names are unique and lengths agree.
    pub fn new(columns: Vec<Column>) -> Result<Self, EncodingError> {
        let mut table = Table {
            columns: Vec::with_capacity(columns.len()),
            n_rows: columns.first().map(Column::len).unwrap_or(0),
        };
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Iterate over the categorical (text) columns in table order.
    pub fn text_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_text())
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Append a column at the end of the table.
    pub fn push_column(&mut self, column: Column) -> Result<(), EncodingError> {
        if self.contains(column.name()) {
            return Err(EncodingError::DuplicateColumn(column.name));
        }
        if self.columns.is_empty() && self.n_rows == 0 {
            self.n_rows = column.len();
        } else if column.len() != self.n_rows {
            return Err(EncodingError::InvalidShape {
                expected: format!("{} rows", self.n_rows),
                got: format!("{} rows in column `{}`", column.len(), column.name),
            });
        }
        self.columns.push(column);
        Ok(())
    }

    /// Remove a column by name, returning it.
    ///
    /// The row count is kept even when the last column is removed.
    pub fn drop_column(&mut self, name: &str) -> Result<Column, EncodingError> {
        let idx = self
            .columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| EncodingError::ColumnNotFound(name.to_string()))?;
        Ok(self.columns.remove(idx))
    }
}
