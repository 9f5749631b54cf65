//! Quick profile of the text columns of a table.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::table::Table;

/// Summary of one text column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextColumnProfile {
    pub column: String,
    /// Distinct non-null values.
    pub unique_values: usize,
    /// Null count.
    pub missing_values: usize,
    /// Mean length in characters of the non-null values, 2 decimals.
    pub avg_length: f64,
}

/// Profile every text column, most missing values first.
///
/// Columns with equal missing counts keep their table order.
pub fn describe_text_columns(table: &Table) -> Vec<TextColumnProfile> {
    let mut profiles: Vec<TextColumnProfile> = table
        .text_columns()
        .filter_map(|column| {
            let values = column.as_text()?;
            let present: Vec<&str> = values.iter().flatten().map(String::as_str).collect();
            let unique_values = present.iter().collect::<HashSet<_>>().len();
            let avg_length = if present.is_empty() {
                0.0
            } else {
                let total: usize = present.iter().map(|v| v.chars().count()).sum();
                round2(total as f64 / present.len() as f64)
            };
            Some(TextColumnProfile {
                column: column.name().to_string(),
                unique_values,
                missing_values: values.len() - present.len(),
                avg_length,
            })
        })
        .collect();
    profiles.sort_by(|a, b| b.missing_values.cmp(&a.missing_values));
    profiles
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_profiles_sorted_by_missing() {
        let table = Table::new(vec![
            Column::text("a", vec![Some("x"), Some("yy"), Some("x")]),
            Column::numeric("n", vec![Some(1.0), None, None]),
            Column::text("b", vec![None, Some("hello"), None]),
            Column::text("c", vec![Some("été"), None, Some("ab")]),
        ])
        .unwrap();

        let profiles = describe_text_columns(&table);
        let names: Vec<&str> = profiles.iter().map(|p| p.column.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);

        assert_eq!(profiles[0].missing_values, 2);
        assert_eq!(profiles[0].unique_values, 1);
        assert_abs_diff_eq!(profiles[0].avg_length, 5.0);

        // Lengths count characters, not bytes.
        assert_abs_diff_eq!(profiles[1].avg_length, 2.5);

        assert_eq!(profiles[2].unique_values, 2);
        assert_abs_diff_eq!(profiles[2].avg_length, 1.33);
    }

    #[test]
    fn test_all_null_column() {
        let table = Table::new(vec![Column::text::<String>("z", vec![None, None])]).unwrap();
        let profiles = describe_text_columns(&table);
        assert_eq!(profiles[0].unique_values, 0);
        assert_eq!(profiles[0].missing_values, 2);
        assert_eq!(profiles[0].avg_length, 0.0);
    }
}
