use std::path::Path;

use anyhow::{Context, Result};
use catencode_rs::table::{Column, Table};
use csv::ReaderBuilder;

/// Load a CSV file with a header row into a [`Table`].
///
/// A column whose non-empty cells all parse as numbers becomes numeric; any
/// other column is text. Empty cells are missing values.
///
/// # Example
///
/// ```no_run
/// use benchmarks::data::load_csv_table;
///
/// let table = load_csv_table("datasets/listings.csv").unwrap();
/// println!("{} rows", table.n_rows());
/// ```
pub fn load_csv_table<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];

    for (line, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("bad record at data row {}", line + 1))?;
        for (i, cell) in cells.iter_mut().enumerate() {
            let value = record.get(i).map(str::trim).filter(|v| !v.is_empty());
            cell.push(value.map(str::to_string));
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| infer_column(name, values))
        .collect();
    Ok(Table::new(columns)?)
}

fn infer_column(name: String, values: Vec<Option<String>>) -> Column {
    let numeric: Option<Vec<Option<f64>>> = values
        .iter()
        .map(|v| match v {
            Some(s) => s.parse::<f64>().ok().map(Some),
            None => Some(None),
        })
        .collect();
    match numeric {
        Some(numbers) if values.iter().any(Option::is_some) => Column::numeric(name, numbers),
        _ => Column::text(name, values),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_infers_numeric_and_text() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "city,price,note").unwrap();
        writeln!(file, "Paris,1.5,").unwrap();
        writeln!(file, "Rome,,old town").unwrap();
        file.flush().unwrap();

        let table = load_csv_table(file.path()).unwrap();
        assert_eq!(table.n_rows(), 2);
        assert!(table.column("city").unwrap().is_text());
        assert!(!table.column("price").unwrap().is_text());
        let note = table.column("note").unwrap().as_text().unwrap();
        assert_eq!(note, &[None, Some("old town".to_string())]);
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(load_csv_table("does/not/exist.csv").is_err());
    }
}
