//! Encode the categorical columns of a CSV file.
//!
//! Prints a profile of the text columns, encodes them and shows the
//! per-column report. Without an argument a small built-in listings table
//! is used.
//!
//! Run with: cargo run --example encode_table -- [path/to/file.csv]

use anyhow::{Context, Result};
use catencode_rs::preprocessing::{
    describe_text_columns, AdaptiveCategoricalEncoder, ColumnOutcome,
};
use catencode_rs::table::{Column, Table};
use tracing_subscriber::EnvFilter;

const STREETS: [&str; 8] = [
    "Baker Street",
    "Abbey Road",
    "Carnaby Street",
    "Portobello Road",
    "Oxford Street",
    "Fleet Street",
    "Brick Lane",
    "Kings Road",
];

/// 240 listings with a low-cardinality `room_type` and a free-text `title`.
fn builtin_table() -> Result<Table> {
    let n = 240;
    let room_types = ["Entire home", "Private room", "Shared room"];
    let room_type = (0..n)
        .map(|i| if i % 17 == 0 { None } else { Some(room_types[i % 3]) })
        .collect();
    let title = (0..n)
        .map(|i| {
            let id = i % 30;
            Some(format!(
                "{} flat near {} {}",
                if id % 2 == 0 { "Bright" } else { "Quiet" },
                STREETS[id % STREETS.len()],
                id
            ))
        })
        .collect();
    let price = (0..n).map(|i| Some(40.0 + (i % 50) as f64 * 3.5)).collect();

    Ok(Table::new(vec![
        Column::text("room_type", room_type),
        Column::text::<String>("title", title),
        Column::numeric("price", price),
    ])?)
}

fn load_csv(path: &str) -> Result<Table> {
    let mut rdr = csv::Reader::from_path(path).with_context(|| format!("opening {}", path))?;
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for record in rdr.records() {
        let record = record?;
        for (i, column) in values.iter_mut().enumerate() {
            let cell = record.get(i).filter(|v| !v.trim().is_empty());
            column.push(cell.map(str::to_string));
        }
    }
    // Every column is loaded as text; numeric columns are simply high-cardinality text here.
    let columns = headers
        .into_iter()
        .zip(values)
        .map(|(name, v)| Column::text(name, v))
        .collect();
    Ok(Table::new(columns)?)
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let table = match std::env::args().nth(1) {
        Some(path) => load_csv(&path)?,
        None => builtin_table()?,
    };

    println!("=== Text columns ===\n");
    for profile in describe_text_columns(&table) {
        println!(
            "{:<16} unique: {:<5} missing: {:<5} avg length: {:.2}",
            profile.column, profile.unique_values, profile.missing_values, profile.avg_length
        );
    }

    let encoded = AdaptiveCategoricalEncoder::new()
        .with_random_seed(42)
        .encode(&table)?;

    println!("\n=== Report ===\n");
    for outcome in &encoded.report.columns {
        match outcome {
            ColumnOutcome::Encoded(report) => match report.n_clusters {
                Some(k) => println!(
                    "{}: {} unique -> {} clusters ({:?}, silhouette {:?})",
                    report.column, report.unique_values, k, report.method, report.score
                ),
                None => println!(
                    "{}: {} unique -> {} indicator columns",
                    report.column,
                    report.unique_values,
                    report.output_columns.len()
                ),
            },
            ColumnOutcome::Failed { column, error } => println!("{}: failed ({})", column, error),
        }
    }

    println!("\nOutput columns: {:?}", encoded.table.column_names());
    Ok(())
}
