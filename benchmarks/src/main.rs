//! Encode a table repeatedly and print timings plus the column report.
//!
//! Usage:
//!   cargo run --release -p benchmarks -- [path/to/table.csv] [runs]
//!
//! Without a CSV path a synthetic 5000-row table is generated. Criterion
//! benches live under `benches/`:
//!   cargo bench -p benchmarks --bench encoder
//!   cargo bench -p benchmarks --bench clustering

use anyhow::{Context, Result};
use benchmarks::{load_csv_table, time_fn, SyntheticTable, TextColumnSpec, Timer};
use catencode_rs::preprocessing::{describe_text_columns, AdaptiveCategoricalEncoder};
use catencode_rs::Table;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn synthetic() -> Result<Table> {
    Ok(SyntheticTable::new(5_000, 42)
        .text_column("city", TextColumnSpec::new(8).with_missing_rate(0.05))
        .text_column("neighbourhood", TextColumnSpec::new(40).with_words(2))
        .text_column("listing", TextColumnSpec::new(1_200).with_words(3))
        .numeric_column("price")
        .build()?)
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = std::env::args().skip(1);
    let table = match args.next() {
        Some(path) => load_csv_table(&path)?,
        None => synthetic()?,
    };
    let runs: usize = match args.next() {
        Some(runs) => runs.parse().context("runs must be a positive integer")?,
        None => 3,
    };

    info!(rows = table.n_rows(), columns = table.n_columns(), "loaded table");
    for profile in describe_text_columns(&table) {
        println!(
            "{:<20} unique={:<6} missing={:<6} avg_len={:.2}",
            profile.column, profile.unique_values, profile.missing_values, profile.avg_length
        );
    }

    let encoder = AdaptiveCategoricalEncoder::new();
    let mut timer = Timer::new();
    let mut last = None;
    for _ in 0..runs.max(1) {
        timer.start();
        last = Some(encoder.encode(&table)?);
        timer.stop();
    }

    if let Some(stats) = timer.stats() {
        println!(
            "\nencode: {} runs, mean {:.1} ms, std {:.1} ms, min {:.1} ms, max {:.1} ms",
            stats.runs, stats.mean_ms, stats.std_dev_ms, stats.min_ms, stats.max_ms
        );
    }

    if let Some(encoded) = last {
        let (json, elapsed) = time_fn(|| encoded.report.to_json());
        println!("report serialized in {:?}", elapsed);
        println!("{}", json?);
        println!("output columns: {}", encoded.table.n_columns());
    }
    Ok(())
}
