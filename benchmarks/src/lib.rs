//! Benchmark helpers for catencode-rs.
//!
//! - Synthetic table generation and CSV loading
//! - Timing utilities for the `encode` driver

pub mod data;
pub mod utils;

pub use data::{load_csv_table, SyntheticTable, TextColumnSpec};
pub use utils::{time_fn, RunStats, Timer};
