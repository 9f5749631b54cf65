//! Input tables for the benchmarks.

mod csv_table;
mod synthetic;

pub use csv_table::load_csv_table;
pub use synthetic::{SyntheticTable, TextColumnSpec};
