use catencode_rs::table::{Column, Table};
use catencode_rs::EncodingError;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const WORDS: [&str; 24] = [
    "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india", "juliet",
    "kilo", "lima", "mike", "november", "oscar", "papa", "quebec", "romeo", "sierra", "tango",
    "uniform", "victor", "whiskey", "yankee",
];

/// Shape of a generated text column.
#[derive(Debug, Clone, Copy)]
pub struct TextColumnSpec {
    /// Distinct non-null values.
    pub n_unique: usize,
    /// Words per value, before the unique id token.
    pub words: usize,
    /// Share of rows left missing, in `[0, 1)`.
    pub missing_rate: f64,
}

impl TextColumnSpec {
    pub fn new(n_unique: usize) -> Self {
        Self {
            n_unique,
            words: 2,
            missing_rate: 0.0,
        }
    }

    pub fn with_words(mut self, words: usize) -> Self {
        self.words = words;
        self
    }

    pub fn with_missing_rate(mut self, rate: f64) -> Self {
        self.missing_rate = rate;
        self
    }
}

/// Reproducible generator of mixed categorical tables.
///
/// # Example
///
/// ```no_run
/// use benchmarks::data::{SyntheticTable, TextColumnSpec};
///
/// let table = SyntheticTable::new(1_000, 42)
///     .text_column("city", TextColumnSpec::new(8))
///     .text_column("listing", TextColumnSpec::new(120).with_words(3))
///     .numeric_column("price")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct SyntheticTable {
    n_rows: usize,
    seed: u64,
    columns: Vec<(String, Option<TextColumnSpec>)>,
}

impl SyntheticTable {
    pub fn new(n_rows: usize, seed: u64) -> Self {
        Self {
            n_rows,
            seed,
            columns: Vec::new(),
        }
    }

    pub fn text_column(mut self, name: &str, spec: TextColumnSpec) -> Self {
        self.columns.push((name.to_string(), Some(spec)));
        self
    }

    pub fn numeric_column(mut self, name: &str) -> Self {
        self.columns.push((name.to_string(), None));
        self
    }

    pub fn build(&self) -> Result<Table, EncodingError> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let columns = self
            .columns
            .iter()
            .map(|(name, spec)| match spec {
                Some(spec) => text_column(name, self.n_rows, spec, &mut rng),
                None => Column::numeric(
                    name.clone(),
                    (0..self.n_rows).map(|_| Some(rng.gen_range(0.0..1000.0))).collect(),
                ),
            })
            .collect();
        Table::new(columns)
    }
}

fn text_column(name: &str, n_rows: usize, spec: &TextColumnSpec, rng: &mut ChaCha8Rng) -> Column {
    let n_unique = spec.n_unique.max(1);
    let vocabulary: Vec<String> = (0..n_unique)
        .map(|id| {
            let mut parts: Vec<&str> = (0..spec.words)
                .map(|_| *WORDS.choose(rng).unwrap_or(&"alpha"))
                .collect();
            let tag = format!("{}{}", name, id);
            parts.push(&tag);
            parts.join(" ")
        })
        .collect();

    let values = (0..n_rows)
        .map(|row| {
            if rng.gen_bool(spec.missing_rate.clamp(0.0, 0.99)) {
                None
            } else if row < n_unique {
                // Every distinct value appears at least once when rows allow.
                Some(vocabulary[row].clone())
            } else {
                Some(vocabulary[rng.gen_range(0..n_unique)].clone())
            }
        })
        .collect::<Vec<_>>();
    Column::text(name, values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_is_reproducible() {
        let builder = SyntheticTable::new(200, 7)
            .text_column("city", TextColumnSpec::new(5))
            .numeric_column("price");
        assert_eq!(builder.build().unwrap(), builder.build().unwrap());
    }

    #[test]
    fn test_unique_count_reached() {
        let table = SyntheticTable::new(300, 1)
            .text_column("listing", TextColumnSpec::new(120))
            .build()
            .unwrap();
        let values = table.column("listing").unwrap().as_text().unwrap();
        let unique: std::collections::HashSet<_> = values.iter().flatten().collect();
        assert_eq!(unique.len(), 120);
    }
}
