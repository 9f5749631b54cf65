//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use catencode_rs::clustering::{Clusterer, QualityScorer};
use catencode_rs::sparse::CsrMatrix;
use catencode_rs::table::Column;
use catencode_rs::EncodingError;

const ADJECTIVES: [&str; 6] = ["red", "blue", "green", "large", "small", "old"];
const NOUNS: [&str; 10] = [
    "house", "garden", "river", "street", "market", "bridge", "tower", "forest", "harbor", "valley",
];

/// Free-text column with `n_unique` distinct values repeated over `n_rows` rows.
pub fn free_text_column(name: &str, n_rows: usize, n_unique: usize) -> Column {
    let values = (0..n_rows)
        .map(|i| {
            let id = i % n_unique;
            Some(format!(
                "{} {} lot{}",
                ADJECTIVES[id % ADJECTIVES.len()],
                NOUNS[(id / ADJECTIVES.len()) % NOUNS.len()],
                id
            ))
        })
        .collect();
    Column::text(name, values)
}

/// SKU-like column: every value is unique up to `n_unique`, with a shared group token.
pub fn sku_column(name: &str, n_rows: usize, n_unique: usize) -> Column {
    let values = (0..n_rows)
        .map(|i| Some(format!("sku{} group{}", i % n_unique, i % 37)))
        .collect();
    Column::text(name, values)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("catencode_rs=debug")
        .with_test_writer()
        .try_init();
}

/// Clusterer decorator counting `fit_predict` calls.
pub struct CountingClusterer<C> {
    inner: C,
    calls: Arc<AtomicUsize>,
}

impl<C: Clusterer> CountingClusterer<C> {
    pub fn new(inner: C) -> (Arc<Self>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let wrapper = Arc::new(Self {
            inner,
            calls: Arc::clone(&calls),
        });
        (wrapper, calls)
    }
}

impl<C: Clusterer> Clusterer for CountingClusterer<C> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn fit_predict(
        &self,
        data: &CsrMatrix,
        n_clusters: usize,
        seed: u64,
    ) -> Result<Vec<usize>, EncodingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fit_predict(data, n_clusters, seed)
    }
}

/// Scorer decorator counting `score` calls.
pub struct CountingScorer<S> {
    inner: S,
    calls: Arc<AtomicUsize>,
}

impl<S: QualityScorer> CountingScorer<S> {
    pub fn new(inner: S) -> (Arc<Self>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let wrapper = Arc::new(Self {
            inner,
            calls: Arc::clone(&calls),
        });
        (wrapper, calls)
    }
}

impl<S: QualityScorer> QualityScorer for CountingScorer<S> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn score(&self, data: &CsrMatrix, labels: &[usize]) -> Result<Option<f64>, EncodingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.score(data, labels)
    }
}

pub fn calls(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}
