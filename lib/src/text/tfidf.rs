//! TF-IDF (Term Frequency-Inverse Document Frequency) vectorizer.
//!
//! Every row of a text column is treated as one document:
//! - text is lowercased, missing values become the empty document
//! - tokens are runs of at least two word characters
//! - the vocabulary keeps the `max_features` most frequent terms
//!   (ties broken alphabetically) and is indexed alphabetically
//! - `idf(t) = ln((1 + n) / (1 + df(t))) + 1`
//! - each row is `count * idf`, L2-normalised
//!
//! Truncation to `max_features` is silent: rare terms are simply not
//! represented.

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use tracing::debug;

use crate::preprocessing::error::EncodingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::sparse::CsrMatrix;

const TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// Default vocabulary cap.
pub const DEFAULT_MAX_FEATURES: usize = 500;

fn token_pattern() -> Result<Regex, EncodingError> {
    Regex::new(TOKEN_PATTERN)
        .map_err(|e| EncodingError::invalid("token_pattern", e.to_string()))
}

fn normalize(doc: &Option<String>) -> String {
    doc.as_deref().unwrap_or("").to_lowercase()
}

/// TF-IDF vectorizer (unfitted).
#[derive(Clone, Debug)]
pub struct TfidfVectorizer {
    max_features: usize,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEATURES)
    }
}

impl TfidfVectorizer {
    /// Create a vectorizer keeping at most `max_features` terms.
    pub fn new(max_features: usize) -> Self {
        Self { max_features }
    }

    pub fn max_features(&self) -> usize {
        self.max_features
    }
}

impl Transformer for TfidfVectorizer {
    type Input = [Option<String>];
    type Output = CsrMatrix;
    type Fitted = FittedTfidfVectorizer;

    fn fit(&self, docs: &Self::Input) -> Result<Self::Fitted, EncodingError> {
        if self.max_features == 0 {
            return Err(EncodingError::invalid(
                "max_vocabulary_size",
                "must be at least 1",
            ));
        }

        let pattern = token_pattern()?;
        let mut term_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();

        for doc in docs {
            let text = normalize(doc);
            let mut seen: BTreeSet<&str> = BTreeSet::new();
            for token in pattern.find_iter(&text) {
                *term_counts.entry(token.as_str().to_string()).or_insert(0) += 1;
                seen.insert(token.as_str());
            }
            for term in seen {
                *doc_freq.entry(term.to_string()).or_insert(0) += 1;
            }
        }

        if term_counts.is_empty() {
            return Err(EncodingError::EmptyVocabulary(format!(
                "no token of two or more word characters in {} rows",
                docs.len()
            )));
        }

        // BTreeMap iterates alphabetically, so the stable sort keeps ties in term order.
        let mut ranked: Vec<(&String, &usize)> = term_counts.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(a.1));
        if ranked.len() > self.max_features {
            debug!(
                terms = ranked.len(),
                kept = self.max_features,
                "vocabulary truncated"
            );
        }
        let mut kept: Vec<&String> = ranked
            .into_iter()
            .take(self.max_features)
            .map(|(term, _)| term)
            .collect();
        kept.sort();

        let n_docs = docs.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(kept.len());
        for (idx, term) in kept.into_iter().enumerate() {
            let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
            idf.push(((1.0 + n_docs) / (1.0 + df)).ln() + 1.0);
            vocabulary.insert(term.clone(), idx);
        }

        Ok(FittedTfidfVectorizer {
            vocabulary,
            idf,
            pattern,
        })
    }
}

/// Fitted TF-IDF vectorizer.
///
/// Holds the vocabulary and idf weights of a single column.
#[derive(Clone, Debug)]
pub struct FittedTfidfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    pattern: Regex,
}

impl FittedTfidfVectorizer {
    /// Term to feature index mapping.
    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    /// Inverse document frequency of each feature.
    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    fn vectorize(&self, doc: &Option<String>) -> Vec<(usize, f64)> {
        let text = normalize(doc);
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in self.pattern.find_iter(&text) {
            if let Some(&idx) = self.vocabulary.get(token.as_str()) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut row: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * self.idf[idx]))
            .collect();
        let norm = row.iter().map(|&(_, v)| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, v) in &mut row {
                *v /= norm;
            }
        }
        row
    }
}

impl FittedTransformer for FittedTfidfVectorizer {
    type Input = [Option<String>];
    type Output = CsrMatrix;

    fn transform(&self, docs: &Self::Input) -> Result<Self::Output, EncodingError> {
        let rows = docs.iter().map(|doc| self.vectorize(doc)).collect();
        CsrMatrix::from_rows(self.idf.len(), rows)
    }

    fn n_features_out(&self) -> usize {
        self.idf.len()
    }
}
