//! Text vectorization.

mod tfidf;

pub use tfidf::{FittedTfidfVectorizer, TfidfVectorizer, DEFAULT_MAX_FEATURES};
