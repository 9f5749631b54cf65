//! Clustering of vectorized text columns.
//!
//! # Available Components
//!
//! | Component | Role |
//! |-----------|------|
//! | [`KMeans`] | Exact Lloyd k-means with k-means++ restarts |
//! | [`MiniBatchKMeans`] | Approximate k-means for large columns |
//! | [`SilhouetteScorer`] | Internal quality metric for a partition |
//! | [`ClusterCountSelector`] | Greedy linear search over cluster counts |
//!
//! The selector works against the [`Clusterer`] and [`QualityScorer`] traits,
//! so any implementation can be plugged in.

mod centers;
pub mod kmeans;
pub mod minibatch;
pub mod selector;
pub mod silhouette;
pub mod traits;

pub use kmeans::{KMeans, KMeansFit};
pub use minibatch::MiniBatchKMeans;
pub use selector::{
    CandidateScore, ClusterCandidate, ClusterCountSelector, SearchRange, Selection,
    DEFAULT_MAX_CLUSTERS,
};
pub use silhouette::SilhouetteScorer;
pub use traits::{Clusterer, QualityScorer};
