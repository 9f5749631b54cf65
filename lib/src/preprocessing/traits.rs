//! Core traits for column transformers.
//!
//! This module defines the two central traits:
//! - [`Transformer`]: Used during fitting; holds hyperparameters and learns from data.
//! - [`FittedTransformer`]: After fitting; maps data using what was learned.
//!
//! Fitted state here is scoped to one encoding pass. Unlike model parameters it
//! is never persisted or reused across columns.

use crate::preprocessing::error::EncodingError;

/// Trait for unfitted transformers with hyperparameters.
///
/// # Example
/// ```ignore
/// use catencode_rs::preprocessing::{OneHotEncoder, Transformer};
///
/// let encoder = OneHotEncoder::new();
/// let fitted = encoder.fit(&column)?;
/// let indicator_columns = fitted.transform(&column)?;
/// ```
pub trait Transformer: Clone {
    /// Input data type.
    type Input: ?Sized;
    /// Output data type after transformation.
    type Output;
    /// The fitted transformer type.
    type Fitted: FittedTransformer<Input = Self::Input, Output = Self::Output>;

    /// Fit the transformer to the data.
    ///
    /// # Errors
    /// Returns [`EncodingError`] if the data cannot be learned from
    /// (for example a text column without a single usable term).
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, EncodingError>;

    /// Fit the transformer and transform the same data in one step.
    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output, EncodingError> {
        let fitted = self.fit(data)?;
        fitted.transform(data)
    }
}

/// Trait for fitted transformers.
pub trait FittedTransformer {
    /// Input data type for transformation.
    type Input: ?Sized;
    /// Output data type after transformation.
    type Output;

    /// Transform data using learned state.
    ///
    /// # Errors
    /// Returns [`EncodingError`] if the input contains values the transformer
    /// has not seen during fit and cannot represent.
    fn transform(&self, data: &Self::Input) -> Result<Self::Output, EncodingError>;

    /// Number of output features produced per row.
    fn n_features_out(&self) -> usize;
}
