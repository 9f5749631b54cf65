//! Serialization of encoder configuration and reports.
//!
//! Only plain data (configs, reports) is persisted. Fitted vectorizer and
//! clustering state is deliberately not serializable: it belongs to a single
//! encoding pass and is dropped afterwards.

use std::error::Error;
use std::path::Path;

use crate::preprocessing::error::EncodingError;

/// A trait for plain-data types that can be serialized to and from bytes.
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: Error + Send + Sync + 'static;

    /// Serialize into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error>;

    /// Deserialize from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;

    /// Write the serialized bytes to `path`.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EncodingError> {
        let bytes = self
            .to_bytes()
            .map_err(|e| EncodingError::SerializationError(e.to_string()))?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Read and deserialize from `path`.
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, EncodingError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes).map_err(|e| EncodingError::SerializationError(e.to_string()))
    }
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}
