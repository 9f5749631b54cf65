//! Error types for encoding operations.

use thiserror::Error;

/// Error type for encoding operations.
#[derive(Debug, Error)]
pub enum EncodingError {
    /// Invalid configuration value. Always names the offending parameter.
    #[error("Invalid parameter `{param}`: {reason}")]
    InvalidParameter {
        param: &'static str,
        reason: String,
    },
    /// Shape mismatch between expected and actual dimensions.
    #[error("Invalid shape: expected {expected}, got {got}")]
    InvalidShape { expected: String, got: String },
    /// Empty data provided where non-empty was required.
    #[error("Empty data: {0}")]
    EmptyData(String),
    /// Text column produced no usable terms.
    #[error("Empty vocabulary: {0}")]
    EmptyVocabulary(String),
    /// Column lookup by name failed.
    #[error("Column not found: {0}")]
    ColumnNotFound(String),
    /// A column with this name already exists in the table.
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),
    /// The column type cannot be handled by this transformer.
    #[error("Unsupported column `{column}`: expected text, got {dtype}")]
    UnsupportedColumn { column: String, dtype: &'static str },
    /// A value not seen during fit was passed to transform.
    #[error("Unknown category `{value}` in column `{column}`")]
    UnknownCategory { column: String, value: String },
    /// Numerical computation error (non-finite distances, etc.).
    #[error("Numerical error: {0}")]
    NumericalError(String),
    /// Serialization or deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl EncodingError {
    pub(crate) fn invalid(param: &'static str, reason: impl Into<String>) -> Self {
        EncodingError::InvalidParameter {
            param,
            reason: reason.into(),
        }
    }
}

impl From<bincode::Error> for EncodingError {
    fn from(err: bincode::Error) -> Self {
        EncodingError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for EncodingError {
    fn from(err: serde_json::Error) -> Self {
        EncodingError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_parameter_names_param() {
        let err = EncodingError::invalid("binary_threshold", "must be at least 1");
        let msg = err.to_string();
        assert!(msg.contains("Invalid parameter"));
        assert!(msg.contains("binary_threshold"));
    }

    #[test]
    fn test_error_display_invalid_shape() {
        let err = EncodingError::InvalidShape {
            expected: "3 rows".to_string(),
            got: "2 rows".to_string(),
        };
        assert!(err.to_string().contains("Invalid shape"));
    }

    #[test]
    fn test_error_display_empty_vocabulary() {
        let err = EncodingError::EmptyVocabulary("column `code`".to_string());
        assert!(err.to_string().contains("Empty vocabulary"));
    }

    #[test]
    fn test_error_display_duplicate_column() {
        let err = EncodingError::DuplicateColumn("color_nan".to_string());
        assert!(err.to_string().contains("color_nan"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: EncodingError = io_err.into();
        assert!(matches!(err, EncodingError::IoError(_)));
    }

    #[test]
    fn test_error_is_std_error() {
        let err = EncodingError::EmptyData("no rows".to_string());
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn test_error_from_bincode_error() {
        let bad_bytes: &[u8] = &[0xff, 0xff, 0xff, 0xff];
        let bincode_result: Result<String, bincode::Error> = bincode::deserialize(bad_bytes);
        if let Err(e) = bincode_result {
            let err: EncodingError = e.into();
            assert!(matches!(err, EncodingError::SerializationError(_)));
        }
    }
}
