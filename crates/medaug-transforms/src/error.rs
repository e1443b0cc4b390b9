//! Error types for transform operations.

use thiserror::Error;

/// Main error type for transform operations.
#[derive(Error, Debug)]
pub enum TransformError {
    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A configured key is missing from the input sample.
    #[error("Missing key: {0}")]
    MissingKey(String),

    /// Dimension mismatch.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Shape mismatch.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
}

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;

impl TransformError {
    /// Create an invalid configuration error.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create a missing key error.
    pub fn missing_key(key: impl Into<String>) -> Self {
        Self::MissingKey(key.into())
    }

    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(msg: impl Into<String>) -> Self {
        Self::DimensionMismatch(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = TransformError::missing_key("seg");
        assert!(matches!(err, TransformError::MissingKey(_)));
    }

    #[test]
    fn test_error_display() {
        let err = TransformError::invalid_configuration("prob out of range");
        assert_eq!(err.to_string(), "Invalid configuration: prob out of range");
    }

    #[test]
    fn test_shape_mismatch() {
        let err = TransformError::ShapeMismatch {
            expected: vec![1, 3, 3],
            actual: vec![3, 3],
        };
        let err_str = err.to_string();
        assert!(err_str.contains("expected"));
        assert!(err_str.contains("got"));
    }
}
