//! Error types for the résumé scorer

use thiserror::Error;

/// Result type alias for scorer operations
pub type Result<T> = std::result::Result<T, ScorerError>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum ScorerError {
    #[error("Unsupported model kind: {0} does not expose feature importances")]
    UnsupportedModelKind(String),

    #[error("Missing preprocessor stage: no column transformer named '{0}' before the estimator")]
    MissingPreprocessorStage(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Model not fitted")]
    NotFitted,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Duplicate stage name: {0}")]
    DuplicateStage(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Model file not found at: {0}")]
    ModelNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Computation error: {0}")]
    ComputationError(String),
}

impl From<polars::error::PolarsError> for ScorerError {
    fn from(err: polars::error::PolarsError) -> Self {
        ScorerError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for ScorerError {
    fn from(err: serde_json::Error) -> Self {
        ScorerError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for ScorerError {
    fn from(err: ndarray::ShapeError) -> Self {
        ScorerError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScorerError::DataError("test error".to_string());
        assert_eq!(err.to_string(), "Data error: test error");

        let err = ScorerError::MissingPreprocessorStage("preprocessor".to_string());
        assert!(err.to_string().contains("'preprocessor'"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ScorerError = io_err.into();
        assert!(matches!(err, ScorerError::IoError(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ScorerError = json_err.into();
        assert!(matches!(err, ScorerError::SerializationError(_)));
    }
}
