//! Error types for the server

use crate::error::ScorerError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Prediction failed: {0}")]
    Prediction(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ScorerError> for ServerError {
    fn from(err: ScorerError) -> Self {
        match err {
            ScorerError::InvalidInput(_) | ScorerError::FeatureNotFound(_) => {
                ServerError::BadRequest(err.to_string())
            }
            other => ServerError::Prediction(other.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::Prediction(msg) => {
                tracing::error!(detail = %msg, "Prediction error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            ServerError::Internal(msg) => {
                tracing::error!(detail = %msg, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "An internal error occurred".to_string())
            }
        };

        let body = Json(json!({
            "error": true,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scorer_error_mapping() {
        let err: ServerError = ScorerError::FeatureNotFound("Skills".to_string()).into();
        assert!(matches!(err, ServerError::BadRequest(_)));

        let err: ServerError = ScorerError::NotFitted.into();
        assert!(matches!(err, ServerError::Prediction(_)));
    }

    #[test]
    fn test_status_codes() {
        let response = ServerError::BadRequest("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ServerError::Prediction("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
