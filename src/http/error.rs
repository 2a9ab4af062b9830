//! Mapping of handler failures onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::store::StoreError;

/// Body text for payloads that are not a JSON object.
pub const INVALID_FORMAT: &str = "Invalid request format. JSON data required.";

/// Body text when the reading value is absent or null.
pub const VALUE_REQUIRED: &str = "Blood sugar value is required";

/// Body text for deletes of unknown ids.
pub const LOG_NOT_FOUND: &str = "Log not found";

/// Errors returned by the request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Payload missing, not JSON, not an object, or lacking a value.
    #[error("{0}")]
    MalformedRequest(String),

    /// The addressed reading does not exist.
    #[error("Log not found")]
    NotFound,

    /// The store failed; details are logged, not returned.
    #[error("Storage failure: {0}")]
    Storage(StoreError),
}

impl ApiError {
    pub fn malformed(message: impl Into<String>) -> Self {
        ApiError::MalformedRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound,
            other => ApiError::Storage(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Storage(err) => {
                tracing::error!(error = %err, "Store operation failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_not_found_maps_to_404() {
        let err = ApiError::from(StoreError::NotFound(3));
        assert!(matches!(err, ApiError::NotFound));
        assert_eq!(err.to_string(), LOG_NOT_FOUND);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_storage_errors_are_500() {
        let err = ApiError::from(StoreError::Closed);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_malformed_is_400() {
        let err = ApiError::malformed(VALUE_REQUIRED);
        assert_eq!(err.to_string(), VALUE_REQUIRED);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
