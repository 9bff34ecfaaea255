use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use flowkit::{CoreError, GenerationError};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Error payload returned by every endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    /// Canonical status name, e.g. "NOT_FOUND"
    pub status: String,
    pub message: String,
}

/// A failed request, rendered as [`ErrorBody`]
#[derive(Error, Debug)]
#[error("{code}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_ARGUMENT", message)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message),
            CoreError::InvalidRequest(_) => Self::invalid_argument(message),
            CoreError::Config(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "FAILED_PRECONDITION",
                message,
            ),
            CoreError::Generation(GenerationError::Timeout(_)) => {
                Self::new(StatusCode::GATEWAY_TIMEOUT, "DEADLINE_EXCEEDED", message)
            }
            CoreError::Generation(GenerationError::MalformedResponse(_)) => {
                Self::new(StatusCode::BAD_GATEWAY, "INTERNAL", message)
            }
            CoreError::Generation(_) => Self::new(StatusCode::BAD_GATEWAY, "UNAVAILABLE", message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                status: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = ApiError::from(CoreError::NotFound("model not found: x".to_string()));
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);
        assert_eq!(not_found.code, "NOT_FOUND");

        let timeout = ApiError::from(CoreError::Generation(GenerationError::Timeout(
            "elapsed".to_string(),
        )));
        assert_eq!(timeout.status, StatusCode::GATEWAY_TIMEOUT);

        let refused = ApiError::from(CoreError::Generation(GenerationError::Network(
            "connection refused".to_string(),
        )));
        assert_eq!(refused.status, StatusCode::BAD_GATEWAY);
        assert_eq!(refused.code, "UNAVAILABLE");
        assert!(refused.message.contains("connection refused"));
    }
}
