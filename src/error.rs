//! Common error types for the driver location gateway

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid driver id: {0}")]
    InvalidDriverId(String),

    #[error("Unprocessable body: {0}")]
    UnprocessableBody(String),

    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(String),

    #[error("Service registry error: {0}")]
    Registry(String),

    #[error("Circuit open for {0}")]
    CircuitOpen(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response format
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub message: String,
    pub r#type: String,
    pub code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, code) = match &self {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "server_error", None),
            AppError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "server_error", None),
            AppError::InvalidDriverId(_) => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                Some("invalid_driver_id"),
            ),
            AppError::UnprocessableBody(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_request_error",
                Some("unprocessable_body"),
            ),
            AppError::DependencyUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "dependency_error",
                Some("no_healthy_instances"),
            ),
            AppError::Registry(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "dependency_error",
                Some("registry_unreachable"),
            ),
            AppError::CircuitOpen(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "dependency_error",
                Some("circuit_open"),
            ),
            AppError::Timeout(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "dependency_error",
                Some("timeout"),
            ),
            AppError::Transport(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "dependency_error",
                Some("transport"),
            ),
            AppError::Decode(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "dependency_error",
                Some("bad_payload"),
            ),
            AppError::Publish(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "server_error",
                Some("publish_failed"),
            ),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "server_error", None),
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                message: self.to_string(),
                r#type: error_type.to_string(),
                code: code.map(|c| c.to_string()),
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
