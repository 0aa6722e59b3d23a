//! Error handling for the check service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, CheckError>;

/// Service error types
///
/// The first four variants are Task rejections: the pipeline converts them
/// into an `OperationOutcome` with HTTP 400. Everything else is rendered as a
/// generic error body.
#[derive(Error, Debug)]
pub enum CheckError {
    /// Malformed Task document
    #[error("{0}")]
    Shape(String),

    /// Focus reference unresolvable or of the wrong type
    #[error("{0}")]
    Resolution(String),

    /// Canonical lookup matched nothing
    #[error("ActivityDefinition not found for canonical URL '{canonical}'")]
    NotFound { canonical: String },

    /// Canonical lookup matched more than one definition
    #[error("Multiple ActivityDefinitions found for canonical URL '{canonical}'")]
    Ambiguous { canonical: String },

    /// Credential acquisition against a token endpoint failed
    #[error("Failed to refresh token: {0}")]
    Auth(String),

    /// Network or HTTP failure against a downstream server
    #[error("Upstream request failed: {0}")]
    Transport(String),

    /// The ActivityDefinition names a check this deployment does not carry
    #[error("Unsupported check in ActivityDefinition: {0}")]
    UnsupportedCheck(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl CheckError {
    /// Whether this error rejects the Task itself (→ OperationOutcome, 400)
    /// rather than reporting a service-side fault.
    pub fn rejects_task(&self) -> bool {
        matches!(
            self,
            CheckError::Shape(_)
                | CheckError::Resolution(_)
                | CheckError::NotFound { .. }
                | CheckError::Ambiguous { .. }
        )
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CheckError::Shape(_) => StatusCode::BAD_REQUEST,
            CheckError::Resolution(_) => StatusCode::BAD_REQUEST,
            CheckError::NotFound { .. } => StatusCode::BAD_REQUEST,
            CheckError::Ambiguous { .. } => StatusCode::BAD_REQUEST,
            CheckError::Auth(_) => StatusCode::BAD_GATEWAY,
            CheckError::Transport(_) => StatusCode::BAD_GATEWAY,
            CheckError::UnsupportedCheck(_) => StatusCode::BAD_REQUEST,
            CheckError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CheckError::Json(_) => StatusCode::BAD_REQUEST,
            CheckError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CheckError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            CheckError::Shape(_) => "MALFORMED_TASK",
            CheckError::Resolution(_) => "FOCUS_RESOLUTION_ERROR",
            CheckError::NotFound { .. } => "ACTIVITY_DEFINITION_NOT_FOUND",
            CheckError::Ambiguous { .. } => "ACTIVITY_DEFINITION_AMBIGUOUS",
            CheckError::Auth(_) => "AUTH_ERROR",
            CheckError::Transport(_) => "TRANSPORT_ERROR",
            CheckError::UnsupportedCheck(_) => "UNSUPPORTED_CHECK",
            CheckError::Config(_) => "CONFIG_ERROR",
            CheckError::Json(_) => "JSON_ERROR",
            CheckError::Io(_) => "IO_ERROR",
            CheckError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for CheckError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(
                error = %self,
                status = %status,
                error_code = error_code,
                "request failed"
            );
        } else {
            tracing::warn!(
                error = %self,
                status = %status,
                error_code = error_code,
                "request rejected"
            );
        }

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
                "status": status.as_u16()
            }
        }));

        (status, body).into_response()
    }
}
