//! Error types for the Codepad HTTP surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

/// Result type alias for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Errors that can occur while serving a request.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Invalid request format
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Language label that neither the static table nor the judge catalog knows
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// The judge accepted the request but returned no job token
    #[error("Failed to create submission")]
    SubmissionFailed { raw: serde_json::Value },

    /// Polling finished without a single response from the judge
    #[error("No result returned from execution service")]
    NoResult,

    /// Failure talking to one of the external services
    #[error("{service} request failed: {message}")]
    Upstream { service: String, message: String },

    /// Inbound rate limit exceeded
    #[error("Too many requests")]
    RateLimited,

    /// Server configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Create a new invalid request error.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a new missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    /// Create a new upstream error.
    pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upstream {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Convert ServerError to HTTP status code
impl ServerError {
    pub fn status_code(&self) -> u16 {
        match self {
            ServerError::InvalidRequest(_)
            | ServerError::MissingField(_)
            | ServerError::UnsupportedLanguage(_) => 400,
            ServerError::RateLimited => 429,
            ServerError::SubmissionFailed { .. }
            | ServerError::NoResult
            | ServerError::Upstream { .. }
            | ServerError::Config(_)
            | ServerError::Internal(_) => 500,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ServerError::InvalidRequest(_) => "invalid_request",
            ServerError::MissingField(_) => "missing_field",
            ServerError::UnsupportedLanguage(_) => "unsupported_language",
            ServerError::SubmissionFailed { .. } => "submission_failed",
            ServerError::NoResult => "no_result",
            ServerError::Upstream { .. } => "upstream_error",
            ServerError::RateLimited => "rate_limited",
            ServerError::Config(_) => "config_error",
            ServerError::Internal(_) => "internal_error",
        }
    }

    /// The short message the UI shows; details go in a separate field.
    fn headline(&self) -> String {
        match self {
            ServerError::MissingField(_) => "Code and language are required".to_string(),
            ServerError::Upstream { service, .. } => format!("{} request failed", service),
            other => other.to_string(),
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            ServerError::MissingField(field) => Some(format!("missing field '{}'", field)),
            ServerError::Upstream { message, .. } => Some(message.clone()),
            ServerError::Config(msg) | ServerError::Internal(msg) => Some(msg.clone()),
            _ => None,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut body = json!({
            "error": self.headline(),
            "type": self.error_type(),
            "timestamp": chrono::Utc::now(),
        });
        if let Some(details) = self.details() {
            body["details"] = json!(details);
        }
        if let ServerError::SubmissionFailed { raw } = self {
            body["raw"] = raw;
        }

        (status, Json(body)).into_response()
    }
}
