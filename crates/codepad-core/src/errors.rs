//! Error types for the code assistant core
//!
//! Failures are grouped by where they originate: the caller's input, missing
//! credentials, the judge service, or the generative-language service. The
//! HTTP layer maps each group onto a status code, so variants stay coarse and
//! carry whatever upstream payload is useful for diagnosis.

use codepad_http::ServerError;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum CodepadError {
    #[error("Unsupported language: {language}")]
    UnsupportedLanguage { language: String },
    #[error("No API key configured for {service}")]
    MissingCredentials { service: String },
    #[error("Failed to create submission")]
    SubmissionFailed { raw: serde_json::Value },
    #[error("No result returned from execution service")]
    NoResult,
    #[error("{service} request failed: {message}")]
    Upstream { service: String, message: String },
    #[error("Parsing error: {0}")]
    ParsingError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl CodepadError {
    pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        CodepadError::Upstream {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn missing_credentials(service: impl Into<String>) -> Self {
        CodepadError::MissingCredentials {
            service: service.into(),
        }
    }
}

impl From<CodepadError> for ServerError {
    fn from(err: CodepadError) -> Self {
        match err {
            CodepadError::UnsupportedLanguage { language } => {
                ServerError::UnsupportedLanguage(language)
            }
            CodepadError::MissingCredentials { service } => ServerError::upstream(
                service.clone(),
                format!("No API key configured for {}", service),
            ),
            CodepadError::SubmissionFailed { raw } => ServerError::SubmissionFailed { raw },
            CodepadError::NoResult => ServerError::NoResult,
            CodepadError::Upstream { service, message } => ServerError::Upstream { service, message },
            CodepadError::ParsingError(msg) => ServerError::upstream("Upstream", msg),
            CodepadError::ConfigError(msg) => ServerError::Config(msg),
        }
    }
}
