//! Error types for the AI completion boundary

use crate::error::AppError;

/// Result type for AI operations
pub type AiResult<T> = std::result::Result<T, AiError>;

/// Failures at the completion boundary. These never reach search callers:
/// the reranker converts them into degraded results.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AiError {
    /// Transport failure (connect, timeout, TLS)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Provider answered without any completion text
    #[error("Provider returned an empty completion")]
    EmptyCompletion,

    /// No JSON value could be located in the completion
    #[error("No JSON found in completion")]
    MissingJson,

    /// JSON did not match the expected schema
    #[error("Schema mismatch: {0}")]
    Schema(String),

    /// Invalid provider configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        AiError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AiError {
    fn from(err: serde_json::Error) -> Self {
        AiError::Schema(err.to_string())
    }
}

impl From<AiError> for AppError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::Configuration(msg) => AppError::Configuration(msg),
            _ => AppError::Ai(err.to_string()),
        }
    }
}
