//! Error types for analytics persistence

use crate::error::AppError;

/// Result type for analytics operations
pub type AnalyticsResult<T> = std::result::Result<T, AnalyticsError>;

/// Errors raised by an [`AnalyticsStore`](super::AnalyticsStore).
/// The recorder logs these and keeps serving searches.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    /// Storage backend failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Snapshot could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<sled::Error> for AnalyticsError {
    fn from(err: sled::Error) -> Self {
        AnalyticsError::Storage(err.to_string())
    }
}

impl From<AnalyticsError> for AppError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::Storage(msg) => AppError::Storage(msg),
            AnalyticsError::Serialization(e) => AppError::Serialization(e.to_string()),
        }
    }
}
