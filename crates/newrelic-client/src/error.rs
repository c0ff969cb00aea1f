//! New Relic client errors

use thiserror::Error;

/// Errors that can occur when interacting with the New Relic APIs
#[derive(Debug, Error)]
pub enum NewRelicError {
    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// New Relic returned an error (GraphQL `errors[]` or a non-success status)
    #[error("New Relic API error: {0}")]
    Api(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Authentication failed (invalid or revoked API key)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Resource not found
    #[error("Not Found: {0}")]
    NotFound(String),

    /// Invalid request (e.g., unknown region)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl NewRelicError {
    /// True for errors meaning the addressed resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, NewRelicError::NotFound(_))
    }
}
