//! Cloud security API client errors

use thiserror::Error;

/// Errors that can occur when interacting with the firewall-group API
#[derive(Debug, Error)]
pub enum CloudSecError {
    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned an error
    #[error("Cloud API error: {0}")]
    Api(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Authentication failed (invalid token, expired, etc.)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// The resource is still referenced by another resource
    #[error("Failed dependency: {0}")]
    FailedDependency(String),

    /// Invalid request (e.g., missing required fields)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CloudSecError {
    /// True for errors where the target resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// True for errors where another resource still depends on the target.
    #[must_use]
    pub fn is_failed_dependency(&self) -> bool {
        matches!(self, Self::FailedDependency(_))
    }
}
