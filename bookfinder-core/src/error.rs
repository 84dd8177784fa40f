//! Error types for Bookfinder Core

use thiserror::Error;

/// Result type alias using BookfinderError
pub type Result<T> = std::result::Result<T, BookfinderError>;

/// Top-level error type for all Bookfinder operations
#[derive(Debug, Error)]
pub enum BookfinderError {
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors produced by a search request
#[derive(Debug, Error)]
pub enum SearchError {
    /// The request was superseded or explicitly cancelled
    #[error("Request cancelled")]
    Cancelled,

    #[error("HTTP error! status: {code} {reason}")]
    Status { code: u16, reason: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response body: {0}")]
    InvalidBody(String),
}

impl SearchError {
    /// Whether this error only signals cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SearchError::Cancelled)
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SearchError::InvalidBody(err.to_string())
        } else {
            SearchError::Network(err.to_string())
        }
    }
}

/// Errors that occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Quota exceeded: {needed} bytes requested, {limit} allowed")]
    QuotaExceeded { needed: usize, limit: usize },

    #[error("Backend error: {0}")]
    BackendError(String),
}
