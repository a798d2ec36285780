//! Centralized error types for Busy Bee.

use thiserror::Error;

/// Main error type for core operations.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Query must not be empty")]
    EmptyQuery,

    #[error("Invalid analysis type: {0}")]
    InvalidKind(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a storage error.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
