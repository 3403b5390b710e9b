//! Error types for the preference memory

use thiserror::Error;

/// Result type alias for preference memory operations
pub type Result<T> = std::result::Result<T, MemoryError>;

#[derive(Error, Debug)]
pub enum MemoryError {

    // =============================
    // Storage Errors
    // =============================

    /// The document store could not be reached or rejected the operation.
    /// Never retried internally.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    // =============================
    // Boundary Errors
    // =============================

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid tool input: {0}")]
    InvalidToolInput(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<sqlx::Error> for MemoryError {
    fn from(error: sqlx::Error) -> Self {
        MemoryError::StorageUnavailable(error.to_string())
    }
}
