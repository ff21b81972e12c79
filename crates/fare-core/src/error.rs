//! Error types for fare-core

use thiserror::Error;

/// Main error type for fare-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for fare-core
pub type Result<T> = std::result::Result<T, Error>;
