//! Error types for fare-browser

use thiserror::Error;

/// fare-browser error type
#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Browser initialization failed: {0}")]
    Initialization(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Interaction failed: {0}")]
    Interaction(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Cookie error: {0}")]
    Cookie(String),

    #[error("Tab error: {0}")]
    TabError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, BrowserError>;
