//! Error types for fare-scrapers
//!
//! The agent-level taxonomy. Everything here is caught at the agent
//! boundary and converted into a failed price record; nothing crosses the
//! orchestrator except route validation, which fails before fan-out.

use thiserror::Error;

use fare_browser::BrowserError;
use fare_core::ServiceKind;

/// fare-scrapers error type
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Login required for {0}. Please provide a valid session.")]
    SessionRequired(ServiceKind),

    #[error("Timed out waiting for {what} after {}s", .budget.as_secs())]
    Timeout {
        what: String,
        budget: std::time::Duration,
    },

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Could not extract price information from {0}")]
    NoFareFound(ServiceKind),

    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    #[error("Agent task failed: {0}")]
    Task(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for fare-scrapers
pub type Result<T> = std::result::Result<T, ScrapeError>;
