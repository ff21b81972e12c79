//! fare-browser: Browser automation layer for fare-gateway
//!
//! Defines the session contract the scraping agents drive and implements
//! it over headless Chrome. Each agent invocation launches its own
//! session and closes it on exit; sessions are never shared or reused.

pub mod chrome;
pub mod error;
pub mod session;

pub use chrome::{ChromeLauncher, ChromeSession};
pub use error::{BrowserError, Result};
pub use session::{BrowserConfig, BrowserConfigBuilder, BrowserLauncher, BrowserSession, NavWait};
