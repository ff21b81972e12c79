//! fare-api: HTTP API for the fare comparison gateway
//!
//! REST endpoints for fare comparison, deep-link generation and
//! credential management. Built with axum for async HTTP handling.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;

pub use error::{ApiError, ErrorResponse, Result};
pub use server::{start_server, AppState};
