//! Route definitions
//!
//! Defines all HTTP API endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{
    compare_prices, connected_services, deep_links, delete_credential, health, save_credential,
};
use crate::server::AppState;

/// Create the API router
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Price comparison
        .route("/api/prices/compare", post(compare_prices))
        .route("/api/prices/links", post(deep_links))
        // Credential management
        .route(
            "/api/auth/session",
            post(save_credential).delete(delete_credential),
        )
        .route("/api/auth/sessions/{user_id}", get(connected_services))
}
