//! HTTP API Server
//!
//! Starts and manages the axum-based HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::info;

use fare_browser::BrowserLauncher;
use fare_core::{Config, CredentialManager};

use crate::routes::routes;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub credentials: CredentialManager,
    pub launcher: Arc<dyn BrowserLauncher>,
}

/// Start the HTTP API server
pub async fn start_server(
    port: u16,
    config: Config,
    credentials: CredentialManager,
    launcher: Arc<dyn BrowserLauncher>,
) -> anyhow::Result<()> {
    let state = AppState {
        config,
        credentials,
        launcher,
    };

    let app = Router::new()
        .merge(routes())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("HTTP API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
