//! HTTP API handlers
//!
//! Request handlers for fare comparison and credential management.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use fare_core::{
    app_links, booking_links, BookingLinks, ComparisonResult, DeepLinks, Route,
    ServiceCredential, ServiceKind, SessionCookie, SessionMap,
};
use fare_scrapers::profiles_for;

use crate::error::{ApiError, Result};
use crate::server::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

/// Comparison request payload: the six route fields, plus an optional
/// user whose stored credentials seed the agents
#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub pickup: String,
    pub drop: String,
    pub pickup_lat: f64,
    pub pickup_lng: f64,
    pub drop_lat: f64,
    pub drop_lng: f64,
    pub user_id: Option<String>,
}

impl CompareRequest {
    fn into_route(self) -> Route {
        Route {
            pickup: self.pickup,
            drop: self.drop,
            pickup_lat: self.pickup_lat,
            pickup_lng: self.pickup_lng,
            drop_lat: self.drop_lat,
            drop_lng: self.drop_lng,
        }
    }
}

/// Comparison response payload
#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: ComparisonResult,
}

/// Deep-link response payload
#[derive(Debug, Serialize)]
pub struct LinksResponse {
    pub success: bool,
    pub app: DeepLinks,
    pub booking: BookingLinks,
    pub generated_at: DateTime<Utc>,
}

/// Credential save payload
#[derive(Debug, Deserialize)]
pub struct SaveCredentialRequest {
    pub user_id: String,
    pub service: String,
    #[serde(default)]
    pub cookies: Vec<SessionCookie>,
    pub token: Option<String>,
}

/// Credential delete payload
#[derive(Debug, Deserialize)]
pub struct DeleteCredentialRequest {
    pub user_id: String,
    pub service: String,
}

/// Credential mutation acknowledgement
#[derive(Debug, Serialize)]
pub struct CredentialResponse {
    pub success: bool,
    pub message: String,
}

/// Connected services response
#[derive(Debug, Serialize)]
pub struct ConnectedServicesResponse {
    pub success: bool,
    pub user_id: String,
    pub connected_services: Vec<ServiceKind>,
}

// ============================================================================
// Handler functions
// ============================================================================

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Run a full comparison batch for one route
pub async fn compare_prices(
    State(state): State<AppState>,
    Json(req): Json<CompareRequest>,
) -> Result<Json<CompareResponse>> {
    debug!("Comparison request: {} -> {}", req.pickup, req.drop);

    let user_id = req.user_id.clone();
    let route = req.into_route();
    route.validate().map_err(ApiError::Core)?;

    let sessions = match user_id {
        Some(user_id) => state
            .credentials
            .session_map(&user_id, &state.config.services)?,
        None => SessionMap::new(),
    };

    let profiles = profiles_for(&state.config.services);
    let result =
        fare_scrapers::compare(&route, &sessions, profiles, Arc::clone(&state.launcher))
            .await?;

    Ok(Json(CompareResponse {
        success: true,
        result,
    }))
}

/// Build per-service deep links for one route; no browser involved
pub async fn deep_links(Json(req): Json<CompareRequest>) -> Result<Json<LinksResponse>> {
    let route = req.into_route();
    route.validate().map_err(ApiError::Core)?;

    let app = app_links(&route);
    let booking = booking_links(&route)?;

    Ok(Json(LinksResponse {
        success: true,
        app,
        booking,
        generated_at: Utc::now(),
    }))
}

/// Save a captured credential for one (user, service) pair
pub async fn save_credential(
    State(state): State<AppState>,
    Json(req): Json<SaveCredentialRequest>,
) -> Result<Json<CredentialResponse>> {
    let service = ServiceKind::from_str(&req.service)
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    let credential = ServiceCredential::new(req.cookies, req.token);

    state.credentials.save(&req.user_id, service, &credential)?;

    Ok(Json(CredentialResponse {
        success: true,
        message: format!("Session saved for {}", service),
    }))
}

/// List the services a user has stored credentials for
pub async fn connected_services(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ConnectedServicesResponse>> {
    let connected = state.credentials.connected_services(&user_id)?;

    Ok(Json(ConnectedServicesResponse {
        success: true,
        user_id,
        connected_services: connected,
    }))
}

/// Delete one stored credential
pub async fn delete_credential(
    State(state): State<AppState>,
    Json(req): Json<DeleteCredentialRequest>,
) -> Result<Json<CredentialResponse>> {
    let service = ServiceKind::from_str(&req.service)
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    if !state.credentials.delete(&req.user_id, service)? {
        return Err(ApiError::NotFound(format!(
            "no session stored for {} / {}",
            req.user_id, service
        )));
    }

    info!("Session deleted for user {}, service: {}", req.user_id, service);

    Ok(Json(CredentialResponse {
        success: true,
        message: format!("Session deleted for {}", service),
    }))
}
