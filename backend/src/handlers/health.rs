//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage: String,
    pub inference: bool,
    pub notifications: bool,
}

/// Root endpoint
pub async fn root() -> &'static str {
    "Krishi Sakhi Farmer Advisory API v1"
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: state.store.backend_name().to_string(),
        inference: state.config.inference.enabled,
        notifications: state.notifications.is_enabled(),
    })
}
