//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub crops: Vec<String>,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let registry = state.diagnosis.registry();
    let status = if registry.is_empty() { "degraded" } else { "healthy" };
    let crops = registry.crops().iter().map(ToString::to_string).collect();

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        crops,
    })
}
