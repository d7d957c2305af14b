//! Route definitions for the Crop Disease Advisor

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Crop profiles
        .route("/crops", get(handlers::list_crops))
        // Diagnosis routes
        .nest("/diagnoses", diagnosis_routes())
}

/// Diagnosis routes
fn diagnosis_routes() -> Router<AppState> {
    Router::new().route("/", post(handlers::create_diagnosis))
}
