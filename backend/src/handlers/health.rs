//! Health and info handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Root endpoint: a static welcome message that never requires models.
pub async fn root() -> &'static str {
    "Welcome to the AuraCast Prediction API"
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub models: ModelStatus,
}

#[derive(Serialize)]
pub struct ModelStatus {
    pub temperature: String,
    pub precipitation: String,
}

fn slot_status(slot: &Result<crate::classifier::GbdtClassifier, String>) -> String {
    match slot {
        Ok(_) => "loaded".to_string(),
        Err(e) => format!("unavailable: {e}"),
    }
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.context.fully_loaded() {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        models: ModelStatus {
            temperature: slot_status(&state.context.temperature),
            precipitation: slot_status(&state.context.precipitation),
        },
    })
}
