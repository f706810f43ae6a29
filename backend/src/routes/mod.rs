//! Route definitions for the AuraCast prediction service

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create service routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Welcome/info (never requires models)
        .route("/", get(handlers::root))
        // Health check with per-model load state
        .route("/health", get(handlers::health_check))
        // Prediction
        .route("/predict", post(handlers::predict))
}
