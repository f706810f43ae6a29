//! AuraCast climatology backend
//!
//! Offline training pipeline and online inference service for per-location
//! probability distributions over coarse temperature and precipitation
//! categories, learned from decades of historical daily records.

use std::sync::Arc;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod classifier;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;

use services::predictor::ModelContext;

/// Application state shared across handlers.
///
/// The model context is constructed once before serving begins and never
/// mutated afterward, so concurrent predict calls share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<ModelContext>,
    pub config: Arc<Config>,
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
