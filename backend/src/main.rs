//! AuraCast inference server
//!
//! Loads the trained model artifacts once at startup and serves combined
//! temperature/precipitation climatology predictions over HTTP.

use std::{net::SocketAddr, sync::Arc};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auracast_backend::services::predictor::ModelContext;
use auracast_backend::{create_app, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auracast_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting AuraCast prediction server");
    tracing::info!("Environment: {}", config.environment);

    // Load all model artifacts exactly once; nothing mutates them afterward
    let context = ModelContext::load(&config.artifacts.dir);
    if !context.fully_loaded() {
        tracing::warn!("starting without all models loaded; /predict will report the failure");
    }

    // Create application state
    let state = AppState {
        context: Arc::new(context),
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
