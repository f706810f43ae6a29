//! Configuration management for the AuraCast platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with AURACAST_ prefix

use chrono::NaiveDate;
use config::{ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Artifact store configuration
    pub artifacts: ArtifactConfig,

    /// Offline dataset configuration
    pub data: DataConfig,

    /// Classifier hyperparameters, shared by both targets
    pub training: TrainingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ArtifactConfig {
    /// Directory holding the trained model blobs and bin metadata
    pub dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// Curated historical dataset CSV
    pub dataset_path: PathBuf,

    /// Geo enrichment table JSON (static features per location)
    pub geo_features_path: PathBuf,

    /// Chronological train/test cutoff: records before this date train,
    /// records on or after it evaluate
    pub split_date: NaiveDate,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TrainingConfig {
    /// Maximum boosting rounds per target
    pub rounds: usize,

    /// Shrinkage applied to every tree
    pub learning_rate: f64,

    /// Maximum tree depth
    pub max_depth: usize,

    /// Minimum samples per leaf
    pub min_samples_leaf: usize,

    /// Stop after this many rounds without held-out improvement (0 disables)
    pub early_stopping_rounds: usize,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("AURACAST_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("artifacts.dir", "model_artifacts")?
            .set_default("data.dataset_path", "data/curated_daily_records.csv")?
            .set_default("data.geo_features_path", "data/geo_features.json")?
            .set_default("data.split_date", "2019-01-01")?
            .set_default("training.rounds", 300)?
            .set_default("training.learning_rate", 0.05)?
            .set_default("training.max_depth", 3)?
            .set_default("training.min_samples_leaf", 20)?
            .set_default("training.early_stopping_rounds", 50)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (AURACAST_ prefix)
            .add_source(
                Environment::with_prefix("AURACAST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
        }
    }
}
