//! AuraCast offline training entry point
//!
//! Runs the full pipeline: dataset load, geo enrichment, percentile
//! binning, chronological split, two classifier fits, artifact persistence.

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auracast_backend::services::training;
use auracast_backend::Config;

#[derive(Parser, Debug)]
#[command(
    name = "auracast-train",
    about = "Train the AuraCast temperature and precipitation models"
)]
struct Args {
    /// Curated dataset CSV (overrides configuration)
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Geo feature table JSON (overrides configuration)
    #[arg(short, long)]
    geo_features: Option<PathBuf>,

    /// Artifact output directory (overrides configuration)
    #[arg(short, long)]
    artifacts_dir: Option<PathBuf>,

    /// Chronological train/test cutoff date, YYYY-MM-DD (overrides
    /// configuration)
    #[arg(long)]
    split_date: Option<NaiveDate>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auracast_backend=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let args = Args::parse();
    let mut config = Config::load()?;
    if let Some(dataset) = args.dataset {
        config.data.dataset_path = dataset;
    }
    if let Some(geo_features) = args.geo_features {
        config.data.geo_features_path = geo_features;
    }
    if let Some(artifacts_dir) = args.artifacts_dir {
        config.artifacts.dir = artifacts_dir;
    }
    if let Some(split_date) = args.split_date {
        config.data.split_date = split_date;
    }

    let report = training::run(&config)?;

    tracing::info!(
        records = report.records_total,
        excluded_unmatched = report.records_unmatched_location,
        locations = report.locations,
        train_rows = report.train_rows,
        test_rows = report.test_rows,
        "training complete"
    );
    tracing::info!(
        temperature_accuracy = format!("{:.2}%", report.temperature_accuracy * 100.0),
        precipitation_accuracy = format!("{:.2}%", report.precipitation_accuracy * 100.0),
        "held-out accuracy for review"
    );

    Ok(())
}
