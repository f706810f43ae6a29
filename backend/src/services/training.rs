//! Offline training orchestrator.
//!
//! Wires the feature transform, bin definition engine, and classifiers into
//! one reproducible train/evaluate/persist sequence. Runs single-threaded
//! and single-pass; held-out accuracy is reported for human review, never
//! gated automatically.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::Path;

use crate::classifier::{GbdtClassifier, TrainParams};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::{artifacts, binning, dataset, features};
use shared::{DailyRecord, LocationKey, LocationStaticFeatures};

/// Summary of one training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub records_total: usize,
    pub records_unmatched_location: usize,
    pub locations: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub temperature_accuracy: f64,
    pub precipitation_accuracy: f64,
}

/// Run the full pipeline from the configured dataset to persisted artifacts.
pub fn run(config: &Config) -> AppResult<TrainingReport> {
    let records = dataset::load_records(&config.data.dataset_path)?;
    let geo = dataset::load_geo_features(&config.data.geo_features_path)?;
    train_from_records(
        &records,
        &geo,
        config.data.split_date,
        &params_from(config),
        &config.artifacts.dir,
    )
}

/// Classifier hyperparameters from configuration, shared by both targets.
pub fn params_from(config: &Config) -> TrainParams {
    TrainParams {
        rounds: config.training.rounds,
        learning_rate: config.training.learning_rate,
        max_depth: config.training.max_depth,
        min_samples_leaf: config.training.min_samples_leaf,
        early_stopping_rounds: config.training.early_stopping_rounds,
    }
}

/// Train both targets from in-memory records and persist the artifacts.
pub fn train_from_records(
    records: &[DailyRecord],
    geo: &HashMap<LocationKey, LocationStaticFeatures>,
    split_date: NaiveDate,
    params: &TrainParams,
    artifacts_dir: &Path,
) -> AppResult<TrainingReport> {
    // Geo enrichment by exact location identity. Rows with no matching
    // static features are excluded from training, never trained on
    // zero-filled defaults.
    let matched: Vec<DailyRecord> = records
        .iter()
        .filter(|r| geo.contains_key(&r.location))
        .cloned()
        .collect();
    let unmatched = records.len() - matched.len();
    if unmatched > 0 {
        tracing::warn!(
            unmatched,
            "records excluded: no geo feature entry for their location"
        );
    }

    tracing::info!("computing per-location percentile bins");
    let (labeled, bins) = binning::assign_bins(&matched);
    let locations = bins.temperature.len();

    // Identical transform to the one serving applies per request.
    let mut train_x: Vec<Vec<f64>> = Vec::new();
    let mut train_temp: Vec<&str> = Vec::new();
    let mut train_precip: Vec<&str> = Vec::new();
    let mut test_x: Vec<Vec<f64>> = Vec::new();
    let mut test_temp: Vec<&str> = Vec::new();
    let mut test_precip: Vec<&str> = Vec::new();

    for record in &labeled {
        let Some(static_features) = geo.get(&record.location) else {
            continue;
        };
        let vector = features::feature_vector(
            record.location.latitude,
            record.location.longitude,
            record.date,
            static_features.elevation_m,
            static_features.dist_to_coast_km,
        );
        let row = vector.as_array().to_vec();
        // chronological split: evaluation always measures forward-looking
        // generalization, never record-shuffled leakage
        if record.date < split_date {
            train_x.push(row);
            train_temp.push(record.temperature.as_str());
            train_precip.push(record.precipitation.as_str());
        } else {
            test_x.push(row);
            test_temp.push(record.temperature.as_str());
            test_precip.push(record.precipitation.as_str());
        }
    }

    if train_x.is_empty() || test_x.is_empty() {
        let partition = if train_x.is_empty() { "train" } else { "test" };
        return Err(AppError::Training(format!(
            "empty {partition} partition after chronological split at {split_date}; \
             the dataset is structurally broken"
        )));
    }
    tracing::info!(
        train_rows = train_x.len(),
        test_rows = test_x.len(),
        locations,
        "dataset split"
    );

    tracing::info!("training temperature model");
    let temperature_model =
        GbdtClassifier::fit(&train_x, &train_temp, Some((&test_x, &test_temp)), params)
            .map_err(|e| AppError::Training(e.to_string()))?;
    let temperature_accuracy = temperature_model.accuracy(&test_x, &test_temp);
    tracing::info!(
        accuracy = format!("{:.2}%", temperature_accuracy * 100.0),
        trees = temperature_model.n_trees(),
        "temperature model trained"
    );

    tracing::info!("training precipitation model");
    let precipitation_model =
        GbdtClassifier::fit(&train_x, &train_precip, Some((&test_x, &test_precip)), params)
            .map_err(|e| AppError::Training(e.to_string()))?;
    let precipitation_accuracy = precipitation_model.accuracy(&test_x, &test_precip);
    tracing::info!(
        accuracy = format!("{:.2}%", precipitation_accuracy * 100.0),
        trees = precipitation_model.n_trees(),
        "precipitation model trained"
    );

    artifacts::store(artifacts_dir, &temperature_model, &precipitation_model, &bins)?;

    Ok(TrainingReport {
        records_total: records.len(),
        records_unmatched_location: unmatched,
        locations,
        train_rows: train_x.len(),
        test_rows: test_x.len(),
        temperature_accuracy,
        precipitation_accuracy,
    })
}
