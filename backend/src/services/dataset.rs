//! Offline record-store and geo-table loading.
//!
//! The acquisition process that produced these files is an external
//! collaborator; this module only reads its normalized outputs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{AppError, AppResult};
use shared::{DailyRecord, LocationKey, LocationStaticFeatures};

/// Columns the curated dataset must carry.
const REQUIRED_COLUMNS: [&str; 9] = [
    "date",
    "t_max_c",
    "t_min_c",
    "precip_mm",
    "wind_speed_ms",
    "solar_rad_w_m2",
    "rh_percent",
    "latitude",
    "longitude",
];

#[derive(Debug, Deserialize)]
struct DatasetRow {
    date: NaiveDate,
    t_max_c: Option<f64>,
    t_min_c: Option<f64>,
    precip_mm: Option<f64>,
    wind_speed_ms: Option<f64>,
    solar_rad_w_m2: Option<f64>,
    rh_percent: Option<f64>,
    latitude: Decimal,
    longitude: Decimal,
}

impl From<DatasetRow> for DailyRecord {
    fn from(row: DatasetRow) -> Self {
        DailyRecord {
            location: LocationKey::new(row.latitude, row.longitude),
            date: row.date,
            t_max_c: row.t_max_c,
            t_min_c: row.t_min_c,
            precip_mm: row.precip_mm,
            wind_speed_ms: row.wind_speed_ms,
            solar_rad_w_m2: row.solar_rad_w_m2,
            rh_percent: row.rh_percent,
        }
    }
}

/// Load the curated daily records CSV.
///
/// A file missing required columns is structurally broken and fatal; an
/// individual malformed or duplicate row is skipped with a warning.
pub fn load_records(path: &Path) -> AppResult<Vec<DailyRecord>> {
    let file = File::open(path)
        .map_err(|e| AppError::Dataset(format!("cannot open {}: {e}", path.display())))?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(AppError::Dataset(format!(
                "dataset is missing required column '{column}'"
            )));
        }
    }

    let mut records = Vec::new();
    let mut seen: HashSet<(LocationKey, NaiveDate)> = HashSet::new();
    let mut malformed = 0usize;
    let mut duplicates = 0usize;
    for result in reader.deserialize::<DatasetRow>() {
        match result {
            Ok(row) => {
                let record = DailyRecord::from(row);
                // at most one record per (location, date); first one wins
                if seen.insert((record.location, record.date)) {
                    records.push(record);
                } else {
                    duplicates += 1;
                }
            }
            Err(e) => {
                malformed += 1;
                tracing::warn!("skipping malformed dataset row: {e}");
            }
        }
    }
    if malformed > 0 || duplicates > 0 {
        tracing::warn!(malformed, duplicates, "dataset rows dropped during load");
    }
    tracing::info!(records = records.len(), "dataset loaded");
    Ok(records)
}

/// Load the geo enrichment table: static features per exact location.
pub fn load_geo_features(
    path: &Path,
) -> AppResult<HashMap<LocationKey, LocationStaticFeatures>> {
    let file = File::open(path)
        .map_err(|e| AppError::Dataset(format!("cannot open {}: {e}", path.display())))?;
    let entries: Vec<LocationStaticFeatures> = serde_json::from_reader(BufReader::new(file))?;
    let table: HashMap<LocationKey, LocationStaticFeatures> = entries
        .into_iter()
        .map(|entry| (entry.location, entry))
        .collect();
    tracing::info!(locations = table.len(), "geo feature table loaded");
    Ok(table)
}
