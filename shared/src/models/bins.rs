//! Percentile bin threshold metadata

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Temperature percentile cut points for one location, in degrees C.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureThresholds {
    pub very_cold: f64,
    pub cold: f64,
    pub hot: f64,
    pub very_hot: f64,
}

impl TemperatureThresholds {
    /// Percentile cut points must not cross.
    pub fn is_monotonic(&self) -> bool {
        self.very_cold <= self.cold && self.cold <= self.hot && self.hot <= self.very_hot
    }
}

/// Light/heavy precipitation cut point for one location, in mm per day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationThresholds {
    pub light_rain_thresh: f64,
}

/// Threshold metadata for every trained location, keyed `"<lat>_<lon>"`.
///
/// Persisted alongside the model artifacts for audit and documentation; the
/// trained classifiers have internalized the boundaries, so inference never
/// replays this document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherBins {
    pub temperature: BTreeMap<String, TemperatureThresholds>,
    pub precipitation: BTreeMap<String, PrecipitationThresholds>,
}
