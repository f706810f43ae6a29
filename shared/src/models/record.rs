//! Historical observation records and static location features

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::LocationKey;

/// One day of observations at a location.
///
/// Sensor fields are `None` when the upstream source had no reading for that
/// day; a missing value is never encoded as a sentinel number. There is at
/// most one record per (location, date).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRecord {
    pub location: LocationKey,
    pub date: NaiveDate,
    pub t_max_c: Option<f64>,
    pub t_min_c: Option<f64>,
    pub precip_mm: Option<f64>,
    pub wind_speed_ms: Option<f64>,
    pub solar_rad_w_m2: Option<f64>,
    pub rh_percent: Option<f64>,
}

/// Immutable geographic reference data for a location.
///
/// Looked up by exact location identity only; there is no interpolation for
/// unknown locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationStaticFeatures {
    pub location: LocationKey,
    pub elevation_m: i32,
    pub dist_to_coast_km: i32,
}
