//! Model input features

use serde::{Deserialize, Serialize};

/// Fixed-order numeric encoding of a (location, date, geo) query.
///
/// Field order and the cyclical day-of-year encoding are part of the model
/// contract: training and serving must produce identical vectors for the
/// same input, or the trained models silently misread their inputs. The
/// cyclical encoding always normalizes by 366, leap year or not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub latitude: f64,
    pub longitude: f64,
    pub year: f64,
    pub day_of_year_sin: f64,
    pub day_of_year_cos: f64,
    pub elevation_m: f64,
    pub dist_to_coast_km: f64,
}

impl FeatureVector {
    /// Feature names in contract order.
    pub const NAMES: [&'static str; 7] = [
        "latitude",
        "longitude",
        "year",
        "day_of_year_sin",
        "day_of_year_cos",
        "elevation_m",
        "dist_to_coast_km",
    ];

    /// The row the classifiers consume. Array order is the contract.
    pub fn as_array(&self) -> [f64; 7] {
        [
            self.latitude,
            self.longitude,
            self.year,
            self.day_of_year_sin,
            self.day_of_year_cos,
            self.elevation_m,
            self.dist_to_coast_km,
        ]
    }
}
