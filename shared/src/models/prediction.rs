//! Prediction API request and response types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Incoming prediction request. All fields are required.
///
/// Coordinates travel as JSON numbers in both directions; the float serde
/// helper keeps the echoed request in the same wire shape the client sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Latitude in degrees, -90 to 90.
    #[serde(with = "rust_decimal::serde::float")]
    pub latitude: Decimal,
    /// Longitude in degrees, -180 to 180.
    #[serde(with = "rust_decimal::serde::float")]
    pub longitude: Decimal,
    /// Calendar date, "YYYY-MM-DD".
    pub date: String,
    /// Elevation of the location in meters.
    pub elevation_m: i32,
    /// Distance to the nearest coastline in km.
    pub dist_to_coast_km: i32,
}

/// Probability distribution over one target's full label set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetPrediction {
    pub probabilities: BTreeMap<String, f64>,
    pub most_likely: String,
}

/// Combined response for both prediction targets, keyed by target name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub requested_location: PredictionRequest,
    pub predictions: BTreeMap<String, TargetPrediction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn coordinates_stay_numeric_on_the_wire() {
        let request = PredictionRequest {
            latitude: Decimal::from_str("28.57").unwrap(),
            longitude: Decimal::from_str("-77.32").unwrap(),
            date: "2026-07-04".to_string(),
            elevation_m: 200,
            dist_to_coast_km: 1000,
        };
        let json: serde_json::Value = serde_json::to_value(&request).unwrap();
        assert_eq!(json["latitude"], serde_json::json!(28.57));
        assert_eq!(json["longitude"], serde_json::json!(-77.32));

        let restored: PredictionRequest = serde_json::from_value(json).unwrap();
        assert_eq!(restored.latitude, request.latitude);
        assert_eq!(restored.longitude, request.longitude);
    }
}
