//! Feature engineering shared verbatim by training and serving.

use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::f64::consts::PI;

use shared::FeatureVector;

/// Normalization constant for the cyclical day-of-year encoding.
///
/// Always 366, leap year or not, so the encoding never depends on calendar
/// length and a given date maps to the same point every year.
const CYCLE_DAYS: f64 = 366.0;

/// Encode one (location, date, geo) query as a model input row.
///
/// Pure function with no I/O or hidden state. The training batch path and
/// the single-request serving path both call exactly this; any divergence
/// between the two silently breaks the trained models. Coordinates are
/// assumed already validated to their legal ranges.
pub fn feature_vector(
    latitude: Decimal,
    longitude: Decimal,
    date: NaiveDate,
    elevation_m: i32,
    dist_to_coast_km: i32,
) -> FeatureVector {
    // 1-based ordinal day within the calendar year
    let day_of_year = date.ordinal() as f64;
    let angle = 2.0 * PI * day_of_year / CYCLE_DAYS;
    FeatureVector {
        latitude: latitude.to_f64().unwrap_or_default(),
        longitude: longitude.to_f64().unwrap_or_default(),
        year: date.year() as f64,
        day_of_year_sin: angle.sin(),
        day_of_year_cos: angle.cos(),
        elevation_m: elevation_m as f64,
        dist_to_coast_km: dist_to_coast_km as f64,
    }
}
