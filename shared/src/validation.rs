//! Input validation for prediction requests

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::PredictionRequest;

/// Validate latitude is within [-90, 90] degrees.
pub fn validate_latitude(latitude: Decimal) -> Result<(), &'static str> {
    if latitude < Decimal::from(-90) || latitude > Decimal::from(90) {
        return Err("latitude must be between -90 and 90 degrees");
    }
    Ok(())
}

/// Validate longitude is within [-180, 180] degrees.
pub fn validate_longitude(longitude: Decimal) -> Result<(), &'static str> {
    if longitude < Decimal::from(-180) || longitude > Decimal::from(180) {
        return Err("longitude must be between -180 and 180 degrees");
    }
    Ok(())
}

/// Parse a "YYYY-MM-DD" calendar date string.
pub fn parse_date(date: &str) -> Result<NaiveDate, &'static str> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| "date must be a valid calendar date in YYYY-MM-DD format")
}

/// Validate a full prediction request, returning the parsed date.
pub fn validate_prediction_request(request: &PredictionRequest) -> Result<NaiveDate, &'static str> {
    validate_latitude(request.latitude)?;
    validate_longitude(request.longitude)?;
    parse_date(&request.date)
}
