//! Property tests for the feature transform and the bin definition engine.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use auracast_backend::services::binning::{self, DRY_DAY_MM};
use auracast_backend::services::features;
use shared::{DailyRecord, LocationKey, PrecipitationLabel, TemperatureLabel};

fn coordinate(limit: i64) -> impl Strategy<Value = Decimal> {
    // two-decimal coordinates spanning the legal range
    (-limit * 100..=limit * 100).prop_map(|scaled| Decimal::new(scaled, 2))
}

fn calendar_date() -> impl Strategy<Value = NaiveDate> {
    (1990i32..2035, 1u32..=365)
        .prop_map(|(year, ordinal)| NaiveDate::from_yo_opt(year, ordinal).unwrap())
}

proptest! {
    /// Repeated transforms of the same input agree exactly; this is the
    /// same code path training uses, so batch and single-request encodings
    /// cannot drift apart.
    #[test]
    fn feature_transform_is_deterministic(
        lat in coordinate(90),
        lon in coordinate(180),
        date in calendar_date(),
        elevation_m in -400i32..9000,
        dist_to_coast_km in 0i32..5000,
    ) {
        let a = features::feature_vector(lat, lon, date, elevation_m, dist_to_coast_km);
        let b = features::feature_vector(lat, lon, date, elevation_m, dist_to_coast_km);
        prop_assert_eq!(a.as_array(), b.as_array());
    }

    #[test]
    fn cyclical_encoding_is_normalized(date in calendar_date()) {
        let v = features::feature_vector(
            Decimal::ZERO,
            Decimal::ZERO,
            date,
            0,
            0,
        );
        let norm = v.day_of_year_sin * v.day_of_year_sin
            + v.day_of_year_cos * v.day_of_year_cos;
        prop_assert!((norm - 1.0).abs() < 1e-9);
    }

    /// Every historical record receives exactly one label per target and
    /// the persisted thresholds never cross.
    #[test]
    fn binning_labels_every_record_with_monotonic_thresholds(
        values in prop::collection::vec((-50.0f64..50.0, 0.0f64..40.0), 1..200),
    ) {
        let location = LocationKey::new(Decimal::new(2857, 2), Decimal::new(7732, 2));
        let records: Vec<DailyRecord> = values
            .iter()
            .enumerate()
            .map(|(i, (t_max, precip))| DailyRecord {
                location,
                date: NaiveDate::from_yo_opt(2000 + (i / 365) as i32, (i % 365) as u32 + 1).unwrap(),
                t_max_c: Some(*t_max),
                t_min_c: None,
                precip_mm: Some(*precip),
                wind_speed_ms: None,
                solar_rad_w_m2: None,
                rh_percent: None,
            })
            .collect();

        let (labeled, bins) = binning::assign_bins(&records);
        prop_assert_eq!(labeled.len(), records.len());
        for l in &labeled {
            prop_assert!(TemperatureLabel::ALL.contains(&l.temperature));
            prop_assert!(PrecipitationLabel::ALL.contains(&l.precipitation));
        }
        for thresholds in bins.temperature.values() {
            prop_assert!(thresholds.is_monotonic());
        }
        for thresholds in bins.precipitation.values() {
            prop_assert!(thresholds.light_rain_thresh >= DRY_DAY_MM);
        }
    }
}
