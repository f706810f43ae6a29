//! Bin definition engine: per-location percentile thresholds and labels.
//!
//! Records are grouped strictly by location identity; no proximity
//! clustering and no cross-location sharing of thresholds, since each
//! location's climate is assumed distinct.

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use shared::{
    DailyRecord, LocationKey, PrecipitationLabel, PrecipitationThresholds, TemperatureLabel,
    TemperatureThresholds, WeatherBins,
};

/// Days with precipitation at or below this are treated as dry (mm).
pub const DRY_DAY_MM: f64 = 0.1;

/// Wet-day cutoff used when a location has no wet days at all (mm).
pub const DEFAULT_LIGHT_RAIN_THRESH: f64 = 1.0;

/// Below this many records, per-location percentiles are statistically
/// shaky; such groups are kept but flagged.
pub const MIN_GROUP_RECORDS: usize = 30;

/// A historical record with both categorical labels assigned.
#[derive(Debug, Clone)]
pub struct LabeledRecord {
    pub location: LocationKey,
    pub date: NaiveDate,
    pub temperature: TemperatureLabel,
    pub precipitation: PrecipitationLabel,
}

/// Label every usable record and collect per-location thresholds.
///
/// Records missing either the temperature or the precipitation reading are
/// excluded; a degraded row is local damage, never fatal to the run.
pub fn assign_bins(records: &[DailyRecord]) -> (Vec<LabeledRecord>, WeatherBins) {
    let mut groups: BTreeMap<LocationKey, Vec<(NaiveDate, f64, f64)>> = BTreeMap::new();
    let mut skipped = 0usize;
    for record in records {
        match (record.t_max_c, record.precip_mm) {
            (Some(t_max), Some(precip)) => {
                groups
                    .entry(record.location)
                    .or_default()
                    .push((record.date, t_max, precip));
            }
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::warn!(skipped, "records with missing sensor values excluded from labeling");
    }

    let mut bins = WeatherBins::default();
    let mut labeled = Vec::new();
    for (location, rows) in &groups {
        if rows.len() < MIN_GROUP_RECORDS {
            tracing::warn!(
                %location,
                records = rows.len(),
                "fewer than {MIN_GROUP_RECORDS} records; percentiles may be unstable"
            );
        }

        let temperature = temperature_thresholds(rows.iter().map(|r| r.1));
        let precipitation = precipitation_thresholds(rows.iter().map(|r| r.2));

        for &(date, t_max, precip) in rows {
            labeled.push(LabeledRecord {
                location: *location,
                date,
                temperature: temperature_label(t_max, &temperature),
                precipitation: precipitation_label(precip, &precipitation),
            });
        }

        bins.temperature.insert(location.to_string(), temperature);
        bins.precipitation.insert(location.to_string(), precipitation);
    }

    (labeled, bins)
}

/// Temperature labeling rule.
///
/// Checks run in a fixed priority order: the cold checks before the hot
/// checks. On a degenerate group whose percentiles collapse to one value,
/// every record still gets exactly one label.
pub fn temperature_label(t_max: f64, thresholds: &TemperatureThresholds) -> TemperatureLabel {
    if t_max <= thresholds.very_cold {
        TemperatureLabel::VeryCold
    } else if t_max <= thresholds.cold {
        TemperatureLabel::Cold
    } else if t_max >= thresholds.very_hot {
        TemperatureLabel::VeryHot
    } else if t_max >= thresholds.hot {
        TemperatureLabel::Hot
    } else {
        TemperatureLabel::Moderate
    }
}

/// Precipitation labeling rule.
pub fn precipitation_label(
    precip: f64,
    thresholds: &PrecipitationThresholds,
) -> PrecipitationLabel {
    if precip < DRY_DAY_MM {
        PrecipitationLabel::NoRain
    } else if precip <= thresholds.light_rain_thresh {
        PrecipitationLabel::LightRain
    } else {
        PrecipitationLabel::HeavyRain
    }
}

fn temperature_thresholds(values: impl Iterator<Item = f64>) -> TemperatureThresholds {
    let mut sorted: Vec<f64> = values.collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    TemperatureThresholds {
        very_cold: quantile(&sorted, 0.10),
        cold: quantile(&sorted, 0.25),
        hot: quantile(&sorted, 0.75),
        very_hot: quantile(&sorted, 0.90),
    }
}

fn precipitation_thresholds(values: impl Iterator<Item = f64>) -> PrecipitationThresholds {
    // dry days are a qualitatively distinct population and would skew the
    // quantile, so only wet days participate
    let mut wet: Vec<f64> = values.filter(|&p| p > DRY_DAY_MM).collect();
    let light_rain_thresh = if wet.is_empty() {
        DEFAULT_LIGHT_RAIN_THRESH
    } else {
        wet.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        quantile(&wet, 0.75)
    };
    PrecipitationThresholds { light_rain_thresh }
}

/// Linear-interpolation quantile over pre-sorted values.
///
/// `sorted` must be non-empty.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    sorted[lo] + (pos - lo as f64) * (sorted[hi] - sorted[lo])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn record(lat: i64, day: u32, t_max: f64, precip: f64) -> DailyRecord {
        DailyRecord {
            location: LocationKey::new(Decimal::from(lat), Decimal::from(0)),
            date: NaiveDate::from_yo_opt(2000, day).unwrap(),
            t_max_c: Some(t_max),
            t_min_c: None,
            precip_mm: Some(precip),
            wind_speed_ms: None,
            solar_rad_w_m2: None,
            rh_percent: None,
        }
    }

    #[test]
    fn quantile_interpolates_linearly() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&values, 0.0), 1.0);
        assert_eq!(quantile(&values, 1.0), 4.0);
        assert_eq!(quantile(&values, 0.5), 2.5);
        assert_eq!(quantile(&values, 0.25), 1.75);
    }

    #[test]
    fn every_record_gets_exactly_one_label_each() {
        let records: Vec<DailyRecord> = (1..=100)
            .map(|i| record(10, i, i as f64, (i % 7) as f64))
            .collect();
        let (labeled, _) = assign_bins(&records);
        assert_eq!(labeled.len(), records.len());
    }

    #[test]
    fn thresholds_are_monotonic() {
        let records: Vec<DailyRecord> = (1..=200)
            .map(|i| record(10, i, (i as f64).sin() * 20.0, (i % 11) as f64))
            .collect();
        let (_, bins) = assign_bins(&records);
        for thresholds in bins.temperature.values() {
            assert!(thresholds.is_monotonic());
        }
        for thresholds in bins.precipitation.values() {
            assert!(thresholds.light_rain_thresh >= DRY_DAY_MM);
        }
    }

    #[test]
    fn labeling_respects_the_priority_order() {
        let thresholds = TemperatureThresholds {
            very_cold: 5.0,
            cold: 10.0,
            hot: 25.0,
            very_hot: 32.0,
        };
        assert_eq!(temperature_label(5.0, &thresholds), TemperatureLabel::VeryCold);
        assert_eq!(temperature_label(7.5, &thresholds), TemperatureLabel::Cold);
        assert_eq!(temperature_label(18.0, &thresholds), TemperatureLabel::Moderate);
        assert_eq!(temperature_label(25.0, &thresholds), TemperatureLabel::Hot);
        assert_eq!(temperature_label(35.0, &thresholds), TemperatureLabel::VeryHot);
    }

    #[test]
    fn degenerate_group_still_labels_every_record() {
        // all percentiles collapse onto the single observed value
        let records: Vec<DailyRecord> = (1..=50).map(|i| record(10, i, 20.0, 0.0)).collect();
        let (labeled, bins) = assign_bins(&records);
        assert_eq!(labeled.len(), 50);
        for l in &labeled {
            // value <= collapsed very_cold threshold wins by priority order
            assert_eq!(l.temperature, TemperatureLabel::VeryCold);
            assert_eq!(l.precipitation, PrecipitationLabel::NoRain);
        }
        assert!(bins.temperature["10_0"].is_monotonic());
    }

    #[test]
    fn no_wet_days_defaults_the_cutoff() {
        let records: Vec<DailyRecord> = (1..=60).map(|i| record(10, i, 20.0, 0.05)).collect();
        let (_, bins) = assign_bins(&records);
        assert_eq!(
            bins.precipitation["10_0"].light_rain_thresh,
            DEFAULT_LIGHT_RAIN_THRESH
        );
    }

    #[test]
    fn precipitation_boundaries() {
        let thresholds = PrecipitationThresholds {
            light_rain_thresh: 4.0,
        };
        assert_eq!(precipitation_label(0.0, &thresholds), PrecipitationLabel::NoRain);
        assert_eq!(precipitation_label(0.1, &thresholds), PrecipitationLabel::LightRain);
        assert_eq!(precipitation_label(4.0, &thresholds), PrecipitationLabel::LightRain);
        assert_eq!(precipitation_label(4.1, &thresholds), PrecipitationLabel::HeavyRain);
    }

    #[test]
    fn records_missing_sensors_are_skipped_not_fatal() {
        let mut records: Vec<DailyRecord> = (1..=40).map(|i| record(10, i, 20.0 + i as f64, 1.0)).collect();
        records[0].t_max_c = None;
        records[1].precip_mm = None;
        let (labeled, _) = assign_bins(&records);
        assert_eq!(labeled.len(), 38);
    }

    #[test]
    fn groups_are_strictly_per_location() {
        let mut records = Vec::new();
        for i in 1..=50 {
            records.push(record(10, i, i as f64, 0.0));
            records.push(record(20, i, i as f64 + 100.0, 0.0));
        }
        let (_, bins) = assign_bins(&records);
        let cold_site = bins.temperature["10_0"];
        let hot_site = bins.temperature["20_0"];
        assert!(hot_site.very_cold > cold_site.very_hot);
    }
}
