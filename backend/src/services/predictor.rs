//! Prediction service: the immutable model context and the predict
//! operation.

use std::collections::BTreeMap;
use std::path::Path;

use crate::classifier::GbdtClassifier;
use crate::error::{AppError, AppResult};
use crate::services::{artifacts, features};
use shared::{
    PredictionRequest, PredictionResponse, PrecipitationLabel, TargetPrediction,
    TemperatureLabel, WeatherBins, TARGET_PRECIPITATION, TARGET_TEMPERATURE,
};

/// Outcome of loading one model artifact at startup.
type ModelSlot = Result<GbdtClassifier, String>;

/// Immutable serving context, constructed exactly once before the router
/// starts and shared read-only across concurrent requests.
///
/// A model that failed to load keeps its error message: the service still
/// starts and answers health routes, and the predict route reports the
/// specific failure instead of crashing the process. Re-deployment means a
/// restart, not a hot reload.
pub struct ModelContext {
    pub temperature: ModelSlot,
    pub precipitation: ModelSlot,
    pub bins: Option<WeatherBins>,
}

impl ModelContext {
    /// Load every artifact from the store, keeping per-model failures.
    pub fn load(artifacts_dir: &Path) -> Self {
        let temperature = Self::load_slot(artifacts_dir, TARGET_TEMPERATURE);
        let precipitation = Self::load_slot(artifacts_dir, TARGET_PRECIPITATION);
        let bins = match artifacts::load_bins(artifacts_dir) {
            Ok(bins) => Some(bins),
            Err(e) => {
                tracing::warn!("bin metadata unavailable: {e}");
                None
            }
        };
        Self {
            temperature,
            precipitation,
            bins,
        }
    }

    fn load_slot(dir: &Path, target: &str) -> ModelSlot {
        match artifacts::load_model(dir, target) {
            Ok(model) => {
                tracing::info!(target, classes = model.classes.len(), "model loaded");
                Ok(model)
            }
            Err(e) => {
                tracing::error!(target, "model failed to load: {e}");
                Err(e.to_string())
            }
        }
    }

    pub fn fully_loaded(&self) -> bool {
        self.temperature.is_ok() && self.precipitation.is_ok()
    }

    fn model(&self, target: &str) -> AppResult<&GbdtClassifier> {
        let slot = match target {
            TARGET_TEMPERATURE => &self.temperature,
            _ => &self.precipitation,
        };
        slot.as_ref()
            .map_err(|e| AppError::ModelUnavailable(format!("{target} model not loaded: {e}")))
    }
}

/// Run both classifiers for one request.
///
/// Input validation comes first so a malformed request is reported as the
/// client's mistake even while models are missing.
pub fn predict(context: &ModelContext, request: &PredictionRequest) -> AppResult<PredictionResponse> {
    let date = shared::validate_prediction_request(request)
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;

    let temperature_model = context.model(TARGET_TEMPERATURE)?;
    let precipitation_model = context.model(TARGET_PRECIPITATION)?;

    let vector = features::feature_vector(
        request.latitude,
        request.longitude,
        date,
        request.elevation_m,
        request.dist_to_coast_km,
    );
    let row = vector.as_array();

    let temperature = target_prediction(
        temperature_model,
        &row,
        &TemperatureLabel::ALL.map(|l| l.as_str()),
    )?;
    let precipitation = target_prediction(
        precipitation_model,
        &row,
        &PrecipitationLabel::ALL.map(|l| l.as_str()),
    )?;

    let mut predictions = BTreeMap::new();
    predictions.insert(TARGET_TEMPERATURE.to_string(), temperature);
    predictions.insert(TARGET_PRECIPITATION.to_string(), precipitation);

    Ok(PredictionResponse {
        requested_location: request.clone(),
        predictions,
    })
}

/// Probabilities over a target's full label enumeration.
///
/// Labels the trained model never saw get probability zero, so the response
/// always covers exactly the fixed label set; a model class outside the
/// enumeration means corrupt artifacts and is an internal fault.
fn target_prediction(
    model: &GbdtClassifier,
    row: &[f64],
    labels: &[&str],
) -> AppResult<TargetPrediction> {
    let probs = model.predict_proba(row);
    let mut probabilities: BTreeMap<String, f64> =
        labels.iter().map(|l| (l.to_string(), 0.0)).collect();
    let mut most_likely = "";
    let mut best = f64::NEG_INFINITY;
    for (class, p) in model.classes.iter().zip(&probs) {
        match probabilities.get_mut(class.as_str()) {
            Some(slot) => *slot = *p,
            None => {
                return Err(AppError::Internal(anyhow::anyhow!(
                    "model produced class '{class}' outside the label enumeration"
                )))
            }
        }
        if *p > best {
            best = *p;
            most_likely = class;
        }
    }
    Ok(TargetPrediction {
        probabilities,
        most_likely: most_likely.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::TrainParams;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn fit(y: Vec<&str>) -> GbdtClassifier {
        let x: Vec<Vec<f64>> = (0..y.len()).map(|i| vec![i as f64]).collect();
        let params = TrainParams {
            rounds: 5,
            learning_rate: 0.3,
            max_depth: 1,
            min_samples_leaf: 1,
            early_stopping_rounds: 0,
        };
        GbdtClassifier::fit(&x, &y, None, &params).unwrap()
    }

    fn request() -> PredictionRequest {
        PredictionRequest {
            latitude: Decimal::from_str("28.57").unwrap(),
            longitude: Decimal::from_str("77.32").unwrap(),
            date: "2026-07-04".to_string(),
            elevation_m: 200,
            dist_to_coast_km: 1000,
        }
    }

    fn context_with_models() -> ModelContext {
        ModelContext {
            temperature: Ok(fit(vec!["Cold", "Cold", "Hot", "Hot", "Moderate", "Moderate"])),
            precipitation: Ok(fit(vec!["No Rain", "No Rain", "Light Rain", "Light Rain"])),
            bins: None,
        }
    }

    #[test]
    fn response_covers_the_full_enumerations() {
        let response = predict(&context_with_models(), &request()).unwrap();

        let temperature = &response.predictions[shared::TARGET_TEMPERATURE];
        let keys: Vec<&str> = temperature.probabilities.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["Cold", "Hot", "Moderate", "Very Cold", "Very Hot"]);

        let precipitation = &response.predictions[shared::TARGET_PRECIPITATION];
        assert_eq!(precipitation.probabilities.len(), 3);
        // unseen labels carry zero probability
        assert_eq!(precipitation.probabilities["Heavy Rain"], 0.0);
    }

    #[test]
    fn probabilities_sum_to_one_and_argmax_matches() {
        let response = predict(&context_with_models(), &request()).unwrap();
        for target in response.predictions.values() {
            let sum: f64 = target.probabilities.values().sum();
            assert!((sum - 1.0).abs() < 1e-6);
            let (argmax, _) = target
                .probabilities
                .iter()
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
                .unwrap();
            assert_eq!(argmax, &target.most_likely);
        }
    }

    #[test]
    fn invalid_input_wins_over_missing_models() {
        let context = ModelContext {
            temperature: Err("no artifact".to_string()),
            precipitation: Err("no artifact".to_string()),
            bins: None,
        };
        let mut bad = request();
        bad.date = "2026-13-40".to_string();
        let err = predict(&context, &bad).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn missing_model_is_reported_by_target() {
        let context = ModelContext {
            temperature: Err("cannot open temperature_model.json".to_string()),
            precipitation: Ok(fit(vec!["No Rain", "Light Rain"])),
            bins: None,
        };
        let err = predict(&context, &request()).unwrap_err();
        match err {
            AppError::ModelUnavailable(msg) => assert!(msg.contains("temperature")),
            other => panic!("expected ModelUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn unknown_model_class_is_an_internal_fault() {
        let context = ModelContext {
            temperature: Ok(fit(vec!["Scorching", "Scorching", "Cold", "Cold"])),
            precipitation: Ok(fit(vec!["No Rain", "Light Rain"])),
            bins: None,
        };
        let err = predict(&context, &request()).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
