//! Prediction endpoint handler

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::predictor;
use crate::AppState;

use shared::{PredictionRequest, PredictionResponse};

/// Combined temperature and precipitation climatology for a location/date.
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictionRequest>,
) -> AppResult<Json<PredictionResponse>> {
    tracing::debug!(?request, "prediction requested");
    let response = predictor::predict(&state.context, &request)?;
    Ok(Json(response))
}
