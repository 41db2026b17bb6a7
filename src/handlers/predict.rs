//! Prediction handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::{AppError, AppResult, AppState};
use crate::models::{FeatureVector, PredictRequest, PredictResponse};

/// Run the prediction pipeline on one feature vector
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let Json(req) = payload.map_err(|e| AppError::ValidationError(e.body_text()))?;
    let features = FeatureVector::try_from(req)?;

    // File read and graph execution are blocking
    let pipeline = state.pipeline.clone();
    let prediction = tokio::task::spawn_blocking(move || pipeline.predict(&features)).await??;

    tracing::debug!("Prediction returned {} values", prediction.len());

    Ok(Json(PredictResponse { prediction }))
}
