//! Prediction Routes

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use data_validator::PlanetInput;
use inference_engine::{BatchResponse, Prediction};
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

use crate::error::ApiError;
use crate::telemetry;
use crate::AppState;

/// Unwrap a JSON body, counting rejected bodies
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        let error = ApiError::from(rejection);
        telemetry::record_error(error.kind());
        warn!("Request body rejected: {}", error);
        error
    })
}

/// Classify a single candidate
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PlanetInput>, JsonRejection>,
) -> Result<Json<Prediction>, ApiError> {
    let input = body(payload)?;
    let started = Instant::now();

    match state.service.predict(input).await {
        Ok(prediction) => {
            telemetry::record_latency(started.elapsed());
            telemetry::record_prediction(&prediction);
            Ok(Json(prediction))
        }
        Err(e) => {
            telemetry::record_error(e.kind());
            warn!("Prediction rejected: {}", e);
            Err(e.into())
        }
    }
}

/// Classify several candidates; a bad item only fails its own slot
pub async fn batch_predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Vec<PlanetInput>>, JsonRejection>,
) -> Result<Json<BatchResponse>, ApiError> {
    let inputs = body(payload)?;
    let started = Instant::now();
    let count = inputs.len();

    let response = state.service.predict_batch(inputs).await.map_err(|e| {
        telemetry::record_error(e.kind());
        ApiError::from(e)
    })?;

    telemetry::record_latency(started.elapsed());
    let mut failed = 0;
    for item in &response.predictions {
        match item.prediction() {
            Some(prediction) => telemetry::record_prediction(prediction),
            None => failed += 1,
        }
    }
    if failed > 0 {
        warn!("Batch of {}: {} item(s) rejected", count, failed);
    }

    Ok(Json(response))
}
