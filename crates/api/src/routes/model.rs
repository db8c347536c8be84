//! Service Status Routes

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use inference_engine::{ModelInfo, ServiceStatus};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;

/// Banner for `GET /`
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub status: String,
    pub version: String,
    pub model_loaded: bool,
    /// Training accuracy as a percentage, or "N/A"
    pub accuracy: String,
}

/// Health report
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub state: ServiceStatus,
    pub uptime_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<BTreeMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

pub async fn root(State(state): State<Arc<AppState>>) -> Json<RootResponse> {
    let engine = state.service.engine().await.ok();

    Json(RootResponse {
        message: format!("ExoHunt Inference API v{}", state.version),
        status: "operational".to_string(),
        version: state.version.clone(),
        model_loaded: engine.is_some(),
        accuracy: engine
            .map(|engine| format!("{:.2}%", engine.metrics().accuracy * 100.0))
            .unwrap_or_else(|| "N/A".to_string()),
    })
}

/// 200 when the model is ready, 503 otherwise
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uptime_seconds = state.start_time.elapsed().as_secs();

    match state.service.engine().await {
        Ok(engine) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                state: ServiceStatus::Ready,
                uptime_seconds,
                model: Some(engine.metadata().model_type.clone()),
                metrics: Some(engine.metadata().metrics.clone()),
                reason: None,
            }),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unavailable".to_string(),
                state: state.service.status().await,
                uptime_seconds,
                model: None,
                metrics: None,
                reason: Some(state.service.failure().await.unwrap_or_else(|| e.to_string())),
            }),
        ),
    }
}

pub async fn model_info(State(state): State<Arc<AppState>>) -> Result<Json<ModelInfo>, ApiError> {
    Ok(Json(state.service.model_info().await?))
}
