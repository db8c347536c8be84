//! API Error Responses

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use inference_engine::InferenceError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Inference(#[from] InferenceError),
    /// Body is not the expected JSON
    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Inference(e) => match e {
                InferenceError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                InferenceError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
                InferenceError::ArtifactLoad(_)
                | InferenceError::FeatureMismatch(_)
                | InferenceError::InvalidInputShape { .. }
                | InferenceError::InferenceFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            // 422 for wrong-typed fields, 400 for bad syntax, 415 without a JSON content type
            ApiError::Body(rejection) => rejection.status(),
        }
    }

    /// Metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Inference(e) => e.kind(),
            ApiError::Body(_) => "invalid_body",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            tracing::error!(detail = %self, "Prediction failed");
        }

        let body = Json(json!({
            "error": true,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}
