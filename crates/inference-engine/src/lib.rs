//! Exoplanet Inference Engine
//!
//! Loads the trained classifier, its fitted scaler and the training metadata
//! once, then serves read-only predictions over them.

mod artifacts;
mod batch;
mod classification;
mod classifier;
mod engine;
mod metadata;
mod scaler;
mod service;
mod source;

#[cfg(test)]
pub(crate) mod testing;

pub use artifacts::{ArtifactBytes, ArtifactSet};
pub use batch::{BatchItem, BatchResponse};
pub use classification::Classification;
pub use classifier::{Classifier, ClassifierFormat, ClassifierOutput, LinearClassifier, OnnxClassifier};
pub use engine::{InferenceEngine, Prediction};
pub use metadata::{ModelInfo, ModelMetadata, ModelMetrics};
pub use scaler::{Scaler, ScalerKind};
pub use service::{InferenceService, ServiceStatus};
pub use source::{ArtifactFiles, ArtifactLocation, ArtifactSource, DEFAULT_HUB_ENDPOINT};

use data_validator::ValidationError;
use feature_engine::FeatureError;
use thiserror::Error;

/// Errors during artifact loading and inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Artifact load failed: {0}")]
    ArtifactLoad(String),
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("Feature mismatch: {0}")]
    FeatureMismatch(#[from] FeatureError),
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: usize, actual: usize },
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
}

impl InferenceError {
    /// Short machine-readable kind, used as a metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            InferenceError::ArtifactLoad(_) => "artifact_load",
            InferenceError::ServiceUnavailable(_) => "service_unavailable",
            InferenceError::FeatureMismatch(_) => "feature_mismatch",
            InferenceError::InvalidInput(_) => "invalid_input",
            InferenceError::InvalidInputShape { .. } => "invalid_input_shape",
            InferenceError::InferenceFailed(_) => "inference_failed",
        }
    }
}
