//! Inference Service Lifecycle
//!
//! `Unloaded -> Loading -> Ready | Failed`. Only the loader writes the state;
//! request paths clone the ready engine and drop the lock immediately.

use crate::artifacts::ArtifactSet;
use crate::batch::BatchResponse;
use crate::engine::{InferenceEngine, Prediction};
use crate::metadata::ModelInfo;
use crate::source::ArtifactLocation;
use crate::InferenceError;
use data_validator::PlanetInput;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Lifecycle state without payload, for health reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Unloaded,
    Loading,
    Ready,
    Failed,
}

enum ServiceState {
    Unloaded,
    Loading,
    Ready(Arc<InferenceEngine>),
    Failed(String),
}

/// Shared prediction service injected into request handlers
pub struct InferenceService {
    state: RwLock<ServiceState>,
}

impl Default for InferenceService {
    fn default() -> Self {
        Self::new()
    }
}

impl InferenceService {
    /// Create a service with no artifacts loaded
    pub fn new() -> Self {
        Self {
            state: RwLock::new(ServiceState::Unloaded),
        }
    }

    /// Create a service around an already-built engine
    pub fn ready(engine: InferenceEngine) -> Self {
        Self {
            state: RwLock::new(ServiceState::Ready(Arc::new(engine))),
        }
    }

    /// Current lifecycle status
    pub async fn status(&self) -> ServiceStatus {
        match &*self.state.read().await {
            ServiceState::Unloaded => ServiceStatus::Unloaded,
            ServiceState::Loading => ServiceStatus::Loading,
            ServiceState::Ready(_) => ServiceStatus::Ready,
            ServiceState::Failed(_) => ServiceStatus::Failed,
        }
    }

    /// Load failure reason, if the last load failed
    pub async fn failure(&self) -> Option<String> {
        match &*self.state.read().await {
            ServiceState::Failed(reason) => Some(reason.clone()),
            _ => None,
        }
    }

    /// Load artifacts and move to `Ready`, or to `Failed` on any error.
    ///
    /// The error is logged and returned; the service itself stays usable and
    /// answers predictions with `ServiceUnavailable`.
    pub async fn load(&self, location: &ArtifactLocation) -> Result<(), InferenceError> {
        *self.state.write().await = ServiceState::Loading;

        let result = ArtifactSet::load(location)
            .await
            .and_then(InferenceEngine::new);

        match result {
            Ok(engine) => {
                info!("Model loaded: {}", engine.describe());
                *self.state.write().await = ServiceState::Ready(Arc::new(engine));
                Ok(())
            }
            Err(e) => {
                error!("Failed to load model: {}", e);
                *self.state.write().await = ServiceState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// The ready engine, or `ServiceUnavailable`
    pub async fn engine(&self) -> Result<Arc<InferenceEngine>, InferenceError> {
        match &*self.state.read().await {
            ServiceState::Ready(engine) => Ok(Arc::clone(engine)),
            ServiceState::Unloaded => Err(InferenceError::ServiceUnavailable(
                "Model not loaded".to_string(),
            )),
            ServiceState::Loading => Err(InferenceError::ServiceUnavailable(
                "Model is loading".to_string(),
            )),
            ServiceState::Failed(_) => Err(InferenceError::ServiceUnavailable(
                "Model failed to load".to_string(),
            )),
        }
    }

    /// Predict a single candidate on the blocking pool
    pub async fn predict(&self, input: PlanetInput) -> Result<Prediction, InferenceError> {
        let engine = self.engine().await?;
        tokio::task::spawn_blocking(move || engine.predict_input(&input))
            .await
            .map_err(|e| InferenceError::InferenceFailed(format!("inference task failed: {e}")))?
    }

    /// Predict a batch; only an unavailable service fails the whole call
    pub async fn predict_batch(
        &self,
        inputs: Vec<PlanetInput>,
    ) -> Result<BatchResponse, InferenceError> {
        let engine = self.engine().await?;
        tokio::task::spawn_blocking(move || engine.predict_batch(&inputs))
            .await
            .map_err(|e| InferenceError::InferenceFailed(format!("inference task failed: {e}")))
    }

    /// Metadata summary of the loaded model
    pub async fn model_info(&self) -> Result<ModelInfo, InferenceError> {
        Ok(self.engine().await?.model_info())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ArtifactFiles, ArtifactSource};
    use crate::testing::{reference_input, sample_engine, write_linear_artifacts};

    fn linear_location(dir: &std::path::Path) -> ArtifactLocation {
        ArtifactLocation {
            source: ArtifactSource::local(dir),
            files: ArtifactFiles {
                model: "model.json".to_string(),
                scaler: "scaler.json".to_string(),
                metadata: "metadata.json".to_string(),
            },
            format: None,
        }
    }

    #[tokio::test]
    async fn test_unloaded_service_is_unavailable() {
        let service = InferenceService::new();
        assert_eq!(service.status().await, ServiceStatus::Unloaded);
        assert!(matches!(
            service.predict(reference_input()).await,
            Err(InferenceError::ServiceUnavailable(_))
        ));
        assert!(matches!(
            service.predict_batch(vec![reference_input()]).await,
            Err(InferenceError::ServiceUnavailable(_))
        ));
        assert!(matches!(
            service.model_info().await,
            Err(InferenceError::ServiceUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_load_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let service = InferenceService::new();

        let result = service.load(&linear_location(dir.path())).await;
        assert!(matches!(result, Err(InferenceError::ArtifactLoad(_))));
        assert_eq!(service.status().await, ServiceStatus::Failed);
        assert!(service.failure().await.is_some());
        assert!(matches!(
            service.predict(reference_input()).await,
            Err(InferenceError::ServiceUnavailable(msg)) if msg == "Model failed to load"
        ));
    }

    #[tokio::test]
    async fn test_load_from_local_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_linear_artifacts(dir.path());
        let service = InferenceService::new();

        service.load(&linear_location(dir.path())).await.unwrap();
        assert_eq!(service.status().await, ServiceStatus::Ready);

        let prediction = service.predict(reference_input()).await.unwrap();
        let direct = sample_engine()
            .predict(&crate::testing::reference_observation())
            .unwrap();
        assert_eq!(prediction, direct);

        let info = service.model_info().await.unwrap();
        assert_eq!(info.model_type, "StackingClassifier");
        assert_eq!(info.features_used, 5);
    }

    #[tokio::test]
    async fn test_feature_mismatch_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        write_linear_artifacts(dir.path());
        std::fs::write(
            dir.path().join("metadata.json"),
            r#"{"feature_names": ["period", "koi_score", "prad", "depth", "teq"],
                "metrics": {"accuracy": 0.9, "f1_score": 0.9, "roc_auc": 0.9}}"#,
        )
        .unwrap();

        let service = InferenceService::new();
        let result = service.load(&linear_location(dir.path())).await;
        assert!(matches!(result, Err(InferenceError::FeatureMismatch(_))));
        assert_eq!(service.status().await, ServiceStatus::Failed);
    }

    #[tokio::test]
    async fn test_batch_with_invalid_middle_item() {
        let service = InferenceService::ready(sample_engine());
        let inputs = vec![
            reference_input(),
            PlanetInput {
                srad: Some(0.0),
                ..reference_input()
            },
            reference_input(),
        ];

        let response = service.predict_batch(inputs).await.unwrap();
        assert_eq!(response.total, 3);
        let errors: Vec<bool> = response.predictions.iter().map(|p| p.is_error()).collect();
        assert_eq!(errors, vec![false, true, false]);
    }

    #[tokio::test]
    async fn test_invalid_single_input() {
        let service = InferenceService::ready(sample_engine());
        let input = PlanetInput {
            depth: Some(-5.0),
            ..reference_input()
        };
        assert!(matches!(
            service.predict(input).await,
            Err(InferenceError::InvalidInput(_))
        ));
    }
}
