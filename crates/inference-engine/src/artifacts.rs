//! Artifact Set

use crate::classifier::{Classifier, ClassifierFormat};
use crate::metadata::ModelMetadata;
use crate::scaler::Scaler;
use crate::source::ArtifactLocation;
use crate::InferenceError;
use tracing::info;

/// Raw artifact contents as fetched from a source
#[derive(Debug, Clone)]
pub struct ArtifactBytes {
    pub model: Vec<u8>,
    pub scaler: Vec<u8>,
    pub metadata: Vec<u8>,
}

/// Parsed classifier, scaler and metadata
pub struct ArtifactSet {
    pub classifier: Box<dyn Classifier>,
    pub scaler: Scaler,
    pub metadata: ModelMetadata,
}

impl ArtifactSet {
    /// Parse raw artifacts
    pub fn parse(bytes: &ArtifactBytes, format: ClassifierFormat) -> Result<Self, InferenceError> {
        let metadata = ModelMetadata::from_slice(&bytes.metadata)?;
        let scaler = Scaler::from_slice(&bytes.scaler)?;
        let classifier = format.load(&bytes.model, metadata.feature_names.len())?;

        Ok(Self {
            classifier,
            scaler,
            metadata,
        })
    }

    /// Fetch and parse all artifacts of a location
    pub async fn load(location: &ArtifactLocation) -> Result<Self, InferenceError> {
        let format = location.classifier_format()?;
        let files = &location.files;
        info!(
            "Loading artifacts from {} (model={}, scaler={}, metadata={})",
            location.source.describe(),
            files.model,
            files.scaler,
            files.metadata
        );

        let client = reqwest::Client::new();
        let (model, scaler, metadata) = tokio::try_join!(
            location.source.fetch(&client, &files.model),
            location.source.fetch(&client, &files.scaler),
            location.source.fetch(&client, &files.metadata),
        )?;
        let bytes = ArtifactBytes {
            model,
            scaler,
            metadata,
        };

        // ONNX optimization is CPU-bound
        tokio::task::spawn_blocking(move || Self::parse(&bytes, format))
            .await
            .map_err(|e| InferenceError::ArtifactLoad(format!("parse task failed: {e}")))?
    }
}

impl std::fmt::Debug for ArtifactSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactSet")
            .field("classifier", &self.classifier.describe())
            .field("scaler", &self.scaler.kind)
            .field("metadata", &self.metadata.model_type)
            .finish()
    }
}
