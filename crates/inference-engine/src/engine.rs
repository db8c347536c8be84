//! Inference Engine Implementation

use crate::artifacts::ArtifactSet;
use crate::classification::Classification;
use crate::metadata::{ModelInfo, ModelMetadata, ModelMetrics};
use crate::InferenceError;
use data_validator::{PlanetInput, Validator};
use feature_engine::{EngineeredFeatures, FeatureSchema, FeatureVector, PlanetObservation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Allowed drift of `p_exo + p_non` from 1
const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Prediction result for one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub is_exoplanet: bool,
    /// `max(probability_exoplanet, probability_non_exoplanet)`
    pub confidence: f64,
    pub probability_exoplanet: f64,
    pub probability_non_exoplanet: f64,
    pub classification: Classification,
    pub model_metrics: ModelMetrics,
}

/// Ready-to-serve model: immutable after construction, shared across requests
pub struct InferenceEngine {
    artifacts: ArtifactSet,
    schema: FeatureSchema,
    metrics: ModelMetrics,
    validator: Validator,
}

impl InferenceEngine {
    /// Check an artifact set for consistency and build the engine.
    ///
    /// Feature names are resolved here, so a metadata/code skew fails the
    /// load instead of the first request.
    pub fn new(artifacts: ArtifactSet) -> Result<Self, InferenceError> {
        let schema = FeatureSchema::resolve(&artifacts.metadata.feature_names)?;
        artifacts.scaler.validate(schema.len())?;
        if let Some(n) = artifacts.classifier.n_features() {
            if n != schema.len() {
                return Err(InferenceError::ArtifactLoad(format!(
                    "classifier expects {} features, metadata lists {}",
                    n,
                    schema.len()
                )));
            }
        }
        let metrics = artifacts.metadata.headline_metrics()?;

        info!(
            "Inference engine ready: {} with {} features (accuracy {:.2}%, F1 {:.2}%)",
            artifacts.classifier.describe(),
            schema.len(),
            metrics.accuracy * 100.0,
            metrics.f1_score * 100.0
        );

        Ok(Self {
            artifacts,
            schema,
            metrics,
            validator: Validator::new(),
        })
    }

    /// Engineer and order features for an observation
    pub fn engineer(&self, obs: &PlanetObservation) -> FeatureVector {
        self.schema.project(&EngineeredFeatures::compute(obs))
    }

    /// Validate a raw payload, then predict
    pub fn predict_input(&self, input: &PlanetInput) -> Result<Prediction, InferenceError> {
        let obs = self.validator.validate(input)?;
        self.predict(&obs)
    }

    /// Run the full pipeline on an observation.
    ///
    /// The observation is re-validated: zero or negative measurements can
    /// still produce finite features (`srad = 0` only hits the epsilon).
    pub fn predict(&self, obs: &PlanetObservation) -> Result<Prediction, InferenceError> {
        let start = std::time::Instant::now();
        self.validator.validate_observation(obs)?;

        let features = self.engineer(obs);
        if let Some((name, _)) = self
            .schema
            .columns()
            .iter()
            .zip(features.as_slice())
            .find(|(_, value)| !value.is_finite())
        {
            return Err(InferenceError::InferenceFailed(format!(
                "feature {name} is not finite"
            )));
        }

        let scaled = self.artifacts.scaler.transform(features.as_slice())?;
        let output = self.artifacts.classifier.classify(&scaled)?;
        let [probability_non_exoplanet, probability_exoplanet] = output.probabilities;
        check_probabilities(probability_non_exoplanet, probability_exoplanet)?;

        let prediction = Prediction {
            is_exoplanet: output.label,
            confidence: probability_exoplanet.max(probability_non_exoplanet),
            probability_exoplanet,
            probability_non_exoplanet,
            classification: Classification::from_probability(probability_exoplanet),
            model_metrics: self.metrics,
        };

        debug!(
            "Prediction: {} (p_exo={:.4}) in {}us",
            prediction.classification,
            probability_exoplanet,
            start.elapsed().as_micros()
        );
        Ok(prediction)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.artifacts.metadata
    }

    pub fn metrics(&self) -> ModelMetrics {
        self.metrics
    }

    /// Summary for the model-info endpoint
    pub fn model_info(&self) -> ModelInfo {
        ModelInfo::from(&self.artifacts.metadata)
    }

    /// Classifier description
    pub fn describe(&self) -> String {
        self.artifacts.classifier.describe()
    }
}

fn check_probabilities(p_non: f64, p_exo: f64) -> Result<(), InferenceError> {
    let in_range = |p: f64| p.is_finite() && (0.0..=1.0).contains(&p);
    if !in_range(p_non) || !in_range(p_exo) {
        return Err(InferenceError::InferenceFailed(format!(
            "classifier returned invalid probabilities [{p_non}, {p_exo}]"
        )));
    }
    if (p_non + p_exo - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(InferenceError::InferenceFailed(format!(
            "class probabilities sum to {}",
            p_non + p_exo
        )));
    }
    Ok(())
}
