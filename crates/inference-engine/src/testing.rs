//! Shared fixtures for unit tests

use crate::artifacts::ArtifactSet;
use crate::classifier::{Classifier, LinearClassifier};
use crate::engine::InferenceEngine;
use crate::metadata::ModelMetadata;
use crate::scaler::Scaler;
use crate::InferenceError;
use data_validator::PlanetInput;
use feature_engine::PlanetObservation;
use std::path::Path;

pub const METADATA_JSON: &str = r#"{
    "model_type": "StackingClassifier",
    "feature_names": ["log_period", "prad", "stellar_density", "transit_depth_ratio", "period"],
    "metrics": {"accuracy": 0.9234, "f1_score": 0.9187, "roc_auc": 0.9712, "precision": 0.91},
    "training_date": "2025-10-04T12:30:00",
    "notes": "fixture"
}"#;

pub const SCALER_JSON: &str = r#"{
    "kind": "robust",
    "center": [0.5, 2.0, 30000.0, 100.0, 5.0],
    "scale": [0.5, 2.0, 20000.0, 100.0, 10.0]
}"#;

pub const LINEAR_JSON: &str = r#"{"coefficients": [0.8, -0.5, 0.3, 0.6, -0.2], "intercept": 0.1}"#;

pub fn reference_observation() -> PlanetObservation {
    PlanetObservation {
        period: 3.52,
        duration: 2.8,
        depth: 615.0,
        prad: 2.26,
        teq: 1540.0,
        insol: 340.0,
        steff: 5455.0,
        slogg: 4.467,
        srad: 0.927,
    }
}

pub fn reference_input() -> PlanetInput {
    PlanetInput::from(reference_observation())
}

pub fn sample_artifacts() -> ArtifactSet {
    ArtifactSet {
        classifier: Box::new(LinearClassifier::from_slice(LINEAR_JSON.as_bytes()).unwrap()),
        scaler: Scaler::from_slice(SCALER_JSON.as_bytes()).unwrap(),
        metadata: ModelMetadata::from_slice(METADATA_JSON.as_bytes()).unwrap(),
    }
}

pub fn sample_engine() -> InferenceEngine {
    InferenceEngine::new(sample_artifacts()).unwrap()
}

/// Write the linear fixture artifacts into `dir`
pub fn write_linear_artifacts(dir: &Path) {
    std::fs::write(dir.join("model.json"), LINEAR_JSON).unwrap();
    std::fs::write(dir.join("scaler.json"), SCALER_JSON).unwrap();
    std::fs::write(dir.join("metadata.json"), METADATA_JSON).unwrap();
}

/// Classifier returning a constant probability
pub struct FixedClassifier {
    p_exo: f64,
    n_features: usize,
}

impl FixedClassifier {
    pub fn new(p_exo: f64, n_features: usize) -> Self {
        Self { p_exo, n_features }
    }
}

impl Classifier for FixedClassifier {
    fn describe(&self) -> String {
        format!("FixedClassifier({})", self.p_exo)
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn predict_proba(&self, _row: &[f64]) -> Result<[f64; 2], InferenceError> {
        Ok([1.0 - self.p_exo, self.p_exo])
    }
}
