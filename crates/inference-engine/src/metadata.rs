//! Training Metadata

use crate::InferenceError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata document written next to the model at training time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Estimator type, e.g. `StackingClassifier`
    #[serde(default = "default_model_type")]
    pub model_type: String,
    /// Feature columns in training order
    pub feature_names: Vec<String>,
    /// Evaluation metrics keyed by name
    pub metrics: BTreeMap<String, f64>,
    /// ISO-8601 training timestamp
    #[serde(default)]
    pub training_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_model_type() -> String {
    "unknown".to_string()
}

impl ModelMetadata {
    /// Parse a metadata JSON document
    pub fn from_slice(bytes: &[u8]) -> Result<Self, InferenceError> {
        serde_json::from_slice(bytes)
            .map_err(|e| InferenceError::ArtifactLoad(format!("metadata: {e}")))
    }

    fn metric(&self, name: &str) -> Result<f64, InferenceError> {
        self.metrics
            .get(name)
            .copied()
            .ok_or_else(|| InferenceError::ArtifactLoad(format!("metadata: missing metric '{name}'")))
    }

    /// The headline metrics reported with every prediction
    pub fn headline_metrics(&self) -> Result<ModelMetrics, InferenceError> {
        Ok(ModelMetrics {
            accuracy: self.metric("accuracy")?,
            f1_score: self.metric("f1_score")?,
            roc_auc: self.metric("roc_auc")?,
        })
    }
}

/// Training-time metrics echoed in prediction responses
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub accuracy: f64,
    pub f1_score: f64,
    pub roc_auc: f64,
}

/// Summary returned by the model-info endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub features_used: usize,
    pub feature_names: Vec<String>,
    pub training_date: Option<String>,
    pub metrics: BTreeMap<String, f64>,
    pub notes: Option<String>,
}

impl From<&ModelMetadata> for ModelInfo {
    fn from(metadata: &ModelMetadata) -> Self {
        Self {
            model_type: metadata.model_type.clone(),
            features_used: metadata.feature_names.len(),
            feature_names: metadata.feature_names.clone(),
            training_date: metadata.training_date.clone(),
            metrics: metadata.metrics.clone(),
            notes: metadata.notes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "model_type": "StackingClassifier",
        "feature_names": ["period", "prad", "log_depth"],
        "metrics": {
            "accuracy": 0.9234,
            "precision": 0.91,
            "recall": 0.93,
            "f1_score": 0.9187,
            "roc_auc": 0.9712,
            "cv_mean": 0.915,
            "cv_std": 0.012
        },
        "training_date": "2025-10-04T12:30:00.123456",
        "notes": "Advanced model with SMOTE, feature engineering, and stacking"
    }"#;

    #[test]
    fn test_parse_training_document() {
        let metadata = ModelMetadata::from_slice(DOCUMENT.as_bytes()).unwrap();
        assert_eq!(metadata.model_type, "StackingClassifier");
        assert_eq!(metadata.feature_names, vec!["period", "prad", "log_depth"]);

        let headline = metadata.headline_metrics().unwrap();
        assert_eq!(headline.accuracy, 0.9234);
        assert_eq!(headline.f1_score, 0.9187);
        assert_eq!(headline.roc_auc, 0.9712);
    }

    #[test]
    fn test_missing_headline_metric() {
        let metadata = ModelMetadata::from_slice(
            br#"{"feature_names": ["period"], "metrics": {"accuracy": 0.9, "f1_score": 0.8}}"#,
        )
        .unwrap();
        assert_eq!(metadata.model_type, "unknown");
        assert!(matches!(
            metadata.headline_metrics(),
            Err(InferenceError::ArtifactLoad(msg)) if msg.contains("roc_auc")
        ));
    }

    #[test]
    fn test_malformed_document() {
        assert!(matches!(
            ModelMetadata::from_slice(b"{not json"),
            Err(InferenceError::ArtifactLoad(_))
        ));
    }

    #[test]
    fn test_model_info_keeps_all_metrics() {
        let metadata = ModelMetadata::from_slice(DOCUMENT.as_bytes()).unwrap();
        let info = ModelInfo::from(&metadata);
        assert_eq!(info.features_used, 3);
        assert_eq!(info.metrics.len(), 7);
        assert_eq!(info.metrics["cv_std"], 0.012);
    }
}
