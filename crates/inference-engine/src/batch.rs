//! Batch Prediction
//!
//! Items are predicted independently: one bad candidate yields an error slot
//! and never aborts its siblings.

use crate::engine::{InferenceEngine, Prediction};
use data_validator::PlanetInput;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outcome for one batch slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchItem {
    Prediction(Prediction),
    Error { error: String },
}

impl BatchItem {
    pub fn is_error(&self) -> bool {
        matches!(self, BatchItem::Error { .. })
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        match self {
            BatchItem::Prediction(prediction) => Some(prediction),
            BatchItem::Error { .. } => None,
        }
    }
}

/// Batch response, one slot per input in input order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse {
    pub predictions: Vec<BatchItem>,
    pub total: usize,
}

impl InferenceEngine {
    /// Predict every item, isolating per-item failures
    pub fn predict_batch(&self, inputs: &[PlanetInput]) -> BatchResponse {
        let predictions: Vec<BatchItem> = inputs
            .iter()
            .enumerate()
            .map(|(idx, input)| match self.predict_input(input) {
                Ok(prediction) => BatchItem::Prediction(prediction),
                Err(e) => {
                    debug!("Batch item {} failed: {}", idx, e);
                    BatchItem::Error {
                        error: e.to_string(),
                    }
                }
            })
            .collect();

        BatchResponse {
            total: predictions.len(),
            predictions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{reference_input, sample_engine};

    #[test]
    fn test_invalid_item_does_not_abort_batch() {
        let engine = sample_engine();
        let inputs = vec![
            reference_input(),
            PlanetInput {
                srad: Some(0.0),
                ..reference_input()
            },
            reference_input(),
        ];

        let response = engine.predict_batch(&inputs);
        assert_eq!(response.total, 3);
        assert!(!response.predictions[0].is_error());
        assert!(response.predictions[1].is_error());
        assert!(!response.predictions[2].is_error());
        assert_eq!(
            response.predictions[0].prediction(),
            response.predictions[2].prediction()
        );
    }

    #[test]
    fn test_error_slot_serializes_with_message() {
        let engine = sample_engine();
        let response = engine.predict_batch(&[PlanetInput::default()]);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["total"], 1);
        let message = json["predictions"][0]["error"].as_str().unwrap();
        assert!(message.contains("Missing required field: period"));
    }

    #[test]
    fn test_empty_batch() {
        let response = sample_engine().predict_batch(&[]);
        assert_eq!(response.total, 0);
        assert!(response.predictions.is_empty());
    }
}
