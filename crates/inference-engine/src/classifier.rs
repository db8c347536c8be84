//! Trained Classifiers
//!
//! The serving path only needs a binary label and a two-class probability
//! pair. Two model formats are supported: ONNX graphs exported from the
//! training pipeline (run with tract), and plain logistic models stored as
//! JSON.

use crate::InferenceError;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};
use tract_onnx::pb::ModelProto;
use tract_onnx::prelude::*;

/// Label and class probabilities for one row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierOutput {
    /// Predicted label (true = exoplanet)
    pub label: bool,
    /// `[p_non_exoplanet, p_exoplanet]`
    pub probabilities: [f64; 2],
}

/// A fitted binary classifier over scaled feature rows
pub trait Classifier: Send + Sync {
    /// Short description for logs and model info
    fn describe(&self) -> String;

    /// Number of input columns, when the model declares it
    fn n_features(&self) -> Option<usize>;

    /// Class probabilities `[p_non_exoplanet, p_exoplanet]`
    fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2], InferenceError>;

    /// Binary label; ties go to the negative class
    fn predict(&self, row: &[f64]) -> Result<bool, InferenceError> {
        let [p_non, p_exo] = self.predict_proba(row)?;
        Ok(p_exo > p_non)
    }

    /// Label and probabilities together
    fn classify(&self, row: &[f64]) -> Result<ClassifierOutput, InferenceError> {
        let probabilities = self.predict_proba(row)?;
        Ok(ClassifierOutput {
            label: probabilities[1] > probabilities[0],
            probabilities,
        })
    }
}

/// Serialized classifier format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierFormat {
    /// ONNX graph with a `[1, 2]` probability output
    Onnx,
    /// Logistic model JSON: `{"coefficients": [...], "intercept": b}`
    Linear,
}

impl ClassifierFormat {
    /// Guess the format from a model file name
    pub fn from_file_name(name: &str) -> Option<Self> {
        match Path::new(name).extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("onnx") => Some(ClassifierFormat::Onnx),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(ClassifierFormat::Linear),
            _ => None,
        }
    }

    /// Parse a classifier of this format
    pub fn load(
        &self,
        bytes: &[u8],
        n_features: usize,
    ) -> Result<Box<dyn Classifier>, InferenceError> {
        match self {
            ClassifierFormat::Onnx => Ok(Box::new(OnnxClassifier::from_bytes(bytes, n_features)?)),
            ClassifierFormat::Linear => Ok(Box::new(LinearClassifier::from_slice(bytes)?)),
        }
    }
}

/// Logistic regression: `p_exoplanet = sigmoid(w . x + b)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearClassifier {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    /// Parse a linear model JSON document
    pub fn from_slice(bytes: &[u8]) -> Result<Self, InferenceError> {
        let model: Self = serde_json::from_slice(bytes)
            .map_err(|e| InferenceError::ArtifactLoad(format!("linear model: {e}")))?;
        if model.coefficients.is_empty()
            || !model.intercept.is_finite()
            || model.coefficients.iter().any(|w| !w.is_finite())
        {
            return Err(InferenceError::ArtifactLoad(
                "linear model: coefficients must be non-empty and finite".to_string(),
            ));
        }
        Ok(model)
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Classifier for LinearClassifier {
    fn describe(&self) -> String {
        format!("LinearClassifier({} coefficients)", self.coefficients.len())
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2], InferenceError> {
        if row.len() != self.coefficients.len() {
            return Err(InferenceError::InvalidInputShape {
                expected: self.coefficients.len(),
                actual: row.len(),
            });
        }
        let z = row
            .iter()
            .zip(&self.coefficients)
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + self.intercept;
        let p_exo = sigmoid(z);
        Ok([1.0 - p_exo, p_exo])
    }
}

/// ONNX classifier executed with tract.
///
/// Expects a single `[1, n_features]` float input. The probability output is
/// the `[1, 2]` float tensor; an integer label output is used when present.
/// Exports with a ZipMap probability output are not supported.
pub struct OnnxClassifier {
    plan: TypedRunnableModel<TypedModel>,
    n_features: usize,
}

impl OnnxClassifier {
    /// Decode and optimize a serialized ONNX model
    pub fn from_bytes(bytes: &[u8], n_features: usize) -> Result<Self, InferenceError> {
        info!("Loading ONNX classifier ({} bytes, {} features)", bytes.len(), n_features);

        let proto = tract_onnx::onnx()
            .proto_model_for_read(&mut Cursor::new(bytes))
            .map_err(|e| InferenceError::ArtifactLoad(format!("onnx model: {e}")))?;
        Self::from_proto(&proto, n_features)
    }

    /// Optimize a decoded ONNX model for single-row inference
    pub fn from_proto(proto: &ModelProto, n_features: usize) -> Result<Self, InferenceError> {
        let plan = tract_onnx::onnx()
            .model_for_proto_model(proto)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, n_features]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| InferenceError::ArtifactLoad(format!("onnx model: {e}")))?;

        Ok(Self { plan, n_features })
    }

    fn run(&self, row: &[f64]) -> Result<ClassifierOutput, InferenceError> {
        if row.len() != self.n_features {
            return Err(InferenceError::InvalidInputShape {
                expected: self.n_features,
                actual: row.len(),
            });
        }

        let data: Vec<f32> = row.iter().map(|&x| x as f32).collect();
        let input: Tensor = tract_ndarray::Array2::from_shape_vec((1, self.n_features), data)
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?
            .into();

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let mut label = None;
        let mut probabilities = None;
        for output in outputs.iter() {
            if let Ok(view) = output.to_array_view::<f32>() {
                let values: Vec<f64> = view.iter().map(|&p| p as f64).collect();
                if let &[p_non, p_exo] = values.as_slice() {
                    probabilities = Some([p_non, p_exo]);
                }
            } else if let Ok(view) = output.to_array_view::<f64>() {
                let values: Vec<f64> = view.iter().copied().collect();
                if let &[p_non, p_exo] = values.as_slice() {
                    probabilities = Some([p_non, p_exo]);
                }
            } else if let Ok(view) = output.to_array_view::<i64>() {
                label = view.iter().next().map(|&l| l == 1);
            }
        }

        let probabilities = probabilities.ok_or_else(|| {
            InferenceError::InferenceFailed("model produced no [1, 2] probability output".to_string())
        })?;
        let label = label.unwrap_or(probabilities[1] > probabilities[0]);
        debug!("ONNX output: label={} p={:?}", label, probabilities);

        Ok(ClassifierOutput {
            label,
            probabilities,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn describe(&self) -> String {
        format!("OnnxClassifier({} features)", self.n_features)
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2], InferenceError> {
        self.run(row).map(|output| output.probabilities)
    }

    fn predict(&self, row: &[f64]) -> Result<bool, InferenceError> {
        self.run(row).map(|output| output.label)
    }

    fn classify(&self, row: &[f64]) -> Result<ClassifierOutput, InferenceError> {
        self.run(row)
    }
}
