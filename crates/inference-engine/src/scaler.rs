//! Fitted Feature Scaler

use crate::InferenceError;
use serde::{Deserialize, Serialize};

/// Scaling strategy the scaler was fitted with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalerKind {
    /// Z-score: center = mean, scale = standard deviation
    Standard,
    /// Median / IQR, robust to outliers
    Robust,
    /// center = min, scale = max - min
    MinMax,
    /// center = 0, scale = max |x|
    MaxAbs,
    /// No scaling
    Identity,
}

/// Fitted per-column affine transform: `(x - center) / scale`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    pub kind: ScalerKind,
    #[serde(default)]
    pub center: Vec<f64>,
    #[serde(default)]
    pub scale: Vec<f64>,
}

impl Scaler {
    /// Identity scaler, used when a model was trained on raw features
    pub fn identity() -> Self {
        Self {
            kind: ScalerKind::Identity,
            center: Vec::new(),
            scale: Vec::new(),
        }
    }

    /// Parse a scaler JSON document
    pub fn from_slice(bytes: &[u8]) -> Result<Self, InferenceError> {
        serde_json::from_slice(bytes)
            .map_err(|e| InferenceError::ArtifactLoad(format!("scaler: {e}")))
    }

    /// Check the fitted parameters against the model's column count
    pub fn validate(&self, n_features: usize) -> Result<(), InferenceError> {
        if self.kind == ScalerKind::Identity {
            return Ok(());
        }
        if self.center.len() != n_features || self.scale.len() != n_features {
            return Err(InferenceError::ArtifactLoad(format!(
                "scaler: fitted on {}/{} columns, metadata lists {}",
                self.center.len(),
                self.scale.len(),
                n_features
            )));
        }
        if self
            .center
            .iter()
            .chain(self.scale.iter())
            .any(|v| !v.is_finite())
        {
            return Err(InferenceError::ArtifactLoad(
                "scaler: non-finite parameter".to_string(),
            ));
        }
        Ok(())
    }

    /// Scale one row of features
    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
        if self.kind == ScalerKind::Identity {
            return Ok(row.to_vec());
        }
        if row.len() != self.center.len() {
            return Err(InferenceError::InvalidInputShape {
                expected: self.center.len(),
                actual: row.len(),
            });
        }

        Ok(row
            .iter()
            .zip(self.center.iter().zip(self.scale.iter()))
            .map(|(&x, (&center, &scale))| {
                // Constant columns are fitted with zero scale
                let scale = if scale == 0.0 { 1.0 } else { scale };
                (x - center) / scale
            })
            .collect())
    }
}
