//! Feature Vector Assembly
//!
//! Model metadata lists the feature columns in training order. The schema
//! resolves those names once, so per-request projection is a table lookup.

use crate::features::{EngineeredFeatures, FeatureName};
use crate::FeatureError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Resolved column order of a trained model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    columns: Vec<FeatureName>,
}

impl FeatureSchema {
    /// Resolve metadata feature names against the formula set.
    ///
    /// Fails on the first name the engine cannot produce. Producible features
    /// missing from `names` are simply not projected.
    pub fn resolve<S: AsRef<str>>(names: &[S]) -> Result<Self, FeatureError> {
        if names.is_empty() {
            return Err(FeatureError::EmptySchema);
        }

        let columns = names
            .iter()
            .map(|name| name.as_ref().parse::<FeatureName>())
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Resolved feature schema with {} columns", columns.len());
        Ok(Self { columns })
    }

    /// Number of columns the model expects
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema has no columns (never true for a resolved schema)
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns in model order
    pub fn columns(&self) -> &[FeatureName] {
        &self.columns
    }

    /// Project engineered features into model column order
    pub fn project(&self, features: &EngineeredFeatures) -> FeatureVector {
        FeatureVector {
            values: self.columns.iter().map(|&name| features.get(name)).collect(),
        }
    }
}

/// Feature vector in model column order, built per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub values: Vec<f64>,
}

impl FeatureVector {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}
