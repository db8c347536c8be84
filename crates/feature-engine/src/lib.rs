//! Feature Engineering Engine
//!
//! Derives the physics feature set used by the transit classifier from the
//! nine raw catalog measurements, and projects it into the column order the
//! model was trained with.

mod features;
mod observation;
mod schema;

pub use features::{EngineeredFeatures, FeatureName, EPSILON, FEATURE_COUNT};
pub use observation::PlanetObservation;
pub use schema::{FeatureSchema, FeatureVector};

use thiserror::Error;

/// Errors raised while resolving a feature schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    #[error("Unknown feature name in model metadata: {0}")]
    UnknownFeature(String),
    #[error("Feature schema is empty")]
    EmptySchema,
}
