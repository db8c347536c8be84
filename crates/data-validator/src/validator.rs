//! Observation Validator

use crate::error::ValidationError;
use crate::input::PlanetInput;
use feature_engine::PlanetObservation;
use tracing::debug;

/// Validator for candidate measurements.
///
/// Every field must be present, finite and strictly positive: the feature
/// formulas take reciprocals, roots and logarithms of them.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a single value
    pub fn validate_positive(
        &self,
        field: &'static str,
        value: Option<f64>,
    ) -> Result<f64, ValidationError> {
        let value = value.ok_or(ValidationError::MissingField(field))?;
        if !value.is_finite() {
            return Err(ValidationError::NotFinite { field });
        }
        if value <= 0.0 {
            return Err(ValidationError::NotPositive { field, value });
        }
        Ok(value)
    }

    /// Validate a request payload, returning the first failing field
    pub fn validate(&self, input: &PlanetInput) -> Result<PlanetObservation, ValidationError> {
        let obs = PlanetObservation {
            period: self.validate_positive("period", input.period)?,
            duration: self.validate_positive("duration", input.duration)?,
            depth: self.validate_positive("depth", input.depth)?,
            prad: self.validate_positive("prad", input.prad)?,
            teq: self.validate_positive("teq", input.teq)?,
            insol: self.validate_positive("insol", input.insol)?,
            steff: self.validate_positive("steff", input.steff)?,
            slogg: self.validate_positive("slogg", input.slogg)?,
            srad: self.validate_positive("srad", input.srad)?,
        };
        debug!("Validated observation: period={} prad={}", obs.period, obs.prad);
        Ok(obs)
    }

    /// Re-check an already built observation.
    ///
    /// `PlanetObservation` fields are public, so callers that skip
    /// [`Validator::validate`] still go through the same rules.
    pub fn validate_observation(&self, obs: &PlanetObservation) -> Result<(), ValidationError> {
        for (field, value) in [
            ("period", obs.period),
            ("duration", obs.duration),
            ("depth", obs.depth),
            ("prad", obs.prad),
            ("teq", obs.teq),
            ("insol", obs.insol),
            ("steff", obs.steff),
            ("slogg", obs.slogg),
            ("srad", obs.srad),
        ] {
            self.validate_positive(field, Some(value))?;
        }
        Ok(())
    }
}
