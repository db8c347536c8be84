//! Request Payload

use serde::{Deserialize, Serialize};

/// Candidate measurements as received over the wire.
///
/// Fields are optional so a missing value is reported per item rather than
/// rejecting a whole batch at deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanetInput {
    /// Orbital period (days)
    pub period: Option<f64>,
    /// Transit duration (hours)
    pub duration: Option<f64>,
    /// Transit depth (ppm)
    pub depth: Option<f64>,
    /// Planet radius (Earth radii)
    pub prad: Option<f64>,
    /// Equilibrium temperature (K)
    pub teq: Option<f64>,
    /// Insolation flux (Earth flux)
    pub insol: Option<f64>,
    /// Stellar temperature (K)
    pub steff: Option<f64>,
    /// Stellar surface gravity
    pub slogg: Option<f64>,
    /// Stellar radius (Solar radii)
    pub srad: Option<f64>,
}

impl From<feature_engine::PlanetObservation> for PlanetInput {
    fn from(obs: feature_engine::PlanetObservation) -> Self {
        Self {
            period: Some(obs.period),
            duration: Some(obs.duration),
            depth: Some(obs.depth),
            prad: Some(obs.prad),
            teq: Some(obs.teq),
            insol: Some(obs.insol),
            steff: Some(obs.steff),
            slogg: Some(obs.slogg),
            srad: Some(obs.srad),
        }
    }
}
