//! Raw Transit Observation

use serde::{Deserialize, Serialize};

/// The nine catalog measurements describing a transit candidate.
///
/// Every formula in [`EngineeredFeatures`](crate::EngineeredFeatures) assumes
/// strictly positive, finite values. Callers are expected to run boundary
/// validation (see the `data-validator` crate) before engineering features;
/// for out-of-domain inputs the formulas follow IEEE-754 semantics and may
/// yield NaN or infinity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetObservation {
    /// Orbital period (days)
    pub period: f64,
    /// Transit duration (hours)
    pub duration: f64,
    /// Transit depth (ppm)
    pub depth: f64,
    /// Planet radius (Earth radii)
    pub prad: f64,
    /// Equilibrium temperature (K)
    pub teq: f64,
    /// Insolation flux (Earth flux)
    pub insol: f64,
    /// Stellar effective temperature (K)
    pub steff: f64,
    /// Stellar surface gravity (log10 cm/s^2)
    pub slogg: f64,
    /// Stellar radius (solar radii)
    pub srad: f64,
}
