//! Derived Feature Formulas

use crate::observation::PlanetObservation;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Number of features the engine can produce (9 base + 21 derived)
pub const FEATURE_COUNT: usize = 30;

/// Stabilizer added to every denominator. Must match the training pipeline.
pub const EPSILON: f64 = 1e-10;

/// Days per year used for the semi-major axis approximation
const DAYS_PER_YEAR: f64 = 365.25;

/// Name of a feature the engine knows how to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureName {
    Period,
    Duration,
    Depth,
    Prad,
    Teq,
    Insol,
    Steff,
    Slogg,
    Srad,
    TransitDepthRatio,
    DurationPeriodRatio,
    StellarDensity,
    StellarLuminosity,
    PlanetDensity,
    EquilibriumTempRatio,
    IrradiationRatio,
    SemiMajorAxis,
    OrbitalVelocity,
    HabitableZoneDistance,
    SurfaceGravity,
    LogPeriod,
    LogInsol,
    LogDepth,
    SqrtPrad,
    PradTeqInteraction,
    PeriodDepthInteraction,
    InsolSteffInteraction,
    PeriodSquared,
    PradSquared,
    DepthSquared,
}

impl FeatureName {
    /// Every producible feature, base measurements first
    pub const ALL: [FeatureName; FEATURE_COUNT] = [
        FeatureName::Period,
        FeatureName::Duration,
        FeatureName::Depth,
        FeatureName::Prad,
        FeatureName::Teq,
        FeatureName::Insol,
        FeatureName::Steff,
        FeatureName::Slogg,
        FeatureName::Srad,
        FeatureName::TransitDepthRatio,
        FeatureName::DurationPeriodRatio,
        FeatureName::StellarDensity,
        FeatureName::StellarLuminosity,
        FeatureName::PlanetDensity,
        FeatureName::EquilibriumTempRatio,
        FeatureName::IrradiationRatio,
        FeatureName::SemiMajorAxis,
        FeatureName::OrbitalVelocity,
        FeatureName::HabitableZoneDistance,
        FeatureName::SurfaceGravity,
        FeatureName::LogPeriod,
        FeatureName::LogInsol,
        FeatureName::LogDepth,
        FeatureName::SqrtPrad,
        FeatureName::PradTeqInteraction,
        FeatureName::PeriodDepthInteraction,
        FeatureName::InsolSteffInteraction,
        FeatureName::PeriodSquared,
        FeatureName::PradSquared,
        FeatureName::DepthSquared,
    ];

    /// Column name as written in model metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureName::Period => "period",
            FeatureName::Duration => "duration",
            FeatureName::Depth => "depth",
            FeatureName::Prad => "prad",
            FeatureName::Teq => "teq",
            FeatureName::Insol => "insol",
            FeatureName::Steff => "steff",
            FeatureName::Slogg => "slogg",
            FeatureName::Srad => "srad",
            FeatureName::TransitDepthRatio => "transit_depth_ratio",
            FeatureName::DurationPeriodRatio => "duration_period_ratio",
            FeatureName::StellarDensity => "stellar_density",
            FeatureName::StellarLuminosity => "stellar_luminosity",
            FeatureName::PlanetDensity => "planet_density",
            FeatureName::EquilibriumTempRatio => "equilibrium_temp_ratio",
            FeatureName::IrradiationRatio => "irradiation_ratio",
            FeatureName::SemiMajorAxis => "semi_major_axis",
            FeatureName::OrbitalVelocity => "orbital_velocity",
            FeatureName::HabitableZoneDistance => "habitable_zone_distance",
            FeatureName::SurfaceGravity => "surface_gravity",
            FeatureName::LogPeriod => "log_period",
            FeatureName::LogInsol => "log_insol",
            FeatureName::LogDepth => "log_depth",
            FeatureName::SqrtPrad => "sqrt_prad",
            FeatureName::PradTeqInteraction => "prad_teq_interaction",
            FeatureName::PeriodDepthInteraction => "period_depth_interaction",
            FeatureName::InsolSteffInteraction => "insol_steff_interaction",
            FeatureName::PeriodSquared => "period_squared",
            FeatureName::PradSquared => "prad_squared",
            FeatureName::DepthSquared => "depth_squared",
        }
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureName {
    type Err = crate::FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| crate::FeatureError::UnknownFeature(s.to_string()))
    }
}

/// The full engineered feature record for one observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineeredFeatures {
    pub period: f64,
    pub duration: f64,
    pub depth: f64,
    pub prad: f64,
    pub teq: f64,
    pub insol: f64,
    pub steff: f64,
    pub slogg: f64,
    pub srad: f64,

    // Physics ratios
    pub transit_depth_ratio: f64,
    pub duration_period_ratio: f64,
    pub stellar_density: f64,
    pub stellar_luminosity: f64,
    pub planet_density: f64,
    pub equilibrium_temp_ratio: f64,
    pub irradiation_ratio: f64,

    // Orbital mechanics
    pub semi_major_axis: f64,
    pub orbital_velocity: f64,

    // Habitability
    pub habitable_zone_distance: f64,
    pub surface_gravity: f64,

    // Transforms
    pub log_period: f64,
    pub log_insol: f64,
    pub log_depth: f64,
    pub sqrt_prad: f64,

    // Interactions
    pub prad_teq_interaction: f64,
    pub period_depth_interaction: f64,
    pub insol_steff_interaction: f64,

    // Polynomials
    pub period_squared: f64,
    pub prad_squared: f64,
    pub depth_squared: f64,
}

impl EngineeredFeatures {
    /// Compute every feature for an observation.
    ///
    /// Powers go through `powf` so results round the same way as the
    /// training pipeline's `**` operator.
    pub fn compute(obs: &PlanetObservation) -> Self {
        let PlanetObservation {
            period,
            duration,
            depth,
            prad,
            teq,
            insol,
            steff,
            slogg,
            srad,
        } = *obs;

        let semi_major_axis = ((period / DAYS_PER_YEAR).powf(2.0) * srad).powf(1.0 / 3.0);

        Self {
            period,
            duration,
            depth,
            prad,
            teq,
            insol,
            steff,
            slogg,
            srad,

            transit_depth_ratio: depth / (prad.powf(2.0) + EPSILON),
            duration_period_ratio: duration / (period + EPSILON),
            stellar_density: 10f64.powf(slogg) / (srad.powf(2.0) + EPSILON),
            stellar_luminosity: srad.powf(2.0) * steff.powf(4.0),
            planet_density: prad.powf(3.0) / (period.powf(2.0) + EPSILON),
            equilibrium_temp_ratio: teq / (steff + EPSILON),
            irradiation_ratio: insol / (teq + EPSILON),

            semi_major_axis,
            orbital_velocity: (2.0 * PI * semi_major_axis) / (period + EPSILON),

            habitable_zone_distance: semi_major_axis / (insol.sqrt() + EPSILON),
            surface_gravity: slogg * prad.powf(2.0),

            log_period: (period + 1.0).log10(),
            log_insol: (insol + 1.0).log10(),
            log_depth: (depth + 1.0).log10(),
            sqrt_prad: prad.sqrt(),

            prad_teq_interaction: prad * teq,
            period_depth_interaction: period * depth,
            insol_steff_interaction: insol * steff,

            period_squared: period.powf(2.0),
            prad_squared: prad.powf(2.0),
            depth_squared: depth.powf(2.0),
        }
    }

    /// Look up a single feature by name
    pub fn get(&self, name: FeatureName) -> f64 {
        match name {
            FeatureName::Period => self.period,
            FeatureName::Duration => self.duration,
            FeatureName::Depth => self.depth,
            FeatureName::Prad => self.prad,
            FeatureName::Teq => self.teq,
            FeatureName::Insol => self.insol,
            FeatureName::Steff => self.steff,
            FeatureName::Slogg => self.slogg,
            FeatureName::Srad => self.srad,
            FeatureName::TransitDepthRatio => self.transit_depth_ratio,
            FeatureName::DurationPeriodRatio => self.duration_period_ratio,
            FeatureName::StellarDensity => self.stellar_density,
            FeatureName::StellarLuminosity => self.stellar_luminosity,
            FeatureName::PlanetDensity => self.planet_density,
            FeatureName::EquilibriumTempRatio => self.equilibrium_temp_ratio,
            FeatureName::IrradiationRatio => self.irradiation_ratio,
            FeatureName::SemiMajorAxis => self.semi_major_axis,
            FeatureName::OrbitalVelocity => self.orbital_velocity,
            FeatureName::HabitableZoneDistance => self.habitable_zone_distance,
            FeatureName::SurfaceGravity => self.surface_gravity,
            FeatureName::LogPeriod => self.log_period,
            FeatureName::LogInsol => self.log_insol,
            FeatureName::LogDepth => self.log_depth,
            FeatureName::SqrtPrad => self.sqrt_prad,
            FeatureName::PradTeqInteraction => self.prad_teq_interaction,
            FeatureName::PeriodDepthInteraction => self.period_depth_interaction,
            FeatureName::InsolSteffInteraction => self.insol_steff_interaction,
            FeatureName::PeriodSquared => self.period_squared,
            FeatureName::PradSquared => self.prad_squared,
            FeatureName::DepthSquared => self.depth_squared,
        }
    }

    /// All features paired with their names, in [`FeatureName::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = (FeatureName, f64)> + '_ {
        FeatureName::ALL.iter().map(move |&name| (name, self.get(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reference_observation() -> PlanetObservation {
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

    #[test]
    fn test_reference_luminosity_and_period_squared() {
        let features = EngineeredFeatures::compute(&reference_observation());

        assert_eq!(features.stellar_luminosity, 0.927f64.powf(2.0) * 5455f64.powf(4.0));
        assert!((features.period_squared - 12.3904).abs() < 1e-12);
    }

    #[test]
    fn test_base_features_pass_through() {
        let obs = reference_observation();
        let features = EngineeredFeatures::compute(&obs);

        assert_eq!(features.period, obs.period);
        assert_eq!(features.duration, obs.duration);
        assert_eq!(features.depth, obs.depth);
        assert_eq!(features.prad, obs.prad);
        assert_eq!(features.teq, obs.teq);
        assert_eq!(features.insol, obs.insol);
        assert_eq!(features.steff, obs.steff);
        assert_eq!(features.slogg, obs.slogg);
        assert_eq!(features.srad, obs.srad);
    }

    #[test]
    fn test_derived_formulas() {
        let obs = reference_observation();
        let f = EngineeredFeatures::compute(&obs);

        assert_eq!(f.transit_depth_ratio, 615.0 / (2.26f64.powf(2.0) + EPSILON));
        assert_eq!(f.duration_period_ratio, 2.8 / (3.52 + EPSILON));
        assert_eq!(f.stellar_density, 10f64.powf(4.467) / (0.927f64.powf(2.0) + EPSILON));
        assert_eq!(f.equilibrium_temp_ratio, 1540.0 / (5455.0 + EPSILON));
        assert_eq!(f.irradiation_ratio, 340.0 / (1540.0 + EPSILON));

        let a = ((3.52f64 / 365.25).powf(2.0) * 0.927).powf(1.0 / 3.0);
        assert_eq!(f.semi_major_axis, a);
        assert_eq!(f.orbital_velocity, 2.0 * PI * a / (3.52 + EPSILON));
        assert_eq!(f.habitable_zone_distance, a / (340f64.sqrt() + EPSILON));
        assert_eq!(f.surface_gravity, 4.467 * 2.26f64.powf(2.0));

        assert_eq!(f.log_period, 4.52f64.log10());
        assert_eq!(f.log_insol, 341f64.log10());
        assert_eq!(f.log_depth, 616f64.log10());
        assert_eq!(f.sqrt_prad, 2.26f64.sqrt());

        assert_eq!(f.prad_teq_interaction, 2.26 * 1540.0);
        assert_eq!(f.period_depth_interaction, 3.52 * 615.0);
        assert_eq!(f.insol_steff_interaction, 340.0 * 5455.0);
        assert_eq!(f.depth_squared, 615.0 * 615.0);
    }

    #[test]
    fn test_epsilon_keeps_tiny_denominators_finite() {
        let obs = PlanetObservation {
            period: 1e-300,
            prad: 1e-300,
            ..reference_observation()
        };
        let f = EngineeredFeatures::compute(&obs);

        // prad^2 underflows to zero, epsilon remains
        assert_eq!(f.transit_depth_ratio, 615.0 / EPSILON);
        assert!(f.duration_period_ratio.is_finite());
        assert!(f.planet_density.is_finite());
    }

    #[test]
    fn test_feature_name_round_trip() {
        for name in FeatureName::ALL {
            assert_eq!(name.as_str().parse::<FeatureName>().unwrap(), name);
        }
        assert!("koi_score".parse::<FeatureName>().is_err());
    }

    #[test]
    fn test_feature_names_unique() {
        let mut names: Vec<&str> = FeatureName::ALL.iter().map(|n| n.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FEATURE_COUNT);
    }

    fn observation_strategy() -> impl Strategy<Value = PlanetObservation> {
        (
            (0.1f64..1000.0, 0.1f64..24.0, 1.0f64..50_000.0),
            (0.1f64..30.0, 100.0f64..3000.0, 0.01f64..10_000.0),
            (2500.0f64..10_000.0, 3.0f64..5.5, 0.1f64..10.0),
        )
            .prop_map(|((period, duration, depth), (prad, teq, insol), (steff, slogg, srad))| {
                PlanetObservation {
                    period,
                    duration,
                    depth,
                    prad,
                    teq,
                    insol,
                    steff,
                    slogg,
                    srad,
                }
            })
    }

    proptest! {
        #[test]
        fn prop_compute_is_deterministic(obs in observation_strategy()) {
            let first = EngineeredFeatures::compute(&obs);
            let second = EngineeredFeatures::compute(&obs);
            for ((_, a), (_, b)) in first.iter().zip(second.iter()) {
                prop_assert_eq!(a.to_bits(), b.to_bits());
            }
        }

        #[test]
        fn prop_positive_inputs_give_finite_features(obs in observation_strategy()) {
            let features = EngineeredFeatures::compute(&obs);
            for (name, value) in features.iter() {
                prop_assert!(value.is_finite(), "{} is not finite", name);
            }
        }
    }
}
