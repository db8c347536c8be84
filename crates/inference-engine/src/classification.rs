//! Human-readable classification buckets

use serde::{Deserialize, Serialize};

/// Bucket for the exoplanet probability, lower edges inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "Highly Likely Exoplanet")]
    HighlyLikely,
    #[serde(rename = "Probable Exoplanet")]
    Probable,
    #[serde(rename = "Possible Exoplanet")]
    Possible,
    #[serde(rename = "Unlikely Exoplanet")]
    Unlikely,
    #[serde(rename = "Not an Exoplanet")]
    NotExoplanet,
}

impl Classification {
    /// Bucket an exoplanet probability
    pub fn from_probability(probability_exoplanet: f64) -> Self {
        if probability_exoplanet >= 0.9 {
            Classification::HighlyLikely
        } else if probability_exoplanet >= 0.7 {
            Classification::Probable
        } else if probability_exoplanet >= 0.5 {
            Classification::Possible
        } else if probability_exoplanet >= 0.3 {
            Classification::Unlikely
        } else {
            Classification::NotExoplanet
        }
    }

    /// Display label
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::HighlyLikely => "Highly Likely Exoplanet",
            Classification::Probable => "Probable Exoplanet",
            Classification::Possible => "Possible Exoplanet",
            Classification::Unlikely => "Unlikely Exoplanet",
            Classification::NotExoplanet => "Not an Exoplanet",
        }
    }

    /// Short label for metrics
    pub fn metric_label(&self) -> &'static str {
        match self {
            Classification::HighlyLikely => "highly_likely",
            Classification::Probable => "probable",
            Classification::Possible => "possible",
            Classification::Unlikely => "unlikely",
            Classification::NotExoplanet => "not_exoplanet",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
