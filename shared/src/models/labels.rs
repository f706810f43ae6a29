//! Categorical prediction targets

use serde::{Deserialize, Serialize};
use std::fmt;

/// Target name used to key the temperature model and its artifacts.
pub const TARGET_TEMPERATURE: &str = "temperature";
/// Target name used to key the precipitation model and its artifacts.
pub const TARGET_PRECIPITATION: &str = "precipitation";

/// Percentile-based daily maximum temperature category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemperatureLabel {
    #[serde(rename = "Very Cold")]
    VeryCold,
    #[serde(rename = "Cold")]
    Cold,
    #[serde(rename = "Moderate")]
    Moderate,
    #[serde(rename = "Hot")]
    Hot,
    #[serde(rename = "Very Hot")]
    VeryHot,
}

impl TemperatureLabel {
    /// The full enumeration, in cold-to-hot order.
    pub const ALL: [TemperatureLabel; 5] = [
        TemperatureLabel::VeryCold,
        TemperatureLabel::Cold,
        TemperatureLabel::Moderate,
        TemperatureLabel::Hot,
        TemperatureLabel::VeryHot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureLabel::VeryCold => "Very Cold",
            TemperatureLabel::Cold => "Cold",
            TemperatureLabel::Moderate => "Moderate",
            TemperatureLabel::Hot => "Hot",
            TemperatureLabel::VeryHot => "Very Hot",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|label| label.as_str() == s)
    }
}

impl fmt::Display for TemperatureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Daily precipitation category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrecipitationLabel {
    #[serde(rename = "No Rain")]
    NoRain,
    #[serde(rename = "Light Rain")]
    LightRain,
    #[serde(rename = "Heavy Rain")]
    HeavyRain,
}

impl PrecipitationLabel {
    /// The full enumeration, in dry-to-wet order.
    pub const ALL: [PrecipitationLabel; 3] = [
        PrecipitationLabel::NoRain,
        PrecipitationLabel::LightRain,
        PrecipitationLabel::HeavyRain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrecipitationLabel::NoRain => "No Rain",
            PrecipitationLabel::LightRain => "Light Rain",
            PrecipitationLabel::HeavyRain => "Heavy Rain",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|label| label.as_str() == s)
    }
}

impl fmt::Display for PrecipitationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
