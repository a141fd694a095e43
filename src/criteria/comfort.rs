use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Band, BandConfig, Direction};

/// The standard indoor-comfort criteria. Band boundaries follow
/// EN 16798-1:2019 category II for temperature and humidity, ASHRAE 62.1
/// guidance for CO2, and WHO / ISO 7730 guidance for ambient noise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComfortCriterion {
    Temperature,
    AirQuality,
    Humidity,
    Sound,
}

impl ComfortCriterion {
    pub const ALL: [Self; 4] = [
        Self::Temperature,
        Self::AirQuality,
        Self::Humidity,
        Self::Sound,
    ];

    pub fn default_bands(&self) -> BandConfig {
        let config = match self {
            Self::Temperature => BandConfig::new(
                Direction::Target,
                Band::new(22.0, 22.0),
                Band::new(20.0, 24.0),
                Band::new(18.0, 26.0),
            ),
            Self::AirQuality => BandConfig::new(
                Direction::LowerBetter,
                Band::new(0.0, 600.0),
                Band::new(0.0, 800.0),
                Band::new(0.0, 1000.0),
            ),
            Self::Humidity => BandConfig::new(
                Direction::Target,
                Band::new(45.0, 55.0),
                Band::new(40.0, 60.0),
                Band::new(30.0, 70.0),
            ),
            Self::Sound => BandConfig::new(
                Direction::LowerBetter,
                Band::new(0.0, 30.0),
                Band::new(0.0, 35.0),
                Band::new(0.0, 45.0),
            ),
        };
        config.unwrap()
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Self::Temperature => "°C",
            Self::AirQuality => "ppm CO2",
            Self::Humidity => "%RH",
            Self::Sound => "dB(A)",
        }
    }
}

/// Band configurations for the full standard criterion set, ready to pass to
/// [`crate::rank`].
pub fn default_criteria() -> BTreeMap<ComfortCriterion, BandConfig> {
    ComfortCriterion::ALL
        .iter()
        .map(|criterion| (*criterion, criterion.default_bands()))
        .collect()
}
