pub mod comfort;

use serde::{Deserialize, Serialize};

use crate::num::Score;

/// How distance from the ideal band is measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Comfort degrades on both sides of a target band (temperature,
    /// humidity). Distance is measured from the nearest ideal boundary.
    Target,
    /// Lower is always better (CO2, sound). Distance is zero at or below the
    /// ideal ceiling; only upper bounds matter.
    LowerBetter,
}

/// An inclusive `[lo, hi]` measurement interval.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub lo: f64,
    pub hi: f64,
}

impl Band {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    fn contains(&self, value: f64) -> bool {
        self.lo <= value && value <= self.hi
    }
}

// Scores at the outer edge of each zone. The ideal band scores
// `IDEAL_SCORE` everywhere; each following zone interpolates linearly down to
// its floor, and the poor zone continues the tolerable zone's slope to 0.
const IDEAL_SCORE: f64 = 100.0;
const ACCEPTABLE_FLOOR: f64 = 80.0;
const TOLERABLE_FLOOR: f64 = 50.0;

/// Per-criterion scoring configuration: nested `ideal ⊆ acceptable ⊆
/// tolerable` bands plus the direction distance is measured in. Construction
/// validates finiteness and nesting, so a held value is always scoreable.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBandConfig", into = "RawBandConfig")]
pub struct BandConfig {
    direction: Direction,
    ideal: Band,
    acceptable: Band,
    tolerable: Band,
}

impl BandConfig {
    pub fn new(
        direction: Direction,
        ideal: Band,
        acceptable: Band,
        tolerable: Band,
    ) -> Option<Self> {
        let bands = [ideal, acceptable, tolerable];
        if bands
            .iter()
            .any(|band| !band.lo.is_finite() || !band.hi.is_finite() || band.lo > band.hi)
        {
            return None;
        }
        let nested = match direction {
            Direction::Target => {
                tolerable.lo <= acceptable.lo
                    && acceptable.lo <= ideal.lo
                    && ideal.hi <= acceptable.hi
                    && acceptable.hi <= tolerable.hi
            }
            // Lower bounds are irrelevant below an ideal ceiling.
            Direction::LowerBetter => ideal.hi <= acceptable.hi && acceptable.hi <= tolerable.hi,
        };
        nested.then_some(Self {
            direction,
            ideal,
            acceptable,
            tolerable,
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn ideal(&self) -> Band {
        self.ideal
    }

    pub fn acceptable(&self) -> Band {
        self.acceptable
    }

    pub fn tolerable(&self) -> Band {
        self.tolerable
    }

    /// Re-center the ideal band on a caller's desired target, preserving the
    /// band's width; for lower-better criteria the target replaces the ideal
    /// ceiling. The outer bands are kept, and `None` is returned when the
    /// shifted ideal would escape the acceptable band.
    pub fn with_ideal(&self, target: f64) -> Option<Self> {
        if !target.is_finite() {
            return None;
        }
        let ideal = match self.direction {
            Direction::Target => {
                let half_width = (self.ideal.hi - self.ideal.lo) / 2.0;
                Band::new(target - half_width, target + half_width)
            }
            Direction::LowerBetter => Band::new(self.ideal.lo.min(target), target),
        };
        Self::new(self.direction, ideal, self.acceptable, self.tolerable)
    }
}

#[derive(Clone, Serialize, Deserialize)]
struct RawBandConfig {
    direction: Direction,
    ideal: Band,
    acceptable: Band,
    tolerable: Band,
}

impl TryFrom<RawBandConfig> for BandConfig {
    type Error = String;
    fn try_from(raw: RawBandConfig) -> Result<Self, Self::Error> {
        Self::new(raw.direction, raw.ideal, raw.acceptable, raw.tolerable)
            .ok_or_else(|| "bands must be finite and nested ideal ⊆ acceptable ⊆ tolerable".into())
    }
}

impl From<BandConfig> for RawBandConfig {
    fn from(config: BandConfig) -> Self {
        Self {
            direction: config.direction,
            ideal: config.ideal,
            acceptable: config.acceptable,
            tolerable: config.tolerable,
        }
    }
}

/// Map a raw measurement to its compliance score: 100 inside the ideal band,
/// interpolating down to 80 across the acceptable zone and to 50 across the
/// tolerable zone, then decaying at the tolerable zone's slope to a floor of
/// 0. The mapping is continuous at every zone boundary and monotone
/// non-increasing with distance from the ideal band.
pub fn score(value: f64, config: &BandConfig) -> Score {
    assert!(value.is_finite());
    let (distance, acceptable_width, tolerable_width) = match config.direction {
        Direction::Target if value < config.ideal.lo => (
            config.ideal.lo - value,
            config.ideal.lo - config.acceptable.lo,
            config.acceptable.lo - config.tolerable.lo,
        ),
        Direction::Target if value > config.ideal.hi => (
            value - config.ideal.hi,
            config.acceptable.hi - config.ideal.hi,
            config.tolerable.hi - config.acceptable.hi,
        ),
        Direction::Target => (0.0, 0.0, 0.0),
        Direction::LowerBetter => (
            value - config.ideal.hi,
            config.acceptable.hi - config.ideal.hi,
            config.tolerable.hi - config.acceptable.hi,
        ),
    };
    debug_assert!(config.ideal.contains(value) || distance >= 0.0);
    piecewise(distance, acceptable_width, tolerable_width)
}

/// Score a measurement that may be absent. Non-finite sensor values degrade to
/// absent rather than to a fabricated reading.
pub fn score_measurement(value: Option<f64>, config: &BandConfig) -> Option<Score> {
    let value = value.filter(|value| value.is_finite())?;
    Some(score(value, config))
}

fn piecewise(distance: f64, acceptable_width: f64, tolerable_width: f64) -> Score {
    if distance <= 0.0 {
        return Score::MAX;
    }
    if distance <= acceptable_width {
        let fraction = distance / acceptable_width;
        return Score::new(IDEAL_SCORE - fraction * (IDEAL_SCORE - ACCEPTABLE_FLOOR)).unwrap();
    }
    let beyond_acceptable = distance - acceptable_width;
    if beyond_acceptable <= tolerable_width {
        let fraction = beyond_acceptable / tolerable_width;
        return Score::new(ACCEPTABLE_FLOOR - fraction * (ACCEPTABLE_FLOOR - TOLERABLE_FLOOR))
            .unwrap();
    }
    let slope = (ACCEPTABLE_FLOOR - TOLERABLE_FLOOR) / tolerable_width;
    let beyond_tolerable = beyond_acceptable - tolerable_width;
    Score::new((TOLERABLE_FLOOR - beyond_tolerable * slope).max(0.0)).unwrap()
}

#[cfg(test)]
mod test {
    use super::comfort::ComfortCriterion;
    use super::{score, score_measurement, Band, BandConfig, Direction};
    use crate::test::assert_within_score;

    #[test]
    fn target_zone_scores() {
        let temperature = ComfortCriterion::Temperature.default_bands();
        for (value, expected) in [
            (22.0, 100.0),
            (21.0, 90.0),
            (20.0, 80.0),
            (24.0, 80.0),
            (19.0, 65.0),
            (18.0, 50.0),
            (26.0, 50.0),
            (17.0, 35.0),
            (28.0, 20.0),
            (14.0, 0.0),
        ] {
            assert_within_score(score(value, &temperature), expected, 1e-9);
        }
    }

    #[test]
    fn lower_better_zone_scores() {
        let air_quality = ComfortCriterion::AirQuality.default_bands();
        for (value, expected) in [
            (400.0, 100.0),
            (600.0, 100.0),
            (700.0, 90.0),
            (800.0, 80.0),
            (900.0, 65.0),
            (1000.0, 50.0),
            (1200.0, 20.0),
            (1400.0, 0.0),
            (2500.0, 0.0),
        ] {
            assert_within_score(score(value, &air_quality), expected, 1e-9);
        }
    }

    #[test]
    fn absent_and_unusable_measurements_score_as_absent() {
        let humidity = ComfortCriterion::Humidity.default_bands();
        assert_eq!(score_measurement(None, &humidity), None);
        assert_eq!(score_measurement(Some(f64::NAN), &humidity), None);
        assert_eq!(score_measurement(Some(f64::INFINITY), &humidity), None);
        assert_eq!(
            score_measurement(Some(50.0), &humidity),
            Some(super::Score::MAX),
        );
    }

    #[test]
    fn invalid_band_nesting_rejected() {
        // Acceptable band narrower than the ideal band.
        assert_eq!(
            BandConfig::new(
                Direction::Target,
                Band::new(20.0, 24.0),
                Band::new(21.0, 23.0),
                Band::new(18.0, 26.0),
            ),
            None,
        );
        assert_eq!(
            BandConfig::new(
                Direction::LowerBetter,
                Band::new(0.0, 800.0),
                Band::new(0.0, 600.0),
                Band::new(0.0, 1000.0),
            ),
            None,
        );
        assert_eq!(
            BandConfig::new(
                Direction::Target,
                Band::new(f64::NAN, 24.0),
                Band::new(20.0, 24.0),
                Band::new(18.0, 26.0),
            ),
            None,
        );
    }

    #[test]
    fn desired_profile_recenters_ideal() {
        let temperature = ComfortCriterion::Temperature.default_bands();
        let warm = temperature.with_ideal(23.0).unwrap();
        assert_eq!(warm.ideal(), Band::new(23.0, 23.0));
        assert_eq!(score(23.0, &warm).as_f64(), 100.0);
        assert!(score(22.0, &warm) < score(23.0, &warm));
        // A target escaping the acceptable band is rejected.
        assert_eq!(temperature.with_ideal(25.0), None);
        assert_eq!(temperature.with_ideal(f64::NAN), None);

        let sound = ComfortCriterion::Sound.default_bands();
        let strict = sound.with_ideal(28.0).unwrap();
        assert_eq!(strict.ideal().hi, 28.0);
        assert_eq!(score(28.0, &strict).as_f64(), 100.0);
        assert!(score(30.0, &strict).as_f64() < 100.0);
    }

    #[test]
    fn band_config_serde_round_trip() {
        let humidity = ComfortCriterion::Humidity.default_bands();
        let json = serde_json::to_string(&humidity).unwrap();
        let parsed: BandConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, humidity);

        // Deserialization runs the same validation as the constructor.
        let invalid = r#"{
            "direction": "target",
            "ideal": {"lo": 45.0, "hi": 55.0},
            "acceptable": {"lo": 48.0, "hi": 52.0},
            "tolerable": {"lo": 30.0, "hi": 70.0}
        }"#;
        assert!(serde_json::from_str::<BandConfig>(invalid).is_err());
    }
}
