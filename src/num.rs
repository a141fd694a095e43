use ordered_float::NotNan;
use serde::{Deserialize, Serialize};

/// A non-NaN f64 compliance score in the range [0, 100].
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Score(NotNan<f64>);

impl Score {
    pub const ZERO: Self = Self(unsafe { NotNan::new_unchecked(0.0) });
    pub const MAX: Self = Self(unsafe { NotNan::new_unchecked(100.0) });

    pub fn new(value: f64) -> Option<Self> {
        let value = NotNan::new(value).ok()?;
        if value.is_sign_negative() || *value > 100.0 {
            return None;
        }
        Some(Self(value))
    }

    /// Clamp into [0, 100]. Returns `None` only for NaN.
    pub fn clamped(value: f64) -> Option<Self> {
        Self::new(value.clamp(0.0, 100.0))
    }

    pub fn as_f64(&self) -> f64 {
        self.0.into_inner()
    }

    pub fn is_zero(&self) -> bool {
        self == &Self::ZERO
    }
}

impl TryFrom<f64> for Score {
    type Error = String;
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("score {value} outside [0, 100]"))
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> f64 {
        score.as_f64()
    }
}

impl std::cmp::PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.0.cmp(&other.0))
    }
}

impl std::cmp::Ord for Score {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl std::fmt::Debug for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A positive, finite, non-NaN pairwise importance ratio. Judgments on the
/// Saaty scale fall in [1/9, 9], with values above 1 favoring the first
/// criterion of the pair. Both the ratio and its reciprocal must be finite,
/// since the reciprocal becomes a matrix entry of its own.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ratio(NotNan<f64>);

impl Ratio {
    /// Equal importance.
    pub const NEUTRAL: Self = Self(unsafe { NotNan::new_unchecked(1.0) });

    pub fn new(value: f64) -> Option<Self> {
        let value = NotNan::new(value).ok()?;
        if *value <= 0.0 || !value.is_finite() || !value.recip().is_finite() {
            return None;
        }
        Some(Self(value))
    }

    pub fn as_f64(&self) -> f64 {
        self.0.into_inner()
    }
}

impl std::fmt::Debug for Ratio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
