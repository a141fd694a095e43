pub mod criteria;
mod matrix;
mod num;
mod weights;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

pub use crate::criteria::{Band, BandConfig, Direction};
pub use crate::matrix::{Comparison, ReciprocalMatrix, MAX_CRITERIA};
pub use crate::num::{Ratio, Score};
pub use crate::weights::{DerivedWeights, CONSISTENCY_THRESHOLD};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// The pairwise judgment set does not cover every unordered criterion
    /// pair, and the caller did not opt into default fill.
    #[error("incomplete comparisons: {missing} of {required} pairwise judgments missing")]
    IncompleteComparisons { missing: usize, required: usize },
    #[error("invalid ratio {ratio}: pairwise ratios must be positive and finite")]
    InvalidRatio { ratio: f64 },
    #[error("more than one judgment for an unordered criterion pair, or a self-judgment")]
    DuplicateComparison,
    #[error("a comparison or weight references a criterion outside the configured set")]
    UnknownCriterion,
    #[error("invalid weights: entries must be non-negative, finite, and sum to 1 (sum was {sum})")]
    InvalidWeights { sum: f64 },
}

/// Derive normalized importance weights from a pairwise-complete judgment set
/// over the given ordered criterion list. The result carries the consistency
/// ratio as a diagnostic; incoherent judgments are reported, never repaired.
pub fn derive_weights<C: Copy + Ord>(
    criteria: &[C],
    comparisons: &[Comparison<C>],
) -> Result<DerivedWeights<C>, Error> {
    let matrix = ReciprocalMatrix::from_comparisons(criteria, comparisons)?;
    Ok(DerivedWeights::from_matrix(&matrix))
}

/// As [`derive_weights`], with unjudged pairs defaulting to the neutral
/// ratio 1. This is the explicit opt-in to the default-fill policy; a missing
/// pair is otherwise an error.
pub fn derive_weights_filled<C: Copy + Ord>(
    criteria: &[C],
    comparisons: &[Comparison<C>],
) -> Result<DerivedWeights<C>, Error> {
    let matrix = ReciprocalMatrix::from_comparisons_filled(criteria, comparisons)?;
    Ok(DerivedWeights::from_matrix(&matrix))
}

/// Static attributes a candidate space is filtered on before any scoring.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    /// Numeric attributes, e.g. seating capacity or power outlet count.
    #[serde(default)]
    pub numeric: BTreeMap<String, f64>,
    /// Boolean facility flags, e.g. projector or wheelchair access.
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
}

/// Hard pass/fail requirements applied before scoring. A candidate that does
/// not report a constrained attribute fails that requirement: missing evidence
/// never satisfies a hard constraint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    /// The candidate's numeric attribute must be present and >= the minimum.
    #[serde(default)]
    pub minimums: BTreeMap<String, f64>,
    /// The candidate's flag must be present and true.
    #[serde(default)]
    pub required_flags: BTreeSet<String>,
}

impl Constraints {
    fn eligible(&self, attributes: &Attributes) -> bool {
        let minimums_met = self.minimums.iter().all(|(key, minimum)| {
            attributes
                .numeric
                .get(key)
                .is_some_and(|value| value >= minimum)
        });
        let flags_met = self
            .required_flags
            .iter()
            .all(|key| attributes.flags.get(key).copied().unwrap_or(false));
        minimums_met && flags_met
    }
}

/// A candidate space with its current measurements and static attributes.
/// Measurement absence is represented by key absence; the engine never
/// substitutes a default reading for a silent sensor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Candidate<Id, C: Ord> {
    pub id: Id,
    #[serde(default = "BTreeMap::new")]
    pub measurements: BTreeMap<C, f64>,
    #[serde(default)]
    pub attributes: Attributes,
}

/// One entry of the ranked output. `criterion_scores` has no entry for a
/// criterion whose measurement was missing or unusable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ranked<Id, C: Ord> {
    pub id: Id,
    /// 1-based; 1 is the best candidate.
    pub rank: usize,
    pub aggregate: Score,
    pub criterion_scores: BTreeMap<C, Score>,
}

/// Rank eligible candidates by weighted compliance with the given criteria.
///
/// Candidates failing any eligibility constraint are dropped before scoring.
/// Each survivor is scored per weighted criterion; a missing measurement
/// contributes neither its score nor its weight, and the aggregate is
/// re-normalized over the weights that had a measurement, so a candidate
/// loses only that criterion's signal. A candidate with no usable measurement
/// aggregates to zero. The output is sorted by descending aggregate with
/// ranks 1..=k; exact ties keep their input order.
///
/// The weight vector is validated before any candidate is processed: entries
/// must be non-negative and finite, sum to 1 within tolerance, and every
/// weighted criterion must have a band configuration. An empty result is not
/// an error.
pub fn rank<Id: Clone, C: Copy + Ord>(
    candidates: &[Candidate<Id, C>],
    criteria: &BTreeMap<C, BandConfig>,
    weights: &BTreeMap<C, f64>,
    constraints: &Constraints,
) -> Result<Vec<Ranked<Id, C>>, Error> {
    validate_weights(weights)?;
    if !weights.keys().all(|criterion| criteria.contains_key(criterion)) {
        return Err(Error::UnknownCriterion);
    }

    let mut ranked: Vec<Ranked<Id, C>> = candidates
        .iter()
        .filter(|candidate| constraints.eligible(&candidate.attributes))
        .map(|candidate| {
            let criterion_scores: BTreeMap<C, Score> = weights
                .keys()
                .filter_map(|criterion| {
                    let value = candidate.measurements.get(criterion).copied();
                    crate::criteria::score_measurement(value, &criteria[criterion])
                        .map(|score| (*criterion, score))
                })
                .collect();
            let available_weight: f64 = criterion_scores
                .keys()
                .map(|criterion| weights[criterion])
                .sum();
            let aggregate = if available_weight > 0.0 {
                let weighted_sum: f64 = criterion_scores
                    .iter()
                    .map(|(criterion, score)| weights[criterion] * score.as_f64())
                    .sum();
                Score::clamped(weighted_sum / available_weight).unwrap()
            } else {
                Score::ZERO
            };
            Ranked {
                id: candidate.id.clone(),
                rank: 0,
                aggregate,
                criterion_scores,
            }
        })
        .collect();

    let filtered_out = candidates.len() - ranked.len();
    // Stable sort: candidates with equal aggregates keep their input order.
    ranked.sort_by(|a, b| b.aggregate.cmp(&a.aggregate));
    for (position, entry) in ranked.iter_mut().enumerate() {
        entry.rank = position + 1;
    }
    tracing::debug!(eligible = ranked.len(), filtered_out, "ranked candidates");
    Ok(ranked)
}

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

fn validate_weights<C: Ord>(weights: &BTreeMap<C, f64>) -> Result<(), Error> {
    let sum: f64 = weights.values().sum();
    let entries_valid = weights
        .values()
        .all(|weight| weight.is_finite() && *weight >= 0.0);
    if !entries_valid || (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(Error::InvalidWeights { sum });
    }
    Ok(())
}
