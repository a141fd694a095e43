use std::collections::{BTreeMap, BTreeSet};

use arrayvec::ArrayVec;
use ordered_float::NotNan;
use serde::{Deserialize, Serialize};

use crate::num::Ratio;
use crate::Error;

/// Maximum number of criteria in a single request. The criterion set is fixed
/// and small, and the consistency check (see `weights`) only has random-index
/// constants up to this order.
pub const MAX_CRITERIA: usize = 10;

/// A single pairwise importance judgment between two criteria. A ratio above 1
/// means `criteria.0` is more important than `criteria.1`; the judgment for
/// the reversed pair is implied by reciprocity. Ratios are validated by the
/// matrix builder, not here.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comparison<C> {
    pub criteria: (C, C),
    pub ratio: f64,
}

/// A complete positive reciprocal judgment matrix over an ordered criterion
/// list: unit diagonal, and entry (j, i) is the reciprocal of entry (i, j).
#[derive(Clone, Debug)]
pub struct ReciprocalMatrix<C> {
    criteria: ArrayVec<C, MAX_CRITERIA>,
    rows: ArrayVec<ArrayVec<NotNan<f64>, MAX_CRITERIA>, MAX_CRITERIA>,
}

impl<C: Copy + Ord> ReciprocalMatrix<C> {
    /// Build the matrix from a pairwise-complete judgment set: exactly one
    /// judgment per unordered pair of distinct criteria, n·(n−1)/2 in total.
    /// Fails with [`Error::IncompleteComparisons`] when any pair is missing.
    pub fn from_comparisons(
        criteria: &[C],
        comparisons: &[Comparison<C>],
    ) -> Result<Self, Error> {
        Self::build(criteria, comparisons, false)
    }

    /// As [`Self::from_comparisons`], except that unjudged pairs default to
    /// the neutral ratio 1 instead of failing. Callers opt into this fill
    /// policy explicitly; it is never applied implicitly.
    pub fn from_comparisons_filled(
        criteria: &[C],
        comparisons: &[Comparison<C>],
    ) -> Result<Self, Error> {
        Self::build(criteria, comparisons, true)
    }

    fn build(
        criteria: &[C],
        comparisons: &[Comparison<C>],
        fill_missing: bool,
    ) -> Result<Self, Error> {
        assert!(!criteria.is_empty());
        assert!(criteria.len() <= MAX_CRITERIA);
        let index: BTreeMap<C, usize> = criteria
            .iter()
            .enumerate()
            .map(|(position, criterion)| (*criterion, position))
            .collect();
        assert!(index.len() == criteria.len());

        let n = criteria.len();
        // Unit diagonal, and neutral everywhere else so that fill is already
        // in place; judged cells overwrite below.
        let neutral = NotNan::new(Ratio::NEUTRAL.as_f64()).unwrap();
        let mut rows: ArrayVec<ArrayVec<NotNan<f64>, MAX_CRITERIA>, MAX_CRITERIA> =
            (0..n).map(|_| (0..n).map(|_| neutral).collect()).collect();

        let mut judged: BTreeSet<(usize, usize)> = Default::default();
        for comparison in comparisons {
            let row = *index
                .get(&comparison.criteria.0)
                .ok_or(Error::UnknownCriterion)?;
            let col = *index
                .get(&comparison.criteria.1)
                .ok_or(Error::UnknownCriterion)?;
            if row == col || !judged.insert((row.min(col), row.max(col))) {
                return Err(Error::DuplicateComparison);
            }
            let ratio = Ratio::new(comparison.ratio).ok_or(Error::InvalidRatio {
                ratio: comparison.ratio,
            })?;
            rows[row][col] = NotNan::new(ratio.as_f64()).unwrap();
            rows[col][row] = NotNan::new(ratio.as_f64().recip()).unwrap();
        }

        let required = (n * (n - 1)) / 2;
        let missing = required - judged.len();
        if missing > 0 && !fill_missing {
            return Err(Error::IncompleteComparisons { missing, required });
        }

        Ok(Self {
            criteria: criteria.iter().copied().collect(),
            rows,
        })
    }

    pub fn order(&self) -> usize {
        self.criteria.len()
    }

    pub fn criteria(&self) -> &[C] {
        &self.criteria
    }

    pub fn entry(&self, row: usize, col: usize) -> f64 {
        self.rows[row][col].into_inner()
    }
}
