use std::collections::BTreeMap;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::matrix::{ReciprocalMatrix, MAX_CRITERIA};

/// Conventional upper bound on an acceptable consistency ratio.
pub const CONSISTENCY_THRESHOLD: f64 = 0.10;

/// Saaty's random-index constants, indexed by matrix order. Orders 1 and 2
/// cannot be inconsistent and have no defined index.
const RANDOM_INDEX: [f64; MAX_CRITERIA + 1] = [
    0.0, 0.0, 0.0, 0.58, 0.90, 1.12, 1.24, 1.32, 1.41, 1.45, 1.49,
];

/// Normalized priority weights derived from a reciprocal judgment matrix,
/// together with the consistency diagnostic. Weights sum to 1 and are all
/// positive. An inconsistent judgment set (see [`DerivedWeights::is_consistent`])
/// is reported, never corrected; callers decide whether to proceed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DerivedWeights<C: Ord> {
    pub weights: BTreeMap<C, f64>,
    pub consistency_ratio: f64,
}

impl<C: Copy + Ord> DerivedWeights<C> {
    /// Derive weights with the geometric-mean method: normalize the per-row
    /// geometric means `gm[i] = (Π_j M[i][j])^(1/n)`. The consistency ratio
    /// estimates the principal eigenvalue from the weighted row sums rather
    /// than computing a real eigendecomposition.
    pub fn from_matrix(matrix: &ReciprocalMatrix<C>) -> Self {
        let n = matrix.order();
        let geometric_means: ArrayVec<f64, MAX_CRITERIA> = (0..n)
            .map(|row| {
                (0..n)
                    .map(|col| matrix.entry(row, col))
                    .product::<f64>()
                    .powf(1.0 / n as f64)
            })
            .collect();
        let total: f64 = geometric_means.iter().sum();
        let weights: ArrayVec<f64, MAX_CRITERIA> =
            geometric_means.iter().map(|gm| gm / total).collect();

        let consistency_ratio = consistency_ratio(matrix, &weights);
        if consistency_ratio >= CONSISTENCY_THRESHOLD {
            tracing::warn!(consistency_ratio, "pairwise judgments are inconsistent");
        }

        Self {
            weights: matrix.criteria().iter().copied().zip(weights).collect(),
            consistency_ratio,
        }
    }
}

impl<C: Ord> DerivedWeights<C> {
    /// A consistency ratio below 0.10 is conventionally acceptable. This is a
    /// diagnostic, not a gate: an inconsistent weight vector is still usable.
    pub fn is_consistent(&self) -> bool {
        self.consistency_ratio < CONSISTENCY_THRESHOLD
    }
}

fn consistency_ratio<C: Copy + Ord>(matrix: &ReciprocalMatrix<C>, weights: &[f64]) -> f64 {
    let n = matrix.order();
    // Reciprocal matrices of order 1 and 2 are always consistent, and both the
    // consistency-index denominator and the random index degenerate there.
    if n <= 2 {
        return 0.0;
    }
    let lambda_max = (0..n)
        .map(|row| {
            let weighted_row_sum: f64 = (0..n)
                .map(|col| matrix.entry(row, col) * weights[col])
                .sum();
            weighted_row_sum / weights[row]
        })
        .sum::<f64>()
        / n as f64;
    let consistency_index = (lambda_max - n as f64) / (n as f64 - 1.0);
    consistency_index / RANDOM_INDEX[n]
}

#[cfg(test)]
mod test {
    use super::DerivedWeights;
    use crate::matrix::{Comparison, ReciprocalMatrix};
    use crate::test::assert_within;

    fn derive(criteria: &[u8], comparisons: &[(u8, u8, f64)]) -> DerivedWeights<u8> {
        let comparisons: Vec<Comparison<u8>> = comparisons
            .iter()
            .map(|(a, b, ratio)| Comparison {
                criteria: (*a, *b),
                ratio: *ratio,
            })
            .collect();
        DerivedWeights::from_matrix(
            &ReciprocalMatrix::from_comparisons(criteria, &comparisons).unwrap(),
        )
    }

    #[test]
    fn perfectly_consistent_chain() {
        // 0 is twice as important as 1, which is twice as important as 2, and
        // the transitive judgment agrees, so the matrix is exactly consistent.
        let derived = derive(&[0, 1, 2], &[(0, 1, 2.0), (1, 2, 2.0), (0, 2, 4.0)]);
        assert_within(derived.weights[&0], 4.0 / 7.0, 1e-12);
        assert_within(derived.weights[&1], 2.0 / 7.0, 1e-12);
        assert_within(derived.weights[&2], 1.0 / 7.0, 1e-12);
        assert_within(derived.consistency_ratio, 0.0, 1e-12);
        assert!(derived.is_consistent());
    }

    #[test]
    fn cyclic_judgments_flagged_inconsistent() {
        // 0 > 1 > 2 > 0: maximally incoherent, uniform weights fall out of the
        // row symmetry but the consistency ratio must flag the cycle.
        let derived = derive(&[0, 1, 2], &[(0, 1, 3.0), (1, 2, 3.0), (2, 0, 3.0)]);
        assert_within(derived.weights[&0], 1.0 / 3.0, 1e-12);
        assert_within(derived.weights[&1], 1.0 / 3.0, 1e-12);
        assert_within(derived.weights[&2], 1.0 / 3.0, 1e-12);
        assert!(derived.consistency_ratio > 1.0);
        assert!(!derived.is_consistent());
    }

    #[test]
    fn single_criterion_takes_all_weight() {
        let derived = derive(&[9], &[]);
        assert_eq!(derived.weights[&9], 1.0);
        assert_eq!(derived.consistency_ratio, 0.0);
        assert!(derived.is_consistent());
    }

    #[test]
    fn order_two_is_always_consistent() {
        let derived = derive(&[0, 1], &[(0, 1, 7.0)]);
        assert_within(derived.weights[&0], 0.875, 1e-12);
        assert_within(derived.weights[&1], 0.125, 1e-12);
        assert_eq!(derived.consistency_ratio, 0.0);
    }
}
