//! Factor importance weights: single-pass rebalancing and the validity check.
//!
//! Weight edits arrive one slider at a time. After each edit the vector is
//! rebalanced so the total never exceeds 1 (proportional reduction, one pass,
//! no re-normalization). Scoring additionally requires the total to sit in
//! `[0.99, 1.01]`; that check is separate and never mutates anything.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DecisionError;
use crate::factors::{Factor, PerFactor};

pub type WeightVector = PerFactor<f64>;

pub const WEIGHT_SUM_MIN: f64 = 0.99;
pub const WEIGHT_SUM_MAX: f64 = 1.01;

/// Slider granularity for a single weight.
pub const WEIGHT_STEP: f64 = 0.01;

/// Float noise tolerated above 1.0 before a total counts as exceeded.
const SUM_EPSILON: f64 = 1e-9;

pub fn default_weights() -> WeightVector {
    PerFactor::new(0.3, 0.5, 0.2)
}

/// Three draws from U(0.2, 0.6), normalized to sum to 1.
pub fn random_weights<R: Rng + ?Sized>(rng: &mut R) -> WeightVector {
    let raw = PerFactor::new(
        rng.random_range(0.2..0.6),
        rng.random_range(0.2..0.6),
        rng.random_range(0.2..0.6),
    );
    let total = raw.total();
    raw.map(|_, w| w / total)
}

/// What a rebalance pass did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rebalance {
    Unchanged,
    Reduced { excess: f64 },
}

/// Rebalance after `changed` was edited so the total is ≤ 1.
///
/// Each positive weight gives up `excess * w / total` (floored at 0), with
/// `total` fixed for the whole pass.
pub fn rebalance(weights: &mut WeightVector, changed: Factor) -> Rebalance {
    let total = weights.total();
    if total <= 1.0 {
        return Rebalance::Unchanged;
    }

    let excess = total - 1.0;
    for factor in Factor::ALL {
        let w = weights.get_mut(factor);
        if *w > 0.0 {
            *w -= excess * (*w / total);
            *w = w.max(0.0);
        }
    }

    debug!(%changed, total, excess, new_total = weights.total(), "weights rebalanced");
    Rebalance::Reduced { excess }
}

/// Clamp a raw slider value into `[0, 1]` and snap it to the 0.01 step.
pub fn snap_weight(factor: Factor, value: f64) -> Result<f64, DecisionError> {
    if !value.is_finite() {
        return Err(DecisionError::InvalidWeight { factor });
    }
    let snapped = (value.clamp(0.0, 1.0) / WEIGHT_STEP).round() * WEIGHT_STEP;
    Ok(snapped.clamp(0.0, 1.0))
}

/// Every weight must be finite and within `[0, 1]`. Session edits are clamped by
/// `snap_weight`; vectors that arrive whole are checked here instead.
pub fn check_weight_values(weights: &WeightVector) -> Result<(), DecisionError> {
    match weights.iter().find(|(_, w)| !w.is_finite() || !(0.0..=1.0).contains(*w)) {
        Some((factor, _)) => Err(DecisionError::InvalidWeight { factor }),
        None => Ok(()),
    }
}

/// Valid iff `0.99 <= total <= 1.01`. A total above 1 is reported first as a hard block.
pub fn validate_weights(weights: &WeightVector) -> Result<(), DecisionError> {
    let total = weights.total();
    if total > 1.0 + SUM_EPSILON {
        return Err(DecisionError::WeightSumExceeded { total });
    }
    if !(WEIGHT_SUM_MIN..=WEIGHT_SUM_MAX).contains(&total) {
        return Err(DecisionError::WeightSumOutOfTolerance { total });
    }
    Ok(())
}

/// Validity flag + message for the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightCheck {
    pub weights: WeightVector,
    pub total: f64,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl WeightCheck {
    pub fn of(weights: &WeightVector) -> Self {
        let result = validate_weights(weights);
        Self {
            weights: *weights,
            total: weights.total(),
            valid: result.is_ok(),
            code: result.as_ref().err().map(|e| e.code().to_string()),
            error: result.err().map(|e| e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn total_at_or_below_one_is_untouched() {
        let mut w = PerFactor::new(0.3, 0.5, 0.2);
        assert_eq!(rebalance(&mut w, Factor::Risk), Rebalance::Unchanged);
        assert_eq!(w, PerFactor::new(0.3, 0.5, 0.2));

        let mut low = PerFactor::new(0.1, 0.1, 0.1);
        assert_eq!(rebalance(&mut low, Factor::Reward), Rebalance::Unchanged);
        assert_eq!(low, PerFactor::new(0.1, 0.1, 0.1));
    }

    #[test]
    fn all_zero_stays_zero() {
        let mut w = PerFactor::new(0.0, 0.0, 0.0);
        assert_eq!(rebalance(&mut w, Factor::Uncertainty), Rebalance::Unchanged);
        assert_eq!(w.total(), 0.0);
        assert!(validate_weights(&w).is_err());
    }

    #[test]
    fn overflow_is_reduced_proportionally() {
        let mut w = PerFactor::new(0.7, 0.7, 0.7);
        let outcome = rebalance(&mut w, Factor::Uncertainty);
        assert!(matches!(outcome, Rebalance::Reduced { excess } if (excess - 1.1).abs() < 1e-9));

        assert!(w.total() <= 1.0 + 1e-9, "total {}", w.total());
        for (_, &v) in w.iter() {
            assert!(v >= 0.0 && v < 0.7);
            assert!((v - 1.0 / 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn reduction_preserves_ratios() {
        let mut w = PerFactor::new(0.8, 0.4, 0.0);
        rebalance(&mut w, Factor::Risk);
        assert_eq!(w.uncertainty, 0.0);
        assert!((w.risk / w.reward - 2.0).abs() < 1e-9);
        assert!(w.total() <= 1.0 + 1e-9);
    }

    #[test]
    fn one_pass_always_ends_at_or_below_one() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let mut w = PerFactor::new(
                rng.random_range(0.0..=1.0),
                rng.random_range(0.0..=1.0),
                rng.random_range(0.0..=1.0),
            );
            let before = w.total();
            rebalance(&mut w, Factor::Reward);
            assert!(w.total() <= 1.0 + 1e-9, "{before} -> {}", w.total());
            assert!(w.iter().all(|(_, &v)| v >= 0.0));
        }
    }

    #[test]
    fn validation_reports_distinct_errors() {
        assert!(validate_weights(&default_weights()).is_ok());
        assert!(validate_weights(&PerFactor::new(0.33, 0.33, 0.335)).is_ok());

        assert!(matches!(
            validate_weights(&PerFactor::new(0.5, 0.5, 0.2)),
            Err(DecisionError::WeightSumExceeded { .. })
        ));
        assert!(matches!(
            validate_weights(&PerFactor::new(0.2, 0.2, 0.1)),
            Err(DecisionError::WeightSumOutOfTolerance { .. })
        ));
    }

    #[test]
    fn snapping_clamps_and_rounds() {
        assert_eq!(snap_weight(Factor::Risk, 1.7).unwrap(), 1.0);
        assert_eq!(snap_weight(Factor::Risk, -0.2).unwrap(), 0.0);
        assert!((snap_weight(Factor::Risk, 0.333).unwrap() - 0.33).abs() < 1e-12);
        assert_eq!(
            snap_weight(Factor::Reward, f64::NAN),
            Err(DecisionError::InvalidWeight {
                factor: Factor::Reward
            })
        );
    }

    #[test]
    fn out_of_range_values_are_rejected_even_when_sum_is_valid() {
        let w = PerFactor::new(-1.0, 1.5, 0.5);
        assert!(validate_weights(&w).is_ok(), "sum alone passes");
        assert_eq!(
            check_weight_values(&w),
            Err(DecisionError::InvalidWeight {
                factor: Factor::Risk
            })
        );
        assert_eq!(
            check_weight_values(&PerFactor::new(0.0, 1.0, f64::INFINITY)),
            Err(DecisionError::InvalidWeight {
                factor: Factor::Uncertainty
            })
        );
        assert!(check_weight_values(&default_weights()).is_ok());
    }

    #[test]
    fn random_defaults_are_valid() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let w = random_weights(&mut rng);
            assert!(validate_weights(&w).is_ok(), "{w:?}");
            assert!(w.iter().all(|(_, &v)| v > 0.0 && v < 1.0));
        }
    }

    #[test]
    fn check_carries_flag_and_message() {
        let ok = WeightCheck::of(&default_weights());
        assert!(ok.valid);
        assert!(ok.error.is_none());

        let bad = WeightCheck::of(&PerFactor::new(0.2, 0.2, 0.1));
        assert!(!bad.valid);
        assert_eq!(bad.code.as_deref(), Some("weight_sum_out_of_tolerance"));
        assert!(bad.error.unwrap().contains("approximately 1"));
    }
}
