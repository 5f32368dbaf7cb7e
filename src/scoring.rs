//! Entropy-weighted decision scores.
//!
//! score[i] = Σ_k entropy[k] * weight[k] * factor[k][i]
//!
//! Weights are NOT validated here. Callers run `weights::validate_weights`
//! first; an unvalidated vector still yields a well-defined (but meaningless)
//! number.

use serde::Serialize;

use crate::entropy::{calculate_entropy, EntropyVector};
use crate::error::DecisionError;
use crate::factors::{Factor, FactorSet, PerFactor};
use crate::weights::WeightVector;

/// One score per decision, position-aligned with the decision list.
pub type ScoreVector = Vec<f64>;

/// Scores plus the pieces that produced them (explainability).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub entropy: EntropyVector,
    pub scores: ScoreVector,
    /// Per decision: `entropy[k] * weight[k] * factor[k][i]` for each factor.
    pub contributions: Vec<PerFactor<f64>>,
}

pub fn calculate_scores(factors: &FactorSet, weights: &WeightVector) -> Result<ScoreVector, DecisionError> {
    score_report(factors, weights).map(|r| r.scores)
}

pub fn score_report(factors: &FactorSet, weights: &WeightVector) -> Result<ScoreReport, DecisionError> {
    let entropy = calculate_entropy(factors)?;

    let contributions: Vec<PerFactor<f64>> = (0..factors.num_decisions())
        .map(|i| entropy.map(|k, h| h * weights.get(k) * factors.values(k)[i]))
        .collect();

    let scores = contributions.iter().map(PerFactor::total).collect();

    Ok(ScoreReport {
        entropy,
        scores,
        contributions,
    })
}

impl ScoreReport {
    /// Index of the highest score (first one wins ties).
    pub fn best(&self) -> Option<usize> {
        self.scores
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, &s)| match best {
                Some((_, b)) if b >= s => best,
                _ => Some((i, s)),
            })
            .map(|(i, _)| i)
    }

    /// Factor contributing the most to decision `index`.
    pub fn dominant_factor(&self, index: usize) -> Option<Factor> {
        let c = self.contributions.get(index)?;
        c.iter()
            .fold(None, |best: Option<(Factor, f64)>, (f, &v)| match best {
                Some((_, b)) if b >= v => best,
                _ => Some((f, v)),
            })
            .map(|(f, _)| f)
    }
}

/// Round to 2 decimals for display/export.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
