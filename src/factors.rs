//! # Factors
//!
//! The three scored dimensions (risk, reward, uncertainty), a small fixed-order
//! container keyed by factor, and the `FactorSet` the scoring core consumes.
//!
//! - Iteration order is always risk → reward → uncertainty.
//! - Slider scores are integers in `1..=10`; the core sees them ×10.
//! - Decision labels arrive as one comma-separated string (max 3 options).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DecisionError;

/// Upper bound on the number of decisions compared at once.
pub const MAX_DECISIONS: usize = 3;

/// Scale applied to 1–10 slider scores before they reach the core.
pub const SLIDER_SCALE: f64 = 10.0;

pub const MIN_SLIDER_SCORE: u8 = 1;
pub const MAX_SLIDER_SCORE: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Factor {
    Risk,
    Reward,
    Uncertainty,
}

impl Factor {
    pub const ALL: [Factor; 3] = [Factor::Risk, Factor::Reward, Factor::Uncertainty];

    pub fn as_str(self) -> &'static str {
        match self {
            Factor::Risk => "risk",
            Factor::Reward => "reward",
            Factor::Uncertainty => "uncertainty",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per factor. Serializes as `{"risk": .., "reward": .., "uncertainty": ..}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerFactor<T> {
    pub risk: T,
    pub reward: T,
    pub uncertainty: T,
}

impl<T> PerFactor<T> {
    pub fn new(risk: T, reward: T, uncertainty: T) -> Self {
        Self {
            risk,
            reward,
            uncertainty,
        }
    }

    pub fn get(&self, factor: Factor) -> &T {
        match factor {
            Factor::Risk => &self.risk,
            Factor::Reward => &self.reward,
            Factor::Uncertainty => &self.uncertainty,
        }
    }

    pub fn get_mut(&mut self, factor: Factor) -> &mut T {
        match factor {
            Factor::Risk => &mut self.risk,
            Factor::Reward => &mut self.reward,
            Factor::Uncertainty => &mut self.uncertainty,
        }
    }

    /// Iterate in fixed factor order.
    pub fn iter(&self) -> impl Iterator<Item = (Factor, &T)> {
        Factor::ALL.into_iter().map(move |f| (f, self.get(f)))
    }

    pub fn map<U>(&self, mut f: impl FnMut(Factor, &T) -> U) -> PerFactor<U> {
        PerFactor {
            risk: f(Factor::Risk, &self.risk),
            reward: f(Factor::Reward, &self.reward),
            uncertainty: f(Factor::Uncertainty, &self.uncertainty),
        }
    }
}

impl PerFactor<f64> {
    pub fn total(&self) -> f64 {
        self.risk + self.reward + self.uncertainty
    }
}

/// Per-factor values, parallel-indexed to the decision list.
///
/// Invariant: all three sequences have the same length and hold finite,
/// non-negative values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PerFactor<Vec<f64>>", into = "PerFactor<Vec<f64>>")]
pub struct FactorSet {
    values: PerFactor<Vec<f64>>,
}

impl FactorSet {
    pub fn new(risk: Vec<f64>, reward: Vec<f64>, uncertainty: Vec<f64>) -> Result<Self, DecisionError> {
        Self::try_from(PerFactor::new(risk, reward, uncertainty))
    }

    /// Build from raw 1–10 slider rows (one `PerFactor<u8>` per decision), scaled by `SLIDER_SCALE`.
    pub fn from_slider_rows(rows: &[PerFactor<u8>]) -> Result<Self, DecisionError> {
        let mut values: PerFactor<Vec<f64>> = PerFactor::default();
        for row in rows {
            for (factor, &score) in row.iter() {
                check_slider_score(score)?;
                values.get_mut(factor).push(f64::from(score) * SLIDER_SCALE);
            }
        }
        Self::try_from(values)
    }

    pub fn values(&self, factor: Factor) -> &[f64] {
        self.values.get(factor)
    }

    pub fn num_decisions(&self) -> usize {
        self.values.risk.len()
    }

    pub fn as_per_factor(&self) -> &PerFactor<Vec<f64>> {
        &self.values
    }
}

impl TryFrom<PerFactor<Vec<f64>>> for FactorSet {
    type Error = DecisionError;

    fn try_from(values: PerFactor<Vec<f64>>) -> Result<Self, Self::Error> {
        let expected = values.risk.len();
        for (factor, seq) in values.iter() {
            if seq.len() != expected {
                return Err(DecisionError::MismatchedFactorLengths {
                    factor,
                    expected,
                    actual: seq.len(),
                });
            }
            if let Some(&bad) = seq.iter().find(|v| !v.is_finite() || **v < 0.0) {
                return Err(DecisionError::InvalidFactorValue { factor, value: bad });
            }
        }
        Ok(Self { values })
    }
}

impl From<FactorSet> for PerFactor<Vec<f64>> {
    fn from(set: FactorSet) -> Self {
        set.values
    }
}

pub fn check_slider_score(score: u8) -> Result<u8, DecisionError> {
    if (MIN_SLIDER_SCORE..=MAX_SLIDER_SCORE).contains(&score) {
        Ok(score)
    } else {
        Err(DecisionError::FactorScoreOutOfRange { score })
    }
}

/// Split comma-separated decision options, trim them, drop blanks, keep the first three.
pub fn parse_decisions(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(MAX_DECISIONS)
        .map(str::to_string)
        .collect()
}

/// Trim an explicit list of labels and drop blanks. Unlike free text, an
/// over-long list is rejected instead of truncated.
pub fn clean_decisions(list: Vec<String>) -> Result<Vec<String>, DecisionError> {
    let cleaned: Vec<String> = list
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    match cleaned.len() {
        0 => Err(DecisionError::NoDecisions),
        n if n > MAX_DECISIONS => Err(DecisionError::TooManyDecisions {
            count: n,
            max: MAX_DECISIONS,
        }),
        _ => Ok(cleaned),
    }
}
