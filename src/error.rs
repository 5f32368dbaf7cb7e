//! Error taxonomy for the scoring core and the session handlers.
//!
//! Every variant is local and synchronous: it is reported back to whoever
//! made the edit, nothing is retried, and the session simply stays in the
//! input-correction state.

use thiserror::Error;

use crate::factors::Factor;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecisionError {
    /// A factor's values sum to zero, so its distribution (and entropy) is undefined.
    #[error("values for factor `{factor}` sum to zero; entropy is undefined")]
    InvalidFactorInput { factor: Factor },

    #[error("Weights must not exceed 1 (total {total:.3}). Adjust the sliders accordingly.")]
    WeightSumExceeded { total: f64 },

    #[error("Weights must sum to approximately 1 (total {total:.3}). Adjust the sliders accordingly.")]
    WeightSumOutOfTolerance { total: f64 },

    #[error("enter at least one decision option")]
    NoDecisions,

    #[error("{count} decision options given; at most {max} can be compared")]
    TooManyDecisions { count: usize, max: usize },

    #[error("{decisions} decision options but {values} values per factor")]
    DecisionCountMismatch { decisions: usize, values: usize },

    #[error("factor score {score} is outside 1-10")]
    FactorScoreOutOfRange { score: u8 },

    #[error("factor `{factor}` has a negative or non-finite value ({value})")]
    InvalidFactorValue { factor: Factor, value: f64 },

    #[error("factor `{factor}` has {actual} values, expected {expected}")]
    MismatchedFactorLengths {
        factor: Factor,
        expected: usize,
        actual: usize,
    },

    #[error("decision index {index} out of range (have {len})")]
    DecisionIndexOutOfRange { index: usize, len: usize },

    #[error("weight for `{factor}` must be a finite number in 0..=1")]
    InvalidWeight { factor: Factor },

    #[error("no results yet; calculate scores first")]
    NoResults,
}

impl DecisionError {
    /// Short machine-readable code, used in API payloads and metric labels.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidFactorInput { .. } => "invalid_factor_input",
            Self::WeightSumExceeded { .. } => "weight_sum_exceeded",
            Self::WeightSumOutOfTolerance { .. } => "weight_sum_out_of_tolerance",
            Self::NoDecisions => "no_decisions",
            Self::TooManyDecisions { .. } => "too_many_decisions",
            Self::DecisionCountMismatch { .. } => "decision_count_mismatch",
            Self::FactorScoreOutOfRange { .. } => "factor_score_out_of_range",
            Self::InvalidFactorValue { .. } => "invalid_factor_value",
            Self::MismatchedFactorLengths { .. } => "mismatched_factor_lengths",
            Self::DecisionIndexOutOfRange { .. } => "decision_index_out_of_range",
            Self::InvalidWeight { .. } => "invalid_weight",
            Self::NoResults => "no_results",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_totals_print_three_decimals() {
        let exceeded = DecisionError::WeightSumExceeded { total: 1.004 };
        assert!(exceeded.to_string().contains("(total 1.004)"), "{exceeded}");

        let low = DecisionError::WeightSumOutOfTolerance { total: 0.985 };
        assert!(low.to_string().contains("(total 0.985)"), "{low}");
    }

    #[test]
    fn count_mismatch_names_both_sides() {
        let err = DecisionError::DecisionCountMismatch {
            decisions: 2,
            values: 3,
        };
        assert_eq!(err.to_string(), "2 decision options but 3 values per factor");
        assert_eq!(err.code(), "decision_count_mismatch");
    }
}
