//! Shannon entropy of each factor's value distribution across decisions.
//!
//! p_i = v_i / Σv, H = −Σ p·log2(p) over p > 0. A factor spread evenly
//! across all decisions scores log2(N); one decision holding everything
//! scores 0.

use crate::error::DecisionError;
use crate::factors::{Factor, FactorSet, PerFactor};

/// Entropy per factor. Derived on every scoring pass, never stored.
pub type EntropyVector = PerFactor<f64>;

pub fn calculate_entropy(factors: &FactorSet) -> Result<EntropyVector, DecisionError> {
    Ok(PerFactor::new(
        factor_entropy(Factor::Risk, factors.values(Factor::Risk))?,
        factor_entropy(Factor::Reward, factors.values(Factor::Reward))?,
        factor_entropy(Factor::Uncertainty, factors.values(Factor::Uncertainty))?,
    ))
}

/// Entropy (bits) of one factor's values. Errors if the values sum to zero.
pub fn factor_entropy(factor: Factor, values: &[f64]) -> Result<f64, DecisionError> {
    let sum: f64 = values.iter().sum();
    if sum <= 0.0 {
        return Err(DecisionError::InvalidFactorInput { factor });
    }

    let h = -values
        .iter()
        .map(|v| v / sum)
        .filter(|&p| p > 0.0)
        .map(|p| p * p.log2())
        .sum::<f64>();

    // -0.0 when a single decision holds everything
    Ok(if h > 0.0 { h } else { 0.0 })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn uniform_over_two_is_one_bit() {
        let set = FactorSet::new(vec![50.0, 50.0], vec![50.0, 50.0], vec![50.0, 50.0]).unwrap();
        let e = calculate_entropy(&set).unwrap();
        assert!(approx(e.risk, 1.0));
        assert!(approx(e.reward, 1.0));
        assert!(approx(e.uncertainty, 1.0));
    }

    #[test]
    fn uniform_over_three_is_log2_three() {
        let h = factor_entropy(Factor::Risk, &[30.0, 30.0, 30.0]).unwrap();
        assert!(approx(h, 3f64.log2()));
    }

    #[test]
    fn concentrated_distribution_is_zero() {
        let h = factor_entropy(Factor::Reward, &[0.0, 80.0, 0.0]).unwrap();
        assert_eq!(h, 0.0);
        assert!(h.is_sign_positive());

        let single = factor_entropy(Factor::Reward, &[70.0]).unwrap();
        assert_eq!(single, 0.0);
    }

    #[test]
    fn zero_sum_is_invalid_factor_input() {
        let set = FactorSet::new(vec![10.0, 20.0], vec![0.0, 0.0], vec![10.0, 10.0]).unwrap();
        assert_eq!(
            calculate_entropy(&set),
            Err(DecisionError::InvalidFactorInput {
                factor: Factor::Reward
            })
        );

        let empty = FactorSet::new(vec![], vec![], vec![]).unwrap();
        assert!(calculate_entropy(&empty).is_err());
    }

    #[test]
    fn entropy_is_bounded_by_log2_n() {
        let samples: [&[f64]; 5] = [
            &[10.0, 20.0, 30.0],
            &[100.0, 10.0, 10.0],
            &[10.0, 100.0],
            &[40.0, 40.0, 90.0],
            &[0.0, 10.0, 10.0],
        ];
        for values in samples {
            let h = factor_entropy(Factor::Uncertainty, values).unwrap();
            let bound = (values.len() as f64).log2();
            assert!(h >= 0.0 && h <= bound + 1e-12, "{values:?} -> {h}");
        }
    }

    #[test]
    fn skewed_distribution_is_between_bounds() {
        let h = factor_entropy(Factor::Risk, &[10.0, 30.0]).unwrap();
        // p = 0.25, 0.75
        let expected = -(0.25f64 * 0.25f64.log2() + 0.75f64 * 0.75f64.log2());
        assert!(approx(h, expected));
        assert!(h > 0.0 && h < 1.0);
    }
}
