// tests/scoring_scenarios.rs
//
// End-to-end checks of the scoring core through the public library surface:
// entropy bounds, normalizer behaviour and the documented worked scenarios.

use life_decision_calculator::weights::default_weights;
use life_decision_calculator::{
    calculate_entropy, calculate_scores, rebalance, validate_weights, DecisionError, Factor,
    FactorSet, PerFactor,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn two_even_decisions_score_fifty() {
    let factors = FactorSet::new(vec![50.0, 50.0], vec![50.0, 50.0], vec![50.0, 50.0]).unwrap();
    let entropy = calculate_entropy(&factors).unwrap();
    for (_, &h) in entropy.iter() {
        assert!(approx(h, 1.0));
    }

    let scores = calculate_scores(&factors, &default_weights()).unwrap();
    assert!(approx(scores[0], 50.0) && approx(scores[1], 50.0), "{scores:?}");
}

#[test]
fn overflowing_weights_are_reduced_in_one_pass() {
    let mut w = PerFactor::new(0.7, 0.7, 0.7);
    rebalance(&mut w, Factor::Risk);

    assert!(w.total() <= 1.0 + 1e-9);
    for (_, &v) in w.iter() {
        assert!(v >= 0.0 && v < 0.7);
    }
    // proportional: equal inputs stay equal
    assert!(approx(w.risk, w.reward) && approx(w.reward, w.uncertainty));
}

#[test]
fn half_weights_are_out_of_tolerance() {
    let w = PerFactor::new(0.2, 0.2, 0.1);
    assert_eq!(
        validate_weights(&w),
        Err(DecisionError::WeightSumOutOfTolerance { total: w.total() })
    );
}

#[test]
fn rebalancing_a_valid_vector_is_a_no_op() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..100 {
        let a: f64 = rng.random_range(0.0..0.4);
        let b: f64 = rng.random_range(0.0..0.3);
        let c: f64 = rng.random_range(0.0..0.3);
        let mut w = PerFactor::new(a, b, c);
        let before = w;
        rebalance(&mut w, Factor::Uncertainty);
        assert_eq!(w, before);
    }
}

#[test]
fn entropy_stays_within_zero_and_log2_n() {
    let mut rng = StdRng::seed_from_u64(5);
    for n in 1..=3usize {
        for _ in 0..50 {
            let mut col = || (0..n).map(|_| f64::from(rng.random_range(1u8..=10)) * 10.0).collect::<Vec<_>>();
            let factors = FactorSet::new(col(), col(), col()).unwrap();
            let entropy = calculate_entropy(&factors).unwrap();
            let bound = (n as f64).log2();
            for (_, &h) in entropy.iter() {
                assert!(h >= 0.0 && h <= bound + 1e-12, "n={n} h={h}");
            }
        }
    }
}

#[test]
fn one_decision_scores_zero() {
    // A single decision owns 100% of every factor → zero entropy everywhere.
    let factors = FactorSet::new(vec![80.0], vec![90.0], vec![30.0]).unwrap();
    let scores = calculate_scores(&factors, &default_weights()).unwrap();
    assert_eq!(scores, vec![0.0]);
}
