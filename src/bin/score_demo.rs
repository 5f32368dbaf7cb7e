//! Demo that walks one session through a full cycle and prints results + CSV (stdout/log only).

use life_decision_calculator::export::scores_to_csv;
use life_decision_calculator::{AppConfig, Factor, Session};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();
    let _ = dotenvy::dotenv();

    let cfg = AppConfig::load()?;
    let mut rng = rand::rng();
    let mut session = Session::new(&cfg, &mut rng);

    session.set_decisions("Take New Job, Stay in Role, Go Back to School", &mut rng)?;
    for (i, (risk, reward, uncertainty)) in [(8, 9, 7), (2, 4, 3), (6, 7, 9)].into_iter().enumerate() {
        session.set_factor_score(i, Factor::Risk, risk)?;
        session.set_factor_score(i, Factor::Reward, reward)?;
        session.set_factor_score(i, Factor::Uncertainty, uncertainty)?;
    }

    // Overshoot on purpose: the edit gets rebalanced below 1.
    let check = session.set_weight(Factor::Reward, 0.8)?;
    println!("weights after edit: {:?} (total {:.3}, valid {})", check.weights, check.total, check.valid);

    let results = match session.calculate() {
        Ok(r) => r,
        Err(e) => {
            println!("cannot calculate yet: {e}");
            return Ok(());
        }
    };

    for (label, score) in results.rounded() {
        println!("{label:<24} {score:>8.2}");
    }
    println!();
    print!("{}", scores_to_csv(&results.decisions, results.scores()));

    println!("score-demo done");
    Ok(())
}
