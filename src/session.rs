//! # Session
//! Explicit state for one interactive user: decision labels, raw slider
//! scores, weights, the last committed results and which view is showing.
//!
//! Each user interaction maps to one handler. Only the value in scope is
//! recomputed: a weight edit rebalances the weights, an explicit
//! `calculate()` produces scores. Nothing here is global.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::DecisionError;
use crate::factors::{
    check_slider_score, parse_decisions, Factor, FactorSet, PerFactor, MAX_SLIDER_SCORE,
    MIN_SLIDER_SCORE,
};
use crate::metrics;
use crate::scoring::{round2, score_report, ScoreReport};
use crate::weights::{random_weights, rebalance, snap_weight, validate_weights, Rebalance, WeightCheck, WeightVector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Inputs,
    Results,
}

/// Results frozen at the moment `calculate()` succeeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionResults {
    pub decisions: Vec<String>,
    pub factors: FactorSet,
    pub weights: WeightVector,
    pub report: ScoreReport,
    pub computed_at: DateTime<Utc>,
}

impl SessionResults {
    pub fn scores(&self) -> &[f64] {
        &self.report.scores
    }

    /// (label, score rounded to 2 decimals) in decision order.
    pub fn rounded(&self) -> Vec<(String, f64)> {
        self.decisions
            .iter()
            .cloned()
            .zip(self.report.scores.iter().map(|s| round2(*s)))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    decisions: Vec<String>,
    /// One row of raw 1–10 scores per decision.
    sliders: Vec<PerFactor<u8>>,
    weights: WeightVector,
    results: Option<SessionResults>,
    view: View,
    randomize: bool,
    default_score: u8,
}

/// Serializable view of the whole session (for UIs).
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub view: View,
    pub decisions: Vec<String>,
    pub sliders: Vec<PerFactor<u8>>,
    pub weights: WeightCheck,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<SessionResults>,
}

impl Session {
    /// New session with defaults from config, drawing random defaults from `rng` if enabled.
    pub fn new<R: Rng + ?Sized>(cfg: &AppConfig, rng: &mut R) -> Self {
        let randomize = cfg.session.randomize_defaults;
        let weights = if randomize {
            random_weights(rng)
        } else {
            cfg.weights
        };

        let mut session = Self {
            decisions: Vec::new(),
            sliders: Vec::new(),
            weights,
            results: None,
            view: View::Inputs,
            randomize,
            default_score: cfg.session.default_factor_score,
        };
        session.decisions = parse_decisions(&cfg.session.default_decisions);
        session.resize_sliders(rng);
        session
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn decisions(&self) -> &[String] {
        &self.decisions
    }

    pub fn sliders(&self) -> &[PerFactor<u8>] {
        &self.sliders
    }

    pub fn weights(&self) -> &WeightVector {
        &self.weights
    }

    pub fn results(&self) -> Option<&SessionResults> {
        self.results.as_ref()
    }

    pub fn weight_check(&self) -> WeightCheck {
        WeightCheck::of(&self.weights)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            view: self.view,
            decisions: self.decisions.clone(),
            sliders: self.sliders.clone(),
            weights: self.weight_check(),
            results: self.results.clone(),
        }
    }

    /// Replace decision labels from comma-separated text. Slider rows are kept by position.
    pub fn set_decisions<R: Rng + ?Sized>(&mut self, text: &str, rng: &mut R) -> Result<&[String], DecisionError> {
        let parsed = parse_decisions(text);
        if parsed.is_empty() {
            return Err(DecisionError::NoDecisions);
        }
        debug!(count = parsed.len(), "decisions updated");
        self.decisions = parsed;
        self.resize_sliders(rng);
        Ok(&self.decisions)
    }

    pub fn set_factor_score(&mut self, index: usize, factor: Factor, score: u8) -> Result<(), DecisionError> {
        let score = check_slider_score(score)?;
        let len = self.sliders.len();
        let row = self
            .sliders
            .get_mut(index)
            .ok_or(DecisionError::DecisionIndexOutOfRange { index, len })?;
        *row.get_mut(factor) = score;
        Ok(())
    }

    /// Apply one slider edit, then rebalance so the total stays ≤ 1.
    pub fn set_weight(&mut self, factor: Factor, value: f64) -> Result<WeightCheck, DecisionError> {
        let snapped = snap_weight(factor, value)?;
        *self.weights.get_mut(factor) = snapped;

        if let Rebalance::Reduced { excess } = rebalance(&mut self.weights, factor) {
            metrics::record_rebalance();
            info!(%factor, excess, "weight edit exceeded 1; reduced proportionally");
        }
        Ok(self.weight_check())
    }

    /// Validate weights, score the current inputs and switch to the results view.
    pub fn calculate(&mut self) -> Result<&SessionResults, DecisionError> {
        if let Err(e) = validate_weights(&self.weights) {
            warn!(total = self.weights.total(), code = e.code(), "calculation blocked by weights");
            return Err(e);
        }

        let factors = FactorSet::from_slider_rows(&self.sliders)?;
        let report = score_report(&factors, &self.weights)?;

        metrics::record_calculation(self.decisions.len());
        info!(decisions = self.decisions.len(), best = ?report.best(), "scores calculated");

        self.view = View::Results;
        Ok(self.results.insert(SessionResults {
            decisions: self.decisions.clone(),
            factors,
            weights: self.weights,
            report,
            computed_at: Utc::now(),
        }))
    }

    /// Back to the inputs view. Committed results stay available.
    pub fn back_to_inputs(&mut self) {
        self.view = View::Inputs;
    }

    fn resize_sliders<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let n = self.decisions.len();
        self.sliders.truncate(n);
        while self.sliders.len() < n {
            let row = if self.randomize {
                PerFactor::new(
                    rng.random_range(MIN_SLIDER_SCORE..=MAX_SLIDER_SCORE),
                    rng.random_range(MIN_SLIDER_SCORE..=MAX_SLIDER_SCORE),
                    rng.random_range(MIN_SLIDER_SCORE..=MAX_SLIDER_SCORE),
                )
            } else {
                PerFactor::new(self.default_score, self.default_score, self.default_score)
            };
            self.sliders.push(row);
        }
    }
}
