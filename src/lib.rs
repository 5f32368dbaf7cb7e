// src/lib.rs
// Public library surface for the server binary, the demo and integration tests.

pub mod api;
pub mod charts;
pub mod config;
pub mod entropy;
pub mod error;
pub mod export;
pub mod factors;
pub mod metrics;
pub mod scoring;
pub mod session;
pub mod weights;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::config::AppConfig;
pub use crate::entropy::{calculate_entropy, EntropyVector};
pub use crate::error::DecisionError;
pub use crate::factors::{clean_decisions, parse_decisions, Factor, FactorSet, PerFactor};
pub use crate::scoring::{calculate_scores, score_report, ScoreReport, ScoreVector};
pub use crate::session::{Session, View};
pub use crate::weights::{check_weight_values, rebalance, validate_weights, WeightCheck, WeightVector};
