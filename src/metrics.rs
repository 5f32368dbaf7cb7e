use axum::{routing::get, Router};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

use crate::error::DecisionError;

pub const CALCULATIONS_TOTAL: &str = "ldc_calculations_total";
pub const REBALANCES_TOTAL: &str = "ldc_weight_rebalances_total";
pub const ERRORS_TOTAL: &str = "ldc_errors_total";
pub const DECISIONS_GAUGE: &str = "ldc_session_decisions";

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(CALCULATIONS_TOTAL, "Successful score calculations.");
        describe_counter!(
            REBALANCES_TOTAL,
            "Weight edits that pushed the total above 1 and were reduced."
        );
        describe_counter!(ERRORS_TOTAL, "User-facing errors, labelled by code.");
        describe_gauge!(DECISIONS_GAUGE, "Decisions in the current session.");
    });
}

pub fn record_calculation(decisions: usize) {
    counter!(CALCULATIONS_TOTAL).increment(1);
    gauge!(DECISIONS_GAUGE).set(decisions as f64);
}

pub fn record_rebalance() {
    counter!(REBALANCES_TOTAL).increment(1);
}

pub fn record_error(err: &DecisionError) {
    counter!(ERRORS_TOTAL, "code" => err.code()).increment(1);
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. Fails if one is already installed.
    pub fn init() -> anyhow::Result<Self> {
        // Use default buckets to avoid API differences across crate versions.
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| anyhow::anyhow!("prometheus: install recorder: {e}"))?;
        ensure_metrics_described();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
