//! Life Decision Calculator — Binary Entrypoint
//! Boots the Axum HTTP server: config, one session, routes and /metrics.

use life_decision_calculator::{api, metrics::Metrics, AppState};
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - LDC_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("LDC_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("life_decision_calculator=debug,info"));

    // Shuttle may already have installed a subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let state = AppState::from_env()?;
    let mut router = api::create_router(state);

    match Metrics::init() {
        Ok(m) => router = router.merge(m.router()),
        Err(e) => tracing::warn!(error = %e, "metrics disabled"),
    }

    tracing::info!("life decision calculator ready");
    Ok(router.into())
}
