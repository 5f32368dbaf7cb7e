use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::charts::{self, BarAnimation, RadarChart};
use crate::config::AppConfig;
use crate::entropy::EntropyVector;
use crate::error::DecisionError;
use crate::export::{scores_to_csv, CSV_FILE_NAME, CSV_MIME};
use crate::factors::{clean_decisions, parse_decisions, Factor, FactorSet, PerFactor};
use crate::metrics;
use crate::scoring::{round2, score_report, ScoreReport};
use crate::session::{Session, SessionResults, SessionSnapshot};
use crate::weights::{check_weight_values, validate_weights, WeightCheck, WeightVector};

/// Shared state: one session per running instance.
#[derive(Clone)]
pub struct AppState {
    session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let session = Session::new(config, &mut rand::rng());
        Self::with_session(session)
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// Load config (LDC_CONFIG_PATH / config/app.toml) and start a fresh session.
    pub fn from_env() -> anyhow::Result<Self> {
        let cfg = AppConfig::load()?;
        Ok(Self::new(&cfg))
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        // a panicked handler cannot leave the session half-edited; keep serving
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/score", post(score_stateless))
        .route("/session", get(get_session))
        .route("/session/decisions", put(put_decisions))
        .route("/session/factors", put(put_factor))
        .route("/session/weights", get(get_weights).put(put_weight))
        .route("/session/calculate", post(calculate))
        .route("/session/back", post(back_to_inputs))
        .route("/session/results", get(get_results))
        .route("/session/results.csv", get(get_results_csv))
        .route("/session/charts/bar", get(get_bar_chart))
        .route("/session/charts/radar", get(get_radar_chart))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/* ----------------------------
Errors
---------------------------- */

#[derive(Debug)]
pub struct ApiError(DecisionError);

impl From<DecisionError> for ApiError {
    fn from(e: DecisionError) -> Self {
        metrics::record_error(&e);
        Self(e)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            DecisionError::NoResults => StatusCode::NOT_FOUND,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        let body = ErrorBody {
            error: self.0.to_string(),
            code: self.0.code(),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/* ----------------------------
Payloads
---------------------------- */

#[derive(Deserialize)]
struct DecisionsReq {
    text: String,
}

#[derive(Deserialize)]
struct FactorReq {
    index: usize,
    factor: Factor,
    score: u8,
}

#[derive(Deserialize)]
struct WeightReq {
    factor: Factor,
    value: f64,
}

#[derive(Deserialize)]
struct ScoreReq {
    /// Either a list of labels or one comma-separated string.
    decisions: DecisionsIn,
    factors: FactorSet,
    weights: WeightVector,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DecisionsIn {
    List(Vec<String>),
    Text(String),
}

#[derive(Debug, Serialize)]
pub struct ResultsOut {
    pub decisions: Vec<String>,
    /// Rounded to 2 decimals.
    pub scores: Vec<f64>,
    pub entropy: EntropyVector,
    pub contributions: Vec<PerFactor<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computed_at: Option<DateTime<Utc>>,
}

impl ResultsOut {
    fn from_report(decisions: Vec<String>, report: &ScoreReport, computed_at: Option<DateTime<Utc>>) -> Self {
        Self {
            best: report.best().and_then(|i| decisions.get(i).cloned()),
            scores: report.scores.iter().map(|s| round2(*s)).collect(),
            entropy: report.entropy,
            contributions: report.contributions.clone(),
            decisions,
            computed_at,
        }
    }
}

impl From<&SessionResults> for ResultsOut {
    fn from(r: &SessionResults) -> Self {
        Self::from_report(r.decisions.clone(), &r.report, Some(r.computed_at))
    }
}

/* ----------------------------
Handlers
---------------------------- */

async fn get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let s = state.session();
    Json(s.snapshot())
}

async fn put_decisions(State(state): State<AppState>, Json(body): Json<DecisionsReq>) -> ApiResult<SessionSnapshot> {
    let mut s = state.session();
    s.set_decisions(&body.text, &mut rand::rng())?;
    Ok(Json(s.snapshot()))
}

async fn put_factor(State(state): State<AppState>, Json(body): Json<FactorReq>) -> ApiResult<SessionSnapshot> {
    let mut s = state.session();
    s.set_factor_score(body.index, body.factor, body.score)?;
    Ok(Json(s.snapshot()))
}

async fn get_weights(State(state): State<AppState>) -> Json<WeightCheck> {
    let check = state.session().weight_check();
    Json(check)
}

async fn put_weight(State(state): State<AppState>, Json(body): Json<WeightReq>) -> ApiResult<WeightCheck> {
    let check = state.session().set_weight(body.factor, body.value)?;
    Ok(Json(check))
}

async fn calculate(State(state): State<AppState>) -> ApiResult<ResultsOut> {
    let mut s = state.session();
    let results = s.calculate()?;
    Ok(Json(ResultsOut::from(results)))
}

async fn back_to_inputs(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let mut s = state.session();
    s.back_to_inputs();
    Json(s.snapshot())
}

async fn get_results(State(state): State<AppState>) -> ApiResult<ResultsOut> {
    let s = state.session();
    let results = s.results().ok_or(DecisionError::NoResults)?;
    Ok(Json(ResultsOut::from(results)))
}

async fn get_results_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let s = state.session();
    let results = s.results().ok_or(DecisionError::NoResults)?;
    let csv = scores_to_csv(&results.decisions, results.scores());
    let disposition = format!("attachment; filename=\"{CSV_FILE_NAME}\"");
    Ok((
        [
            (header::CONTENT_TYPE, CSV_MIME.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

async fn get_bar_chart(State(state): State<AppState>) -> ApiResult<BarAnimation> {
    let s = state.session();
    let results = s.results().ok_or(DecisionError::NoResults)?;
    Ok(Json(charts::bar_growth(&results.decisions, results.scores())))
}

async fn get_radar_chart(State(state): State<AppState>) -> ApiResult<RadarChart> {
    let s = state.session();
    let results = s.results().ok_or(DecisionError::NoResults)?;
    Ok(Json(charts::radar(&results.decisions, &results.factors)))
}

/// Score without touching the session. Labels and weights get the same guards
/// the session applies, then the weights must pass the validity check.
async fn score_stateless(Json(body): Json<ScoreReq>) -> ApiResult<ResultsOut> {
    let decisions = match body.decisions {
        DecisionsIn::List(list) => clean_decisions(list)?,
        DecisionsIn::Text(text) => parse_decisions(&text),
    };
    if decisions.is_empty() {
        return Err(DecisionError::NoDecisions.into());
    }
    if decisions.len() != body.factors.num_decisions() {
        return Err(DecisionError::DecisionCountMismatch {
            decisions: decisions.len(),
            values: body.factors.num_decisions(),
        }
        .into());
    }

    check_weight_values(&body.weights)?;
    validate_weights(&body.weights)?;
    let report = score_report(&body.factors, &body.weights)?;
    metrics::record_calculation(decisions.len());
    Ok(Json(ResultsOut::from_report(decisions, &report, None)))
}
