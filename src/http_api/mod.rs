use std::{collections::BTreeMap, net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::{
    AvailabilityRecord, BalanceReport, BuildError, BuildOutcome, BuilderConfig, Cadet,
    RosterBundle, Schedule, ScheduleBuilder, check_balance, persistence::validate_bundle,
};

#[derive(Clone)]
pub struct AppState {
    schedules: Arc<RwLock<BTreeMap<String, Schedule>>>,
    config: Arc<BuilderConfig>,
}

impl AppState {
    pub fn new(config: BuilderConfig) -> Self {
        Self {
            schedules: Arc::new(RwLock::new(BTreeMap::new())),
            config: Arc::new(config),
        }
    }

    fn schedules(&self) -> Arc<RwLock<BTreeMap<String, Schedule>>> {
        self.schedules.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }

    fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<BuildError> for ApiError {
    fn from(value: BuildError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct BuildRequest {
    #[serde(flatten)]
    bundle: RosterBundle,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct BalanceRequest {
    #[serde(default)]
    roster: Vec<Cadet>,
    #[serde(default)]
    availability: Vec<AvailabilityRecord>,
}

#[derive(Debug, Serialize)]
struct ScheduleSummary {
    id: String,
    name: String,
    days: usize,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/schedules", get(list_schedules))
        .route("/schedules/build", post(build_schedule))
        .route("/schedules/:id", get(get_schedule).delete(delete_schedule))
        .route("/schedules/:id/balance", post(schedule_balance))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, config: BuilderConfig) -> std::io::Result<()> {
    let app = router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "http api listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_schedules(State(state): State<AppState>) -> Json<Vec<ScheduleSummary>> {
    let schedules = state.schedules();
    let summaries = {
        let guard = schedules.read();
        guard
            .values()
            .map(|s| ScheduleSummary {
                id: s.id.clone(),
                name: s.name.clone(),
                days: s.assignments.len(),
            })
            .collect()
    };
    Json(summaries)
}

/// Runs the builder on a blocking worker so the runtime threads stay free,
/// then stores the result under the schedule id.
async fn build_schedule(
    State(state): State<AppState>,
    Json(request): Json<BuildRequest>,
) -> Result<(StatusCode, Json<BuildOutcome>), ApiError> {
    let mut config = (*state.config).clone();
    if let Some(seed) = request.seed {
        config.seed = Some(seed);
    }
    let bundle = request.bundle;
    validate_bundle(&bundle).map_err(|err| ApiError::invalid(err.to_string()))?;
    let outcome = tokio::task::spawn_blocking(move || {
        ScheduleBuilder::new(config).build(&bundle.schedule, &bundle.roster, &bundle.availability)
    })
    .await
    .map_err(|err| {
        error!(error = %err, "build task failed");
        ApiError::internal(format!("build task failed: {err}"))
    })??;

    let schedules = state.schedules();
    {
        let mut guard = schedules.write();
        guard.insert(outcome.schedule.id.clone(), outcome.schedule.clone());
    }
    Ok((StatusCode::CREATED, Json(outcome)))
}

async fn get_schedule(
    State(state): State<AppState>,
    Path(schedule_id): Path<String>,
) -> Result<Json<Schedule>, ApiError> {
    let schedules = state.schedules();
    let found = {
        let guard = schedules.read();
        guard.get(&schedule_id).cloned()
    };
    found
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("schedule {schedule_id} not found")))
}

async fn delete_schedule(
    State(state): State<AppState>,
    Path(schedule_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let schedules = state.schedules();
    let removed = {
        let mut guard = schedules.write();
        guard.remove(&schedule_id)
    };
    if removed.is_none() {
        return Err(ApiError::not_found(format!(
            "schedule {schedule_id} not found"
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn schedule_balance(
    State(state): State<AppState>,
    Path(schedule_id): Path<String>,
    Json(request): Json<BalanceRequest>,
) -> Result<Json<BalanceReport>, ApiError> {
    let schedules = state.schedules();
    let schedule = {
        let guard = schedules.read();
        guard.get(&schedule_id).cloned()
    }
    .ok_or_else(|| ApiError::not_found(format!("schedule {schedule_id} not found")))?;

    if request.roster.is_empty() {
        return Err(ApiError::invalid("roster must not be empty"));
    }
    let report = check_balance(
        &schedule,
        &request.roster,
        &request.availability,
        &state.config,
    )?;
    Ok(Json(report))
}
