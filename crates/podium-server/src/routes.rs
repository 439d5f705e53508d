// crates/podium-server/src/routes.rs
// ============================================================================
// Module: API Routes
// Description: Axum handlers for the leaderboard HTTP API.
// Purpose: Bind HTTP verbs and paths to leaderboard service operations.
// Dependencies: axum, podium-core, tokio, tracing
// ============================================================================

//! ## Overview
//! Handlers validate wire input first, then run store work on the Tokio
//! blocking pool so `SQLite` I/O never stalls the async reactor. Every
//! handler except the liveness probe records one counter event and one
//! latency observation per request.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use tokio::task::JoinError;

use podium_config::LimitsConfig;

use crate::dto::CheckResponse;
use crate::dto::EntryResponse;
use crate::dto::StatusResponse;
use crate::dto::SubmitRequest;
use crate::dto::SubmitResponse;
use crate::dto::TopParams;
use crate::error::ApiError;
use crate::server::ServerState;
use crate::telemetry::ApiMetricEvent;
use crate::telemetry::ApiOutcome;
use crate::telemetry::ApiRoute;

// ============================================================================
// SECTION: Leaderboard Handlers
// ============================================================================

/// Handles `POST /leaderboard/submit`.
pub async fn handle_submit(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Response {
    let started = Instant::now();
    let result = submit_inner(&state, payload).await;
    respond(&state, ApiRoute::Submit, started, result)
}

/// Runs the submit pipeline and maps failures to API errors.
async fn submit_inner(
    state: &Arc<ServerState>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) =
        payload.map_err(|rejection| ApiError::InvalidInput(rejection.body_text()))?;
    let now = state.clock.now();
    let state = Arc::clone(state);
    let receipt = tokio::task::spawn_blocking(move || {
        state.service.submit(&request.name, request.score, now)
    })
    .await
    .map_err(task_failure)??;
    let body = SubmitResponse::from_receipt(receipt)?;
    Ok((StatusCode::OK, Json(body)).into_response())
}

/// Handles `GET /leaderboard/top`.
pub async fn handle_top(
    State(state): State<Arc<ServerState>>,
    params: Result<Query<TopParams>, QueryRejection>,
) -> Response {
    let started = Instant::now();
    let result = top_inner(&state, params).await;
    respond(&state, ApiRoute::Top, started, result)
}

/// Runs the top query pipeline and maps failures to API errors.
async fn top_inner(
    state: &Arc<ServerState>,
    params: Result<Query<TopParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) =
        params.map_err(|rejection| ApiError::InvalidInput(rejection.body_text()))?;
    let limit = resolve_limit(params.limit, state.limits)?;
    let state = Arc::clone(state);
    let entries = tokio::task::spawn_blocking(move || state.service.top(limit))
        .await
        .map_err(task_failure)??;
    let mut rows = Vec::with_capacity(entries.len());
    for entry in entries {
        rows.push(EntryResponse::from_entry(entry)?);
    }
    Ok((StatusCode::OK, Json(rows)).into_response())
}

/// Handles `GET /leaderboard/check/{name}`.
pub async fn handle_check(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
) -> Response {
    let started = Instant::now();
    let result = check_inner(&state, name).await;
    respond(&state, ApiRoute::Check, started, result)
}

/// Runs the existence check pipeline and maps failures to API errors.
async fn check_inner(state: &Arc<ServerState>, name: String) -> Result<Response, ApiError> {
    let state = Arc::clone(state);
    let exists = tokio::task::spawn_blocking(move || state.service.exists(&name))
        .await
        .map_err(task_failure)??;
    Ok((StatusCode::OK, Json(CheckResponse { exists })).into_response())
}

// ============================================================================
// SECTION: Probe Handlers
// ============================================================================

/// Handles `GET /healthz`.
pub async fn handle_health() -> Response {
    (StatusCode::OK, Json(StatusResponse { status: "ok" })).into_response()
}

/// Handles `GET /readyz`.
pub async fn handle_ready(State(state): State<Arc<ServerState>>) -> Response {
    let started = Instant::now();
    let readiness = Arc::clone(&state.readiness);
    let probe = tokio::task::spawn_blocking(move || readiness.check()).await;
    let (outcome, response) = match probe {
        Ok(Ok(())) => (
            ApiOutcome::Ok,
            (StatusCode::OK, Json(StatusResponse { status: "ready" })).into_response(),
        ),
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "readiness probe failed");
            (ApiOutcome::Error, unavailable_response())
        }
        Err(err) => {
            tracing::error!(error = %err, "readiness task failed");
            (ApiOutcome::Error, unavailable_response())
        }
    };
    let event = ApiMetricEvent { route: ApiRoute::Ready, outcome };
    state.metrics.record_request(event);
    state.metrics.record_latency(event, started.elapsed());
    response
}

/// Builds the 503 readiness response body.
fn unavailable_response() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, Json(StatusResponse { status: "unavailable" }))
        .into_response()
}

// ============================================================================
// SECTION: Shared Helpers
// ============================================================================

/// Resolves the requested page size against configured limits.
fn resolve_limit(requested: Option<usize>, limits: LimitsConfig) -> Result<usize, ApiError> {
    match requested {
        None => Ok(limits.default_top_limit),
        Some(0) => Err(ApiError::InvalidInput("limit must be greater than zero".to_string())),
        Some(limit) if limit > limits.max_top_limit => Err(ApiError::InvalidInput(format!(
            "limit must not exceed {}",
            limits.max_top_limit
        ))),
        Some(limit) => Ok(limit),
    }
}

/// Maps a blocking task failure to an opaque API error.
fn task_failure(err: JoinError) -> ApiError {
    tracing::error!(error = %err, "blocking leaderboard task failed");
    ApiError::Internal
}

/// Records telemetry for the finished request and renders the response.
fn respond(
    state: &ServerState,
    route: ApiRoute,
    started: Instant,
    result: Result<Response, ApiError>,
) -> Response {
    let (outcome, response) = match result {
        Ok(response) => (ApiOutcome::Ok, response),
        Err(err) => (err.outcome(), err.into_response()),
    };
    let event = ApiMetricEvent { route, outcome };
    state.metrics.record_request(event);
    state.metrics.record_latency(event, started.elapsed());
    response
}
