//! JSON HTTP API for submitting and inspecting jobs.
//!
//! | Request          | Response                                   |
//! |------------------|--------------------------------------------|
//! | `POST /`         | `{"id": n}` once the job is admitted       |
//! | `GET /?id=n`     | the job, without its response body         |
//! | `GET /`          | the most recent jobs, oldest first         |
//!
//! Client mistakes are answered with `{"error": "..."}` and status 200.
//! Submissions that arrive or are still waiting for a queue slot once
//! shutdown begins get status 503.

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::scheduler::{JobId, SchedulerHandle};

pub const MISSING_URL: &str = "You need to specify an url";
pub const INVALID_JSON: &str = "You need to post a valid JSON";
pub const UNKNOWN_ID: &str = "There is no task with such ID";
pub const NON_NUMERIC_ID: &str = "ID must be a number";
pub const SHUTTING_DOWN: &str = "Service is shutting down";

#[derive(Clone)]
pub struct ApiState {
    pub scheduler: SchedulerHandle,
    pub list_limit: usize,
}

#[derive(Serialize)]
struct SubmitJobResponse {
    id: JobId,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}

fn error_response(status: StatusCode, error: &'static str) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(get_jobs_handler).post(submit_job_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve the API on `listener` until `shutdown` is cancelled.
///
/// Cancelling `shutdown` also closes the admission queue, so requests stalled
/// on a full queue are answered instead of holding the server open.
pub async fn serve(
    listener: TcpListener,
    state: ApiState,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(addr = %addr, "Starting API server");
    }

    let queue = state.scheduler.queue().clone();
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            queue.close();
        })
        .await
}

async fn get_jobs_handler(
    State(state): State<ApiState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(raw_id) = params.get("id") else {
        let jobs = state.scheduler.recent(state.list_limit).await;
        return Json(jobs).into_response();
    };

    let job = match parse_job_id(raw_id) {
        Ok(Some(id)) => state.scheduler.job(id).await,
        Ok(None) => None,
        Err(()) => return error_response(StatusCode::OK, NON_NUMERIC_ID),
    };

    match job {
        Some(job) => Json(job).into_response(),
        None => error_response(StatusCode::OK, UNKNOWN_ID),
    }
}

/// Parse an `id` query value as a signed integer of any size.
///
/// `Ok(None)` is an integer no job can have: negative, or beyond `JobId`.
fn parse_job_id(raw: &str) -> Result<Option<JobId>, ()> {
    let raw = raw.trim();
    let digits = raw.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(());
    }

    let negative = raw.starts_with('-');
    match digits.parse::<JobId>() {
        Ok(id) if !negative || id == 0 => Ok(Some(id)),
        _ => Ok(None),
    }
}

async fn submit_job_handler(State(state): State<ApiState>, body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected submission with invalid JSON");
            return error_response(StatusCode::OK, INVALID_JSON);
        }
    };

    let Some(url) = payload.get("url").and_then(Value::as_str) else {
        return error_response(StatusCode::OK, MISSING_URL);
    };

    match state.scheduler.submit(url).await {
        Ok(id) => Json(SubmitJobResponse { id }).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Submission turned away");
            error_response(StatusCode::SERVICE_UNAVAILABLE, SHUTTING_DOWN)
        }
    }
}
