//! Submission intake, status query, and manual reprocess routes.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use uuid::Uuid;

use herald_common::error::AppError;
use herald_common::types::{DeliveryJob, SubmissionPayload};
use herald_engine::intake;

use crate::state::AppState;
use crate::validate;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/submissions", post(create_submission))
        .route("/api/submissions/{id}", get(get_submission))
        .route("/api/submissions/{id}/reprocess", post(reprocess_submission))
}

/// POST /api/submissions — accept a form submission.
///
/// The notification attempt itself is fire-and-forget: a notifier outage
/// never fails the intake call. Only validation and storage errors reach
/// the submitter.
async fn create_submission(
    State(state): State<AppState>,
    Json(payload): Json<SubmissionPayload>,
) -> Result<Json<serde_json::Value>, AppError> {
    validate::submission(&payload)?;

    let job = intake::accept(
        &state.store,
        &state.executor,
        payload,
        &state.config.environment,
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "job_id": job.id,
        "status": job.status,
        "message": "Submission received successfully"
    })))
}

/// GET /api/submissions/:id — current delivery state of a job.
///
/// Failed jobs stay queryable; `error_message` is the only retained
/// diagnostic.
async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeliveryJob>, AppError> {
    let id = parse_id(&id)?;
    let job = state.store.get_by_id(id).await?;
    Ok(Json(job))
}

/// POST /api/submissions/:id/reprocess — operator-triggered recovery.
///
/// Resets the attempt history and runs one delivery attempt immediately,
/// independent of the sweep cadence.
async fn reprocess_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = parse_id(&id)?;

    // 404 before mutating anything.
    state.store.get_by_id(id).await?;

    state.store.reset(id).await?;
    let outcome = state
        .executor
        .execute(id, &state.config.environment)
        .await?;
    let job = state.store.get_by_id(id).await?;

    Ok(Json(json!({
        "success": true,
        "job_id": id,
        "outcome": outcome.to_string(),
        "status": job.status,
    })))
}

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("Invalid job id '{}'", raw)))
}
