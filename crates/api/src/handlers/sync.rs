//! Handlers for background contact synchronization.
//!
//! Triggering returns as soon as the run is spawned; the run's progress is
//! observable through the run endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use syncbridge_core::error::CoreError;
use uuid::Uuid;

use crate::error::AppResult;
use crate::state::AppState;

/// Acknowledgement returned when a run is started.
#[derive(Debug, Serialize)]
pub struct SyncTriggered {
    pub message: &'static str,
    pub run_id: Uuid,
}

fn run_not_found(id: Uuid) -> CoreError {
    CoreError::NotFound(format!("Sync run {id} not found"))
}

/// POST /sync_contacts/
pub async fn trigger_sync(State(state): State<AppState>) -> impl IntoResponse {
    let run_id = state.sync_runner.start().await;
    (
        StatusCode::ACCEPTED,
        Json(SyncTriggered {
            message: "Contact synchronization started; this may take a while",
            run_id,
        }),
    )
}

/// GET /sync_contacts/
pub async fn list_runs(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.sync_runner.list().await)
}

/// GET /sync_contacts/{run_id}
pub async fn get_run(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let snapshot = state
        .sync_runner
        .status(run_id)
        .await
        .ok_or_else(|| run_not_found(run_id))?;
    Ok(Json(snapshot))
}

/// POST /sync_contacts/{run_id}/cancel
///
/// Returns the run's snapshot after requesting cancellation.
pub async fn cancel_run(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    if !state.sync_runner.cancel(run_id).await {
        return Err(run_not_found(run_id).into());
    }
    let snapshot = state
        .sync_runner
        .status(run_id)
        .await
        .ok_or_else(|| run_not_found(run_id))?;
    Ok(Json(snapshot))
}
