//! Handlers for the outbound request history.
//!
//! Persistence failures are reported in the body as `{ "error": ... }`
//! with a 200 status rather than as an HTTP fault.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use syncbridge_db::models::history_log::CreateHistoryLog;
use syncbridge_db::repositories::HistoryLogRepo;

use crate::state::AppState;

/// POST /history-log-requests/
pub async fn create_history_log_request(
    State(state): State<AppState>,
    Json(input): Json<CreateHistoryLog>,
) -> Json<Value> {
    match HistoryLogRepo::create(&state.pool, &input).await {
        Ok(row) => Json(json!({
            "message": "History log entry created",
            "id": row.id,
        })),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to store history log entry");
            Json(json!({ "error": e.to_string() }))
        }
    }
}

/// GET /history-log-requests/
pub async fn list_history_log_requests(State(state): State<AppState>) -> Json<Value> {
    match HistoryLogRepo::list_all(&state.pool).await {
        Ok(rows) => Json(json!(rows)),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read history log entries");
            Json(json!({ "error": e.to_string() }))
        }
    }
}
