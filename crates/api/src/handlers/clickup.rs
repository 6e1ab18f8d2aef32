use axum::extract::State;
use axum::Json;
use syncbridge_core::contact::{NewTask, TaskCreateResponse};

use crate::state::AppState;

/// POST /clickup/tasks/
///
/// Always answers 200; the ClickUp outcome is in `status_code` / `data`.
pub async fn create_task(
    State(state): State<AppState>,
    Json(input): Json<NewTask>,
) -> Json<TaskCreateResponse> {
    Json(state.task_board.create_task(&input).await)
}
