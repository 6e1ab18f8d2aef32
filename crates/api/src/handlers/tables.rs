use axum::extract::State;
use axum::Json;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /tables
pub async fn list_tables(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(syncbridge_db::list_tables(&state.pool).await?))
}
