use axum::routing::post;
use axum::Router;

use crate::handlers::clickup;
use crate::state::AppState;

/// ```text
/// POST /clickup/tasks/   -> create_task
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/clickup/tasks/", post(clickup::create_task))
}
