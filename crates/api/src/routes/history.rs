//! Route definitions for the outbound request history.

use axum::routing::get;
use axum::Router;

use crate::handlers::history;
use crate::state::AppState;

/// ```text
/// POST /history-log-requests/   -> create_history_log_request
/// GET  /history-log-requests/   -> list_history_log_requests
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/history-log-requests/",
        get(history::list_history_log_requests).post(history::create_history_log_request),
    )
}
