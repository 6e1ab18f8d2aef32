//! Route definitions for background contact synchronization.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::sync;
use crate::state::AppState;

/// ```text
/// POST /sync_contacts/                  -> trigger_sync
/// GET  /sync_contacts/                  -> list_runs
/// GET  /sync_contacts/{run_id}          -> get_run
/// POST /sync_contacts/{run_id}/cancel   -> cancel_run
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/sync_contacts/",
            post(sync::trigger_sync).get(sync::list_runs),
        )
        .route("/sync_contacts/{run_id}", get(sync::get_run))
        .route("/sync_contacts/{run_id}/cancel", post(sync::cancel_run))
}
