//! Route hierarchy:
//!
//! ```text
//! /contacts/                         create (POST), list all (GET)
//! /contacts/{contact_id}             get properties (GET)
//!
//! /clickup/tasks/                    create task (POST)
//!
//! /sync_contacts/                    start run (POST), list runs (GET)
//! /sync_contacts/{run_id}            run status (GET)
//! /sync_contacts/{run_id}/cancel     cancel run (POST)
//!
//! /history-log-requests/             append (POST), list all (GET)
//!
//! /tables                            table names (GET)
//! ```

pub mod clickup;
pub mod contacts;
pub mod health;
pub mod history;
pub mod sync;
pub mod tables;

use axum::Router;

use crate::state::AppState;

/// Routes that proxy a call to HubSpot or ClickUp.
///
/// Outbound calls have no deadline, so these must not sit behind the
/// inbound request timeout.
pub fn platform_routes() -> Router<AppState> {
    Router::new()
        .merge(contacts::router())
        .merge(clickup::router())
}

/// Routes served from local state and the database.
pub fn local_routes() -> Router<AppState> {
    Router::new()
        .merge(sync::router())
        .merge(history::router())
        .merge(tables::router())
}
