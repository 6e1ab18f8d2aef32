use std::sync::Arc;

use syncbridge_platforms::{CrmClient, TaskBoardClient};
use syncbridge_sync::SyncRunner;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: syncbridge_db::DbPool,
    /// CRM (HubSpot) client.
    pub crm: Arc<dyn CrmClient>,
    /// Task-board (ClickUp) client.
    pub task_board: Arc<dyn TaskBoardClient>,
    /// Background synchronization runs.
    pub sync_runner: Arc<SyncRunner>,
}
