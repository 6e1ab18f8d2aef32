use axum::routing::get;
use axum::Router;

use crate::handlers::tables;
use crate::state::AppState;

/// Diagnostic introspection of the backing database.
///
/// ```text
/// GET /tables   -> list_tables
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/tables", get(tables::list_tables))
}
