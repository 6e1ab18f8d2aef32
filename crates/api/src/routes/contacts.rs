//! Route definitions for CRM contacts.

use axum::routing::get;
use axum::Router;

use crate::handlers::contacts;
use crate::state::AppState;

/// ```text
/// POST /contacts/               -> create_contact
/// GET  /contacts/               -> list_contacts
/// GET  /contacts/{contact_id}   -> get_contact
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/contacts/",
            get(contacts::list_contacts).post(contacts::create_contact),
        )
        .route("/contacts/{contact_id}", get(contacts::get_contact))
}
