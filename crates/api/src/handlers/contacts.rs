//! Handlers for CRM contact endpoints.
//!
//! Thin pass-throughs to the [`CrmClient`](syncbridge_platforms::CrmClient);
//! upstream failures surface with the upstream status and body.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use syncbridge_core::contact::NewContact;
use validator::Validate;

use crate::error::AppResult;
use crate::state::AppState;

/// POST /contacts/
///
/// Create a contact in the CRM. Returns the CRM's JSON with 201.
pub async fn create_contact(
    State(state): State<AppState>,
    Json(input): Json<NewContact>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let created = state.crm.create_contact(&input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /contacts/
///
/// Every contact, with all listing pages drained.
pub async fn list_contacts(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let contacts = state.crm.list_all_contacts().await?;
    Ok(Json(contacts))
}

/// GET /contacts/{contact_id}
///
/// The contact's properties map only.
pub async fn get_contact(
    State(state): State<AppState>,
    Path(contact_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let properties = state.crm.get_contact(&contact_id).await?;
    Ok(Json(properties))
}
