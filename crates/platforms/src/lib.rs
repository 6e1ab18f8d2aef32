//! HTTP clients for the external CRM (HubSpot) and task board (ClickUp).
//!
//! Both clients report every successful upstream call to a
//! [`RequestLogSink`](syncbridge_core::request_log::RequestLogSink).
//! The [`CrmClient`] and [`TaskBoardClient`] traits are the seams the sync
//! orchestrator and the HTTP handlers depend on.

use async_trait::async_trait;
use serde_json::{Map, Value};
use syncbridge_core::contact::{ContactRecord, NewContact, NewTask, TaskCreateResponse};

pub mod clickup;
pub mod error;
pub mod hubspot;
mod response;

pub use clickup::ClickUpClient;
pub use error::PlatformError;
pub use hubspot::HubSpotClient;

/// Contact operations on the CRM platform.
#[async_trait]
pub trait CrmClient: Send + Sync {
    /// Create a contact. Succeeds only on upstream `201 Created`.
    async fn create_contact(&self, contact: &NewContact) -> Result<Value, PlatformError>;

    /// Fetch one contact and return only its `properties` object.
    async fn get_contact(&self, contact_id: &str) -> Result<Map<String, Value>, PlatformError>;

    /// Drain the paginated contact listing into memory.
    async fn list_all_contacts(&self) -> Result<Vec<ContactRecord>, PlatformError>;
}

/// Task operations on the task-board platform.
#[async_trait]
pub trait TaskBoardClient: Send + Sync {
    /// Create a task. Never fails: every outcome is reported in the envelope.
    async fn create_task(&self, task: &NewTask) -> TaskCreateResponse;

    /// Whether `status_code` counts as a successful task creation.
    fn is_success(&self, status_code: u16) -> bool;
}
