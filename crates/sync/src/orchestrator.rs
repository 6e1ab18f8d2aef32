//! Single-pass contact synchronization.
//!
//! The pass drains the CRM listing, then walks the contacts strictly in
//! order. Each contact yields exactly one [`ContactOutcome`]; a failure on
//! one contact never stops the batch. Only a failure of the listing itself
//! aborts the pass.

use serde::Serialize;
use serde_json::{Map, Value};
use syncbridge_core::contact::{
    property_text, ContactRecord, NewTask, PENDING_STATUS, STATUS_PROPERTY, SYNC_TASK_PRIORITY,
};
use syncbridge_platforms::{CrmClient, PlatformError, TaskBoardClient};

/// Failure that aborts a whole pass.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Failed to list CRM contacts: {0}")]
    Listing(#[from] PlatformError),
}

/// Why a contact was left alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The listing entry carried no id.
    MissingId,
    /// The contact has no status property.
    MissingStatus,
    /// The status is something other than `pending`.
    NotPending { status: String },
}

/// Result of processing one contact.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ContactOutcome {
    TaskCreated {
        contact_id: String,
        email: String,
        status_code: u16,
    },
    /// The task board answered with a non-success status.
    TaskRejected {
        contact_id: String,
        email: String,
        status_code: u16,
        data: Value,
    },
    Skipped {
        contact_id: Option<String>,
        reason: SkipReason,
    },
    Failed {
        contact_id: String,
        error: String,
    },
}

/// Aggregate of one pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncSummary {
    pub total: usize,
    pub created: usize,
    pub rejected: usize,
    pub skipped: usize,
    pub failed: usize,
    pub outcomes: Vec<ContactOutcome>,
}

impl SyncSummary {
    fn record(&mut self, outcome: ContactOutcome) {
        match &outcome {
            ContactOutcome::TaskCreated { .. } => self.created += 1,
            ContactOutcome::TaskRejected { .. } => self.rejected += 1,
            ContactOutcome::Skipped { .. } => self.skipped += 1,
            ContactOutcome::Failed { .. } => self.failed += 1,
        }
        self.outcomes.push(outcome);
    }
}

/// Run one synchronization pass.
pub async fn sync_contacts(
    crm: &dyn CrmClient,
    board: &dyn TaskBoardClient,
) -> Result<SyncSummary, SyncError> {
    let contacts = crm.list_all_contacts().await?;
    tracing::info!(contacts = contacts.len(), "Starting contact synchronization");

    let mut summary = SyncSummary {
        total: contacts.len(),
        ..SyncSummary::default()
    };

    for contact in &contacts {
        let outcome = process_contact(crm, board, contact).await;
        summary.record(outcome);
    }

    tracing::info!(
        total = summary.total,
        created = summary.created,
        rejected = summary.rejected,
        skipped = summary.skipped,
        failed = summary.failed,
        "Contact synchronization finished"
    );
    Ok(summary)
}

async fn process_contact(
    crm: &dyn CrmClient,
    board: &dyn TaskBoardClient,
    contact: &ContactRecord,
) -> ContactOutcome {
    let Some(contact_id) = contact.id.clone() else {
        tracing::warn!("Skipping contact without id");
        return ContactOutcome::Skipped {
            contact_id: None,
            reason: SkipReason::MissingId,
        };
    };

    let profile = match crm.get_contact(&contact_id).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!(contact_id = %contact_id, error = %e, "Failed to fetch contact");
            return ContactOutcome::Failed {
                contact_id,
                error: e.to_string(),
            };
        }
    };

    let Some(status) = property_text(&profile, STATUS_PROPERTY) else {
        tracing::info!(contact_id = %contact_id, "Skipping contact without sync status");
        return ContactOutcome::Skipped {
            contact_id: Some(contact_id),
            reason: SkipReason::MissingStatus,
        };
    };

    if status != PENDING_STATUS {
        tracing::info!(contact_id = %contact_id, status = %status, "Skipping contact not pending");
        return ContactOutcome::Skipped {
            contact_id: Some(contact_id),
            reason: SkipReason::NotPending { status },
        };
    }

    let task = task_for(contact, &profile);
    let email = field(contact, &profile, "email");
    let response = board.create_task(&task).await;

    if board.is_success(response.status_code) {
        tracing::info!(
            contact_id = %contact_id,
            email = %email,
            status_code = response.status_code,
            "Task created for pending contact"
        );
        ContactOutcome::TaskCreated {
            contact_id,
            email,
            status_code: response.status_code,
        }
    } else {
        tracing::warn!(
            contact_id = %contact_id,
            email = %email,
            status_code = response.status_code,
            "Task board rejected task for pending contact"
        );
        ContactOutcome::TaskRejected {
            contact_id,
            email,
            status_code: response.status_code,
            data: response.data,
        }
    }
}

/// Task for a pending contact: `"first last"`, `"company email"`, priority 3.
fn task_for(contact: &ContactRecord, profile: &Map<String, Value>) -> NewTask {
    NewTask {
        name: format!(
            "{} {}",
            field(contact, profile, "firstname"),
            field(contact, profile, "lastname")
        ),
        description: format!(
            "{} {}",
            field(contact, profile, "company"),
            field(contact, profile, "email")
        ),
        priority: SYNC_TASK_PRIORITY.to_string(),
    }
}

/// Listing properties first, then top-level listing fields, then the
/// fetched profile. Missing values read as `""`.
fn field(contact: &ContactRecord, profile: &Map<String, Value>, key: &str) -> String {
    property_text(&contact.properties, key)
        .or_else(|| property_text(&contact.extra, key))
        .or_else(|| property_text(profile, key))
        .unwrap_or_default()
}
