//! In-memory platform fakes for orchestrator and runner tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use syncbridge_core::contact::{ContactRecord, NewContact, NewTask, TaskCreateResponse};
use syncbridge_platforms::{CrmClient, PlatformError, TaskBoardClient};
use tokio::sync::Notify;

/// Per-contact response of the fake profile endpoint.
pub enum Profile {
    Status(&'static str),
    NoStatus,
    NotFound,
    Upstream(u16),
}

#[derive(Default)]
pub struct FakeCrm {
    pub contacts: Vec<ContactRecord>,
    pub profiles: HashMap<String, Profile>,
    pub listing_fails: bool,
    pub listing_panics: bool,
    /// When set, listing waits for a notification before answering.
    pub gate: Option<Notify>,
    pub fetched: Mutex<Vec<String>>,
}

impl FakeCrm {
    pub fn with_contacts(contacts: Vec<(Option<&str>, Profile)>) -> Self {
        let mut crm = Self::default();
        for (id, profile) in contacts {
            crm.contacts.push(contact(id));
            if let Some(id) = id {
                crm.profiles.insert(id.to_string(), profile);
            }
        }
        crm
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

/// Listing record whose names are derived from the id.
pub fn contact(id: Option<&str>) -> ContactRecord {
    let tag = id.unwrap_or("anon");
    serde_json::from_value(json!({
        "id": id,
        "properties": {
            "firstname": format!("First{tag}"),
            "lastname": format!("Last{tag}"),
            "company": format!("Co{tag}"),
            "email": format!("{tag}@example.test")
        }
    }))
    .unwrap()
}

#[async_trait]
impl CrmClient for FakeCrm {
    async fn create_contact(&self, _contact: &NewContact) -> Result<Value, PlatformError> {
        Ok(json!({ "id": "new" }))
    }

    async fn get_contact(&self, contact_id: &str) -> Result<Map<String, Value>, PlatformError> {
        self.fetched.lock().unwrap().push(contact_id.to_string());
        match self.profiles.get(contact_id) {
            Some(Profile::Status(status)) => Ok(json!({
                "estado_clickup": { "value": status, "versions": [] }
            })
            .as_object()
            .cloned()
            .unwrap()),
            Some(Profile::NoStatus) => Ok(Map::new()),
            Some(Profile::Upstream(status)) => Err(PlatformError::Upstream {
                status: *status,
                body: json!({ "message": "boom" }),
            }),
            Some(Profile::NotFound) | None => Err(PlatformError::NotFound),
        }
    }

    async fn list_all_contacts(&self) -> Result<Vec<ContactRecord>, PlatformError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.listing_panics {
            panic!("listing exploded");
        }
        if self.listing_fails {
            return Err(PlatformError::Upstream {
                status: 503,
                body: json!("unavailable"),
            });
        }
        Ok(self.contacts.clone())
    }
}

/// Task board that records every task and answers with a fixed status.
pub struct FakeBoard {
    pub status_code: u16,
    pub tasks: Mutex<Vec<NewTask>>,
}

impl FakeBoard {
    pub fn answering(status_code: u16) -> Self {
        Self {
            status_code,
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn tasks(&self) -> Vec<NewTask> {
        self.tasks.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskBoardClient for FakeBoard {
    async fn create_task(&self, task: &NewTask) -> TaskCreateResponse {
        self.tasks.lock().unwrap().push(task.clone());
        TaskCreateResponse {
            status_code: self.status_code,
            data: json!({ "id": "task" }),
        }
    }

    fn is_success(&self, status_code: u16) -> bool {
        status_code == 200
    }
}
