use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Map, Value};
use sqlx::PgPool;
use syncbridge_core::contact::{ContactRecord, NewContact, NewTask, TaskCreateResponse};
use syncbridge_core::request_log::RequestLogMode;
use syncbridge_platforms::{CrmClient, PlatformError, TaskBoardClient};
use syncbridge_sync::SyncRunner;
use tokio::sync::Notify;
use tower::ServiceExt;

use syncbridge_api::config::ServerConfig;
use syncbridge_api::router::build_app_router;
use syncbridge_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        secrets_path: "secrets.json".to_string(),
        hubspot_api_base: "http://127.0.0.1:1".to_string(),
        clickup_api_base: "http://127.0.0.1:1".to_string(),
        request_log_mode: RequestLogMode::Disabled,
        clickup_success_statuses: vec![200],
        db_max_connections: 5,
    }
}

/// Shared state backed by in-memory platform fakes.
pub fn test_state(pool: PgPool, crm: Arc<StubCrm>, board: Arc<StubBoard>) -> AppState {
    AppState {
        pool,
        crm: crm.clone(),
        task_board: board.clone(),
        sync_runner: Arc::new(SyncRunner::new(crm, board)),
    }
}

/// The production router around the given state.
pub fn app(state: AppState) -> Router {
    build_app_router(state, &test_config())
}

/// Like [`app`], with a custom inbound request timeout.
pub fn app_with_timeout(state: AppState, request_timeout_secs: u64) -> Router {
    let config = ServerConfig {
        request_timeout_secs,
        ..test_config()
    };
    build_app_router(state, &config)
}

/// Router with empty fakes, for endpoints that only touch the database.
pub fn build_test_app(pool: PgPool) -> Router {
    app(test_state(
        pool,
        Arc::new(StubCrm::default()),
        Arc::new(StubBoard::answering(200)),
    ))
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Platform fakes
// ---------------------------------------------------------------------------

/// CRM fake answering from fixed data.
#[derive(Default)]
pub struct StubCrm {
    pub contacts: Vec<ContactRecord>,
    /// Profile properties by contact id; unknown ids answer 404.
    pub profiles: HashMap<String, Value>,
    /// Upstream status and body returned by `create_contact` instead of success.
    pub create_failure: Option<(u16, Value)>,
    /// When set, listing waits for a notification before answering.
    pub gate: Option<Arc<Notify>>,
    pub created: Mutex<Vec<NewContact>>,
}

impl StubCrm {
    pub fn with_pending(ids: &[&str]) -> Self {
        let mut crm = Self::default();
        for id in ids {
            crm.contacts.push(
                serde_json::from_value(json!({
                    "id": id,
                    "properties": {
                        "firstname": format!("First{id}"),
                        "lastname": format!("Last{id}"),
                        "company": "Acme",
                        "email": format!("{id}@example.test")
                    }
                }))
                .unwrap(),
            );
            crm.profiles
                .insert(id.to_string(), json!({ "estado_clickup": "pending" }));
        }
        crm
    }

    pub fn created(&self) -> Vec<NewContact> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl CrmClient for StubCrm {
    async fn create_contact(&self, contact: &NewContact) -> Result<Value, PlatformError> {
        if let Some((status, body)) = &self.create_failure {
            return Err(PlatformError::Upstream {
                status: *status,
                body: body.clone(),
            });
        }
        self.created.lock().unwrap().push(contact.clone());
        Ok(json!({ "vid": 501, "properties": contact.to_properties() }))
    }

    async fn get_contact(&self, contact_id: &str) -> Result<Map<String, Value>, PlatformError> {
        match self.profiles.get(contact_id) {
            Some(Value::Object(properties)) => Ok(properties.clone()),
            Some(_) => Err(PlatformError::Upstream {
                status: 500,
                body: json!({ "message": "internal" }),
            }),
            None => Err(PlatformError::NotFound),
        }
    }

    async fn list_all_contacts(&self) -> Result<Vec<ContactRecord>, PlatformError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        Ok(self.contacts.clone())
    }
}

/// Task board fake answering with a fixed status.
pub struct StubBoard {
    pub status_code: u16,
    /// Time spent before answering.
    pub delay: Option<Duration>,
    pub tasks: Mutex<Vec<NewTask>>,
}

impl StubBoard {
    pub fn answering(status_code: u16) -> Self {
        Self {
            status_code,
            delay: None,
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn tasks(&self) -> Vec<NewTask> {
        self.tasks.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskBoardClient for StubBoard {
    async fn create_task(&self, task: &NewTask) -> TaskCreateResponse {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.tasks.lock().unwrap().push(task.clone());
        TaskCreateResponse {
            status_code: self.status_code,
            data: json!({ "id": "abc", "name": task.name }),
        }
    }

    fn is_success(&self, status_code: u16) -> bool {
        status_code == 200
    }
}
