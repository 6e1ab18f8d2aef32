//! ClickUp task-board client.
//!
//! Task creation never fails from the caller's point of view: every
//! outcome, including transport failures, comes back as a
//! [`TaskCreateResponse`]. Which upstream status counts as success is
//! configurable because the two historical variants of this call disagreed
//! (200 vs 201).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use syncbridge_core::contact::{NewTask, TaskCreateResponse};
use syncbridge_core::request_log::{LoggedRequest, RequestLogSink, RequestMethod};
use syncbridge_core::urls::{Platform, UrlResolver, CREATE_TASK_CLICKUP};

use crate::response::read_body;
use crate::TaskBoardClient;

/// Status ClickUp documents for a created task.
pub const DEFAULT_SUCCESS_STATUSES: &[u16] = &[200];

/// Status reported when the request never reached ClickUp.
const TRANSPORT_FAILURE_STATUS: u16 = 502;

/// Status reported when no endpoint could be resolved.
const UNRESOLVED_STATUS: u16 = 500;

/// HTTP client for the ClickUp API.
pub struct ClickUpClient {
    client: reqwest::Client,
    access_token: String,
    urls: Arc<UrlResolver>,
    request_log: Arc<dyn RequestLogSink>,
    success_statuses: Vec<u16>,
}

impl ClickUpClient {
    pub fn new(
        access_token: impl Into<String>,
        urls: Arc<UrlResolver>,
        request_log: Arc<dyn RequestLogSink>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token: access_token.into(),
            urls,
            request_log,
            success_statuses: DEFAULT_SUCCESS_STATUSES.to_vec(),
        }
    }

    /// Override the set of statuses treated as a successful creation.
    ///
    /// An empty set falls back to [`DEFAULT_SUCCESS_STATUSES`].
    pub fn with_success_statuses(mut self, statuses: Vec<u16>) -> Self {
        if !statuses.is_empty() {
            self.success_statuses = statuses;
        }
        self
    }
}

#[async_trait]
impl TaskBoardClient for ClickUpClient {
    async fn create_task(&self, task: &NewTask) -> TaskCreateResponse {
        let Some(url) = self.urls.resolve(Platform::ClickUp, CREATE_TASK_CLICKUP) else {
            tracing::error!(operation = CREATE_TASK_CLICKUP, "No ClickUp endpoint configured");
            return TaskCreateResponse {
                status_code: UNRESOLVED_STATUS,
                data: json!({ "error": format!("Unknown operation: {CREATE_TASK_CLICKUP}") }),
            };
        };

        // ClickUp personal tokens are sent bare, without a scheme.
        let result = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, &self.access_token)
            .json(task)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "ClickUp task request failed");
                return TaskCreateResponse {
                    status_code: TRANSPORT_FAILURE_STATUS,
                    data: json!({ "error": e.to_string() }),
                };
            }
        };

        let status_code = response.status().as_u16();
        let data = read_body(response).await;

        if self.is_success(status_code) {
            self.request_log
                .record(LoggedRequest::now(RequestMethod::Post, url))
                .await;
            tracing::info!(status_code, task = %task.name, "ClickUp task created");
        } else {
            tracing::warn!(status_code, task = %task.name, "ClickUp rejected task");
        }

        TaskCreateResponse { status_code, data }
    }

    fn is_success(&self, status_code: u16) -> bool {
        self.success_statuses.contains(&status_code)
    }
}
