//! HubSpot CRM client.
//!
//! Wraps contact creation, single-contact profile lookup and the
//! cursor-paginated contact listing. Every successful call is reported to
//! the configured request-log sink; failed calls are not.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use syncbridge_core::contact::{ContactRecord, NewContact};
use syncbridge_core::request_log::{LoggedRequest, RequestLogSink, RequestMethod};
use syncbridge_core::urls::{
    Platform, UrlResolver, CONTACT_PROFILE_HUBSPOT, CREATE_CONTACT_HUBSPOT, LIST_CONTACTS_HUBSPOT,
};

use crate::error::PlatformError;
use crate::response::read_body;
use crate::CrmClient;

/// Contacts requested per listing page.
pub const PAGE_SIZE: u32 = 100;

/// HTTP client for the HubSpot CRM API.
pub struct HubSpotClient {
    client: reqwest::Client,
    access_token: String,
    urls: Arc<UrlResolver>,
    request_log: Arc<dyn RequestLogSink>,
}

/// One page of the v3 contact listing.
#[derive(Debug, Deserialize)]
struct ContactPage {
    #[serde(default)]
    results: Vec<ContactRecord>,
    #[serde(default)]
    paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
struct Paging {
    #[serde(default)]
    next: Option<NextPage>,
}

#[derive(Debug, Deserialize)]
struct NextPage {
    #[serde(default)]
    after: Option<String>,
}

impl ContactPage {
    fn next_cursor(&self) -> Option<String> {
        self.paging
            .as_ref()?
            .next
            .as_ref()?
            .after
            .clone()
            .filter(|after| !after.is_empty())
    }
}

impl HubSpotClient {
    /// Create a client with its own connection pool.
    ///
    /// No request timeout is set: a hanging upstream blocks only the
    /// caller awaiting it.
    pub fn new(
        access_token: impl Into<String>,
        urls: Arc<UrlResolver>,
        request_log: Arc<dyn RequestLogSink>,
    ) -> Self {
        Self::with_client(reqwest::Client::new(), access_token, urls, request_log)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        access_token: impl Into<String>,
        urls: Arc<UrlResolver>,
        request_log: Arc<dyn RequestLogSink>,
    ) -> Self {
        Self {
            client,
            access_token: access_token.into(),
            urls,
            request_log,
        }
    }

    fn resolve(&self, operation_id: &str) -> Result<String, PlatformError> {
        self.urls
            .resolve(Platform::HubSpot, operation_id)
            .ok_or_else(|| PlatformError::UnknownOperation(operation_id.to_string()))
    }

    async fn fetch_page(
        &self,
        url: &str,
        after: Option<&str>,
    ) -> Result<ContactPage, PlatformError> {
        let limit = PAGE_SIZE.to_string();
        let mut query: Vec<(&str, &str)> = vec![("limit", limit.as_str())];
        if let Some(after) = after {
            query.push(("after", after));
        }

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .query(&query)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            let status = response.status().as_u16();
            return Err(PlatformError::Upstream {
                status,
                body: read_body(response).await,
            });
        }

        let page = response.json::<ContactPage>().await?;
        self.request_log
            .record(LoggedRequest::now(RequestMethod::Get, url))
            .await;
        Ok(page)
    }
}

#[async_trait]
impl CrmClient for HubSpotClient {
    async fn create_contact(&self, contact: &NewContact) -> Result<Value, PlatformError> {
        let url = self.resolve(CREATE_CONTACT_HUBSPOT)?;
        let body = json!({ "properties": contact.to_properties() });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let body = read_body(response).await;

        if status != StatusCode::CREATED {
            tracing::warn!(status = status.as_u16(), "HubSpot rejected contact creation");
            return Err(PlatformError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        self.request_log
            .record(LoggedRequest::now(RequestMethod::Post, url))
            .await;
        tracing::info!(contact_id = %body["id"], "HubSpot contact created");
        Ok(body)
    }

    async fn get_contact(&self, contact_id: &str) -> Result<Map<String, Value>, PlatformError> {
        let url = self
            .urls
            .contact_profile(contact_id)
            .ok_or_else(|| PlatformError::UnknownOperation(CONTACT_PROFILE_HUBSPOT.to_string()))?;

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body = read_body(response).await;
                self.request_log
                    .record(LoggedRequest::now(RequestMethod::Get, url))
                    .await;
                Ok(match body {
                    Value::Object(mut obj) => match obj.remove("properties") {
                        Some(Value::Object(props)) => props,
                        _ => Map::new(),
                    },
                    _ => Map::new(),
                })
            }
            StatusCode::NOT_FOUND => Err(PlatformError::NotFound),
            status => Err(PlatformError::Upstream {
                status: status.as_u16(),
                body: read_body(response).await,
            }),
        }
    }

    async fn list_all_contacts(&self) -> Result<Vec<ContactRecord>, PlatformError> {
        let url = self.resolve(LIST_CONTACTS_HUBSPOT)?;
        let mut contacts = Vec::new();
        let mut after: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self.fetch_page(&url, after.as_deref()).await?;
            pages += 1;
            let next = page.next_cursor();
            contacts.extend(page.results);

            match next {
                Some(cursor) => after = Some(cursor),
                None => break,
            }
        }

        tracing::debug!(pages, contacts = contacts.len(), "HubSpot listing drained");
        Ok(contacts)
    }
}
