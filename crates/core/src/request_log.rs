//! Outbound request history port.
//!
//! Platform clients call [`RequestLogSink::record`] after every upstream
//! call that returned the platform's success status. Failed calls are never
//! recorded. Recording is observational: a sink never fails the call it
//! describes.

use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// HTTP method tag stored with each history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMethod {
    Get,
    Post,
}

impl RequestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successful outbound call, as reported by a platform client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedRequest {
    pub method: RequestMethod,
    pub url: String,
    pub timestamp: Timestamp,
}

impl LoggedRequest {
    /// Describe a call that completed just now.
    pub fn now(method: RequestMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Destination for outbound request history.
#[async_trait]
pub trait RequestLogSink: Send + Sync {
    /// Record one successful call. Implementations swallow their own
    /// failures.
    async fn record(&self, request: LoggedRequest);
}

/// How outbound calls are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestLogMode {
    /// Await the insert before the platform call returns.
    Inline,
    /// Spawn the insert and return immediately.
    Background,
    /// Record nothing.
    Disabled,
}

impl FromStr for RequestLogMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" => Ok(Self::Inline),
            "background" => Ok(Self::Background),
            "disabled" | "off" | "none" => Ok(Self::Disabled),
            other => Err(format!("Unknown request log mode: {other}")),
        }
    }
}

/// Sink used when request logging is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRequestLog;

#[async_trait]
impl RequestLogSink for NoopRequestLog {
    async fn record(&self, _request: LoggedRequest) {}
}

/// In-memory sink, mostly useful in tests.
#[derive(Debug, Default)]
pub struct MemoryRequestLog {
    entries: Mutex<Vec<LoggedRequest>>,
}

impl MemoryRequestLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far, in call order.
    pub fn entries(&self) -> Vec<LoggedRequest> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RequestLogSink for MemoryRequestLog {
    async fn record(&self, request: LoggedRequest) {
        match self.entries.lock() {
            Ok(mut entries) => entries.push(request),
            Err(poisoned) => poisoned.into_inner().push(request),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_tags() {
        assert_eq!(RequestMethod::Get.to_string(), "GET");
        assert_eq!(RequestMethod::Post.as_str(), "POST");
        assert_eq!(
            serde_json::to_value(RequestMethod::Post).unwrap(),
            serde_json::json!("POST")
        );
    }

    #[test]
    fn parse_log_mode() {
        assert_eq!("inline".parse(), Ok(RequestLogMode::Inline));
        assert_eq!(" Background ".parse(), Ok(RequestLogMode::Background));
        assert_eq!("off".parse(), Ok(RequestLogMode::Disabled));
        assert!("sometimes".parse::<RequestLogMode>().is_err());
    }

    #[tokio::test]
    async fn memory_sink_records_in_order() {
        let sink = MemoryRequestLog::new();
        sink.record(LoggedRequest::now(RequestMethod::Get, "http://a"))
            .await;
        sink.record(LoggedRequest::now(RequestMethod::Post, "http://b"))
            .await;

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].url, "http://a");
        assert_eq!(entries[1].method, RequestMethod::Post);
    }

    #[tokio::test]
    async fn noop_sink_accepts_everything() {
        NoopRequestLog
            .record(LoggedRequest::now(RequestMethod::Get, "http://a"))
            .await;
    }
}
