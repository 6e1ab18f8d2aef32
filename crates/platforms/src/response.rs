//! Shared response-body handling for the platform clients.

use serde_json::Value;

/// Read a response body as JSON, keeping non-JSON bodies as a JSON string.
pub(crate) async fn read_body(response: reqwest::Response) -> Value {
    match response.text().await {
        Ok(text) if text.is_empty() => Value::Null,
        Ok(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
        Err(e) => Value::String(format!("<unreadable body: {e}>")),
    }
}
