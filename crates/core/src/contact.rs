//! Contact and task payloads exchanged with the external platforms.
//!
//! Neither entity is owned by this service: contacts live in the CRM and
//! tasks live on the task board. These types only describe the shapes we
//! send and read.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

/// Custom CRM property holding the task-board sync state of a contact.
pub const STATUS_PROPERTY: &str = "estado_clickup";

/// Status value that marks a contact as waiting for a task.
pub const PENDING_STATUS: &str = "pending";

/// Priority given to tasks created by the sync pass.
pub const SYNC_TASK_PRIORITY: &str = "3";

/// Request body for creating a CRM contact.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct NewContact {
    pub company: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub firstname: String,
    #[validate(length(min = 1))]
    pub lastname: String,
    pub phone: String,
    pub website: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado_clickup: Option<String>,
}

impl NewContact {
    /// Property map sent inside the CRM's `properties` envelope.
    pub fn to_properties(&self) -> Map<String, Value> {
        let mut props = Map::new();
        for (key, value) in [
            ("company", &self.company),
            ("email", &self.email),
            ("firstname", &self.firstname),
            ("lastname", &self.lastname),
            ("phone", &self.phone),
            ("website", &self.website),
        ] {
            props.insert(key.to_string(), Value::String(value.clone()));
        }
        if let Some(status) = &self.estado_clickup {
            props.insert(STATUS_PROPERTY.to_string(), Value::String(status.clone()));
        }
        props
    }
}

/// One entry of the CRM contact listing.
///
/// Fields other than `id` and `properties` (`createdAt`, `archived`, ...)
/// are kept verbatim so the listing can be passed through unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ContactRecord {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// CRM ids arrive as strings in v3 and as numbers in older payloads.
fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Read a property value as text.
///
/// The v3 API stores plain strings; the v1 profile API wraps each property
/// as `{ "value": ..., "versions": [...] }`. Both are accepted.
pub fn property_text(properties: &Map<String, Value>, key: &str) -> Option<String> {
    match properties.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => match obj.get("value")? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        },
        other => Some(other.to_string()),
    }
}

/// Request body for creating a task on the task board.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub description: String,
    pub priority: String,
}

/// Uniform envelope returned by task creation, whatever the outcome.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TaskCreateResponse {
    pub status_code: u16,
    pub data: Value,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn contact() -> NewContact {
        NewContact {
            company: "Acme".into(),
            email: "ana@acme.test".into(),
            firstname: "Ana".into(),
            lastname: "Diaz".into(),
            phone: "555".into(),
            website: "acme.test".into(),
            estado_clickup: Some("pending".into()),
        }
    }

    #[test]
    fn properties_include_status_when_present() {
        let props = contact().to_properties();
        assert_eq!(props["email"], "ana@acme.test");
        assert_eq!(props["company"], "Acme");
        assert_eq!(props[STATUS_PROPERTY], "pending");
    }

    #[test]
    fn properties_omit_status_when_absent() {
        let mut c = contact();
        c.estado_clickup = None;
        assert!(!c.to_properties().contains_key(STATUS_PROPERTY));
    }

    #[test]
    fn invalid_email_fails_validation() {
        let mut c = contact();
        c.email = "not-an-email".into();
        assert!(c.validate().is_err());
        assert!(contact().validate().is_ok());
    }

    #[test]
    fn property_text_reads_plain_and_wrapped_values() {
        let props = json!({
            "plain": "pending",
            "wrapped": { "value": "synced", "versions": [] },
            "number": 3,
            "null": null
        });
        let props = props.as_object().unwrap();
        assert_eq!(property_text(props, "plain").as_deref(), Some("pending"));
        assert_eq!(property_text(props, "wrapped").as_deref(), Some("synced"));
        assert_eq!(property_text(props, "number").as_deref(), Some("3"));
        assert_eq!(property_text(props, "null"), None);
        assert_eq!(property_text(props, "missing"), None);
    }

    #[test]
    fn contact_record_keeps_extra_fields() {
        let record: ContactRecord = serde_json::from_value(json!({
            "id": "5601",
            "properties": { "firstname": "Ana" },
            "createdAt": "2024-01-01T00:00:00Z",
            "archived": false
        }))
        .unwrap();

        assert_eq!(record.id.as_deref(), Some("5601"));
        assert_eq!(
            property_text(&record.properties, "firstname").as_deref(),
            Some("Ana")
        );
        assert_eq!(property_text(&record.properties, "lastname"), None);
        assert_eq!(record.extra["archived"], false);

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["createdAt"], "2024-01-01T00:00:00Z");
    }

    #[test]
    fn contact_record_numeric_and_missing_ids() {
        let numeric: ContactRecord = serde_json::from_value(json!({ "id": 42 })).unwrap();
        assert_eq!(numeric.id.as_deref(), Some("42"));

        let missing: ContactRecord = serde_json::from_value(json!({ "properties": {} })).unwrap();
        assert_eq!(missing.id, None);

        let empty: ContactRecord = serde_json::from_value(json!({ "id": "" })).unwrap();
        assert_eq!(empty.id, None);
    }
}
