//! Static secret store loaded once at process start.
//!
//! Secrets live in a JSON object on disk (`secrets.json` by default):
//!
//! ```json
//! {
//!   "HUBSPOT_ACCESS_TOKEN": "...",
//!   "CLICKUP_ACCESS_TOKEN": "...",
//!   "CLICKUP_LIST_ID": "901",
//!   "DATABASE_DEFAULT": {
//!     "USER": "bridge", "PASSWORD": "...", "HOST": "localhost",
//!     "PORT": 5432, "NAME": "bridge"
//!   }
//! }
//! ```
//!
//! The store is read-only after loading; there is no reload.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::CoreError;

pub const HUBSPOT_ACCESS_TOKEN: &str = "HUBSPOT_ACCESS_TOKEN";
pub const CLICKUP_ACCESS_TOKEN: &str = "CLICKUP_ACCESS_TOKEN";
pub const CLICKUP_LIST_ID: &str = "CLICKUP_LIST_ID";
pub const DATABASE_DEFAULT: &str = "DATABASE_DEFAULT";

/// Process-wide credential mapping.
#[derive(Debug, Clone)]
pub struct SecretStore {
    values: Map<String, Value>,
}

/// Connection parameters read from the nested `DATABASE_DEFAULT` secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSecrets {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: Option<u16>,
    pub name: String,
}

impl DatabaseSecrets {
    /// PostgreSQL connection URL for these parameters.
    pub fn url(&self) -> String {
        match self.port {
            Some(port) => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, port, self.name
            ),
            None => format!(
                "postgres://{}:{}@{}/{}",
                self.user, self.password, self.host, self.name
            ),
        }
    }
}

impl SecretStore {
    /// Load the store from a JSON file. The top level must be an object.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Configuration(format!(
                "Cannot read secrets file {}: {e}",
                path.display()
            ))
        })?;
        let value: Value = serde_json::from_str(&raw).map_err(|e| {
            CoreError::Configuration(format!(
                "Secrets file {} is not valid JSON: {e}",
                path.display()
            ))
        })?;
        Self::from_value(value)
    }

    /// Build a store from an already-parsed JSON object.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            _ => Err(CoreError::Configuration(
                "Secrets must be a JSON object".into(),
            )),
        }
    }

    /// Look up a secret, failing with a message that names the missing key.
    pub fn get(&self, key: &str) -> Result<&Value, CoreError> {
        self.values
            .get(key)
            .ok_or_else(|| CoreError::Configuration(format!("Missing secret: {key}")))
    }

    /// Look up a secret that must be a string.
    pub fn get_str(&self, key: &str) -> Result<&str, CoreError> {
        self.get(key)?
            .as_str()
            .ok_or_else(|| CoreError::Configuration(format!("Secret {key} must be a string")))
    }

    /// Look up a scalar secret as text; numbers are accepted and formatted.
    pub fn get_text(&self, key: &str) -> Result<String, CoreError> {
        match self.get(key)? {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            _ => Err(CoreError::Configuration(format!(
                "Secret {key} must be a string or number"
            ))),
        }
    }

    /// Read the `DATABASE_DEFAULT` object.
    ///
    /// `PORT` is optional and may be given as a number or a numeric string.
    pub fn database(&self) -> Result<DatabaseSecrets, CoreError> {
        let db = self.get(DATABASE_DEFAULT)?.as_object().ok_or_else(|| {
            CoreError::Configuration(format!("Secret {DATABASE_DEFAULT} must be an object"))
        })?;

        let field = |name: &str| -> Result<String, CoreError> {
            db.get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| {
                    CoreError::Configuration(format!("Missing secret: {DATABASE_DEFAULT}.{name}"))
                })
        };

        let port = match db.get("PORT") {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => Some(
                n.as_u64()
                    .and_then(|p| u16::try_from(p).ok())
                    .ok_or_else(|| invalid_port(&n.to_string()))?,
            ),
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(s.parse::<u16>().map_err(|_| invalid_port(s))?),
            Some(other) => return Err(invalid_port(&other.to_string())),
        };

        Ok(DatabaseSecrets {
            user: field("USER")?,
            password: field("PASSWORD")?,
            host: field("HOST")?,
            port,
            name: field("NAME")?,
        })
    }
}

fn invalid_port(raw: &str) -> CoreError {
    CoreError::Configuration(format!("Invalid {DATABASE_DEFAULT}.PORT: {raw}"))
}
