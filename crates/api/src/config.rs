use syncbridge_core::request_log::RequestLogMode;
use syncbridge_core::urls::{DEFAULT_CLICKUP_BASE, DEFAULT_HUBSPOT_BASE};
use syncbridge_db::DEFAULT_MAX_CONNECTIONS;

/// Server configuration loaded from environment variables.
///
/// Credentials are not configured here; they come from the secret store
/// file named by `secrets_path`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// Inbound HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Path of the JSON secrets file (default: `secrets.json`).
    pub secrets_path: String,
    pub hubspot_api_base: String,
    pub clickup_api_base: String,
    /// How successful outbound calls are written to the history table.
    pub request_log_mode: RequestLogMode,
    /// ClickUp statuses treated as a created task (default: `200`).
    pub clickup_success_statuses: Vec<u16>,
    pub db_max_connections: u32,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                   |
    /// |-------------------------------|---------------------------|
    /// | `HOST`                        | `0.0.0.0`                 |
    /// | `PORT`                        | `3000`                    |
    /// | `CORS_ORIGINS`                | `http://localhost:5173`   |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                      |
    /// | `SECRETS_PATH`                | `secrets.json`            |
    /// | `HUBSPOT_API_BASE`            | `https://api.hubapi.com`  |
    /// | `CLICKUP_API_BASE`            | `https://api.clickup.com` |
    /// | `REQUEST_LOG_MODE`            | `inline`                  |
    /// | `CLICKUP_TASK_SUCCESS_STATUS` | `200`                     |
    /// | `DB_MAX_CONNECTIONS`          | `10`                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = split_list(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let secrets_path =
            std::env::var("SECRETS_PATH").unwrap_or_else(|_| "secrets.json".into());

        let hubspot_api_base =
            std::env::var("HUBSPOT_API_BASE").unwrap_or_else(|_| DEFAULT_HUBSPOT_BASE.into());
        let clickup_api_base =
            std::env::var("CLICKUP_API_BASE").unwrap_or_else(|_| DEFAULT_CLICKUP_BASE.into());

        let request_log_mode: RequestLogMode = std::env::var("REQUEST_LOG_MODE")
            .unwrap_or_else(|_| "inline".into())
            .parse()
            .unwrap_or_else(|e| panic!("REQUEST_LOG_MODE: {e}"));

        let clickup_success_statuses = parse_statuses(
            &std::env::var("CLICKUP_TASK_SUCCESS_STATUS").unwrap_or_else(|_| "200".into()),
        )
        .unwrap_or_else(|e| panic!("CLICKUP_TASK_SUCCESS_STATUS: {e}"));

        let db_max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .map(|v| v.parse().expect("DB_MAX_CONNECTIONS must be a valid u32"))
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            secrets_path,
            hubspot_api_base,
            clickup_api_base,
            request_log_mode,
            clickup_success_statuses,
            db_max_connections,
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse a comma-separated list of HTTP status codes.
fn parse_statuses(raw: &str) -> Result<Vec<u16>, String> {
    split_list(raw)
        .iter()
        .map(|s| match s.parse::<u16>() {
            Ok(code) if (100..=599).contains(&code) => Ok(code),
            _ => Err(format!("invalid HTTP status '{s}'")),
        })
        .collect()
}
