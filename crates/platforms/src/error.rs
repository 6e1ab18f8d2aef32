use serde_json::Value;

/// Errors from the platform HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The platform answered with a status other than the expected one.
    #[error("Upstream error ({status}): {body}")]
    Upstream {
        /// HTTP status code returned by the platform.
        status: u16,
        /// Response body, parsed as JSON when possible.
        body: Value,
    },

    /// The requested record does not exist upstream.
    #[error("Contact not found")]
    NotFound,

    /// No endpoint is known for the operation identifier.
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),
}
