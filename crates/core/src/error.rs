#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A required secret or setting is missing or malformed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}
