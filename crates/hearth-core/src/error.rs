//! Error types and result handling for core operations.

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for configuration and payload handling.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration could not be loaded from its sources.
    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Event payload could not be serialized.
    #[error("event serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CoreError {
    /// Creates a validation error from a message.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
