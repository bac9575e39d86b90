//! Plugin system error types.

use std::sync::Arc;

use thiserror::Error;

/// Result type for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;

/// Errors that can occur during plugin operations.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Plugin metadata request failed.
    #[error("API request failed: {0}")]
    Api(#[from] crate::client::ApiError),

    /// Plugin construction failed.
    #[error("Failed to construct plugin '{name}': {reason}")]
    Construction { name: String, reason: String },

    /// Module resolution failed.
    #[error("Failed to resolve plugin module: {0}")]
    Resolve(String),

    /// Bootstrap failed. Replays the first failure to every `load()` caller.
    #[error("Bootstrap failed: {0}")]
    Bootstrap(#[source] Arc<PluginError>),

    /// Bootstrap task was cancelled or panicked.
    #[error("Bootstrap task failed: {0}")]
    TaskFailed(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Checksum mismatch on a fetched module artifact.
    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    Checksum { expected: String, actual: String },

    /// Failure raised by a plugin lifecycle hook.
    #[error("{0}")]
    Plugin(String),
}

impl PluginError {
    /// Create a hook failure from a plain message.
    pub fn plugin(message: impl Into<String>) -> Self {
        Self::Plugin(message.into())
    }
}
