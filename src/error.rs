// Error types shared across the workbench

use thiserror::Error;

/// Failures talking to the workflow generation backend.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The server answered with a non-2xx status. `message` is the text the
    /// server supplied, or a status-specific fallback when the body was not JSON.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("backend reported status {0:?}")]
    NotReady(String),

    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl BackendError {
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Network(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("copy command `{command}` failed: {reason}")]
    Command { command: String, reason: String },

    #[error("clipboard I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("editor failed to initialize: {0}")]
    InitFailed(String),

    #[error("editor action `{action}` failed: {reason}")]
    Action { action: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid backend url {url:?}: {reason}")]
    InvalidBackendUrl { url: String, reason: String },

    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("failed to initialize logging: {0}")]
    Logging(String),
}
