// src/error.rs
// Error type shared by the client, the stores and the endpoint calls

use reqwest::StatusCode;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors surfaced to callers of the timesheet client.
///
/// Only `Unauthorized` carries a side effect (the session was already
/// evicted and the navigator sent to `/login` before it was returned).
/// Everything else is for the caller to display inline.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Unauthorized: session expired or invalid")]
    Unauthorized,

    #[error("Request failed with status {status}")]
    Status {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Credential store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    SessionSetup(String),
}

impl ClientError {
    /// Message suitable for showing next to a form: the server's own
    /// `message` when it sent one, else `fallback`.
    pub fn display_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            ClientError::Validation(message) | ClientError::SessionSetup(message) => {
                message.clone()
            }
            _ => fallback.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Network(e) => e.status(),
            _ => None,
        }
    }
}

/// Failures reading or writing persisted credentials
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt session file {path}: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Credential store lock poisoned")]
    Poisoned,
}
