//! Client error types.

use skyops_model::{ErrorDescriptor, ModelError, SerializeError};
use skyops_schema::SchemaError;
use skyops_types::EntityKind;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Placeholder message when a rejected request carries no readable message.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Errors that can occur talking to the backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Validation failed; nothing was sent.
    #[error("entity is invalid: {} violation(s)", .0.len())]
    Invalid(Vec<ErrorDescriptor>),

    #[error("entity cannot be serialized: {0}")]
    Precondition(#[from] SerializeError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend rejected the request ({status}): {}", .messages.join("; "))]
    Backend { status: u16, messages: Vec<String> },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("{0} has no endpoint of its own")]
    NoEndpoint(EntityKind),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Validation descriptors, for `Invalid` errors.
    pub fn descriptors(&self) -> &[ErrorDescriptor] {
        match self {
            ClientError::Invalid(errors) => errors,
            _ => &[],
        }
    }

    /// HTTP status of a backend rejection or transport error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Backend { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true for 404 responses.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Extracts the message list from a backend error body.
///
/// `message` may be a string, a comma-separated string or an array. Anything
/// else yields the single [`UNKNOWN_ERROR`] placeholder.
pub fn parse_backend_messages(body: &str) -> Vec<String> {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").cloned());

    let messages: Vec<String> = match message {
        Some(serde_json::Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect(),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                serde_json::Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            })
            .filter(|m| !m.is_empty())
            .collect(),
        _ => Vec::new(),
    };

    if messages.is_empty() {
        vec![UNKNOWN_ERROR.to_string()]
    } else {
        messages
    }
}
