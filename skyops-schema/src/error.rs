//! Error types for schema loading.

use thiserror::Error;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while loading a schema document.
///
/// Lookups never fail: a missing schema is an empty schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The document is valid JSON but not shaped like a schema document.
    #[error("invalid schema document: {0}")]
    InvalidDocument(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
