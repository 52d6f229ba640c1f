//! Schema Registry
//!
//! Holds the tenant's extra-field schemas, one per entity kind. The registry
//! is filled once at session start from the schema document and is read-only
//! afterwards; share it behind an `Arc`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use skyops_types::EntityKind;
use tracing::{debug, info, warn};

use crate::error::{SchemaError, SchemaResult};
use crate::schema::{FieldType, Schema};

static EMPTY_SCHEMA: Schema = Schema::new();

/// Per-kind schemas for one tenant.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<EntityKind, Schema>,
    loaded: bool,
}

impl SchemaRegistry {
    /// Creates a registry in the "not yet loaded" state.
    ///
    /// Every lookup returns an empty schema, so all extra fields are
    /// optional and untyped until the real document arrives.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a loaded registry from explicit schemas.
    #[must_use]
    pub fn from_schemas(schemas: impl IntoIterator<Item = (EntityKind, Schema)>) -> Self {
        Self {
            schemas: schemas.into_iter().collect(),
            loaded: true,
        }
    }

    /// Builds a loaded registry from a schema document.
    ///
    /// The document is an object keyed by entity kind (`"vehicle"`,
    /// `"vehicles"`, `"flightRequest"`, ...), each value a schema object.
    /// Keys naming no known kind are skipped with a warning.
    pub fn from_document(document: &serde_json::Value) -> SchemaResult<Self> {
        let object = document.as_object().ok_or_else(|| {
            SchemaError::InvalidDocument("expected an object keyed by entity kind".to_string())
        })?;

        let mut schemas = HashMap::with_capacity(object.len());
        for (key, value) in object {
            let kind: EntityKind = match key.parse() {
                Ok(kind) => kind,
                Err(_) => {
                    warn!(key = %key, "skipping schema for unknown entity kind");
                    continue;
                }
            };
            let schema: Schema = serde_json::from_value(value.clone()).map_err(|e| {
                SchemaError::InvalidDocument(format!("schema for '{key}': {e}"))
            })?;

            for (name, descriptor) in schema.fields() {
                if descriptor.field_type == FieldType::Unknown {
                    debug!(
                        %kind,
                        field = name,
                        "field declares an unrecognized type, value kept raw"
                    );
                }
            }
            schemas.insert(kind, schema);
        }

        info!(kinds = schemas.len(), "schema registry loaded");
        Ok(Self {
            schemas,
            loaded: true,
        })
    }

    /// Parses a schema document from a JSON string.
    pub fn from_json_str(json: &str) -> SchemaResult<Self> {
        let document: serde_json::Value = serde_json::from_str(json)?;
        Self::from_document(&document)
    }

    /// Reads a schema document from disk.
    pub fn load(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Returns the schema for a kind, or an empty schema.
    #[must_use]
    pub fn schema(&self, kind: EntityKind) -> &Schema {
        self.schemas.get(&kind).unwrap_or(&EMPTY_SCHEMA)
    }

    /// Returns true once a document (or explicit schemas) has been installed.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Kinds that have a schema, in no particular order.
    pub fn kinds(&self) -> impl Iterator<Item = EntityKind> + '_ {
        self.schemas.keys().copied()
    }
}
