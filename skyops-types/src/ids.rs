//! Entity identifiers.
//!
//! Every entity kind uses the same convention for "not yet persisted": the
//! identifier is [`EntityId::New`], whose string form is the reserved
//! [`NEW_ENTITY_SENTINEL`]. The backend never sees the sentinel; serializers
//! drop the identifier key of a new entity.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Reserved placeholder identifier carried by entities that have not been
/// created on the backend yet.
pub const NEW_ENTITY_SENTINEL: &str = "__new__";

/// Identifier of an entity on the backend.
///
/// Backends assign identifiers of different shapes (UUIDs for operations and
/// vehicles, numbers for documents), so the persisted form is kept as the
/// string the backend returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityId {
    /// Not yet persisted.
    #[default]
    New,
    /// Assigned by the backend.
    Persisted(String),
}

impl EntityId {
    /// Creates a persisted identifier.
    ///
    /// Empty strings and the sentinel itself normalize to [`EntityId::New`].
    #[must_use]
    pub fn persisted(id: impl Into<String>) -> Self {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() || trimmed == NEW_ENTITY_SENTINEL {
            Self::New
        } else if trimmed.len() == id.len() {
            Self::Persisted(id)
        } else {
            Self::Persisted(trimmed.to_string())
        }
    }

    /// Reads an identifier from a raw wire value.
    ///
    /// Strings and numbers are persisted identifiers; `null`, absent or any
    /// other shape means the entity is new.
    #[must_use]
    pub fn from_wire(value: Option<&serde_json::Value>) -> Self {
        match value {
            Some(serde_json::Value::String(s)) => Self::persisted(s.as_str()),
            Some(serde_json::Value::Number(n)) => Self::Persisted(n.to_string()),
            _ => Self::New,
        }
    }

    /// Returns true if this entity has not been persisted yet.
    #[must_use]
    pub fn is_new(&self) -> bool {
        matches!(self, Self::New)
    }

    /// Returns the backend identifier, or `None` for a new entity.
    #[must_use]
    pub fn persisted_str(&self) -> Option<&str> {
        match self {
            Self::New => None,
            Self::Persisted(id) => Some(id),
        }
    }

    /// Returns the string form, which is the sentinel for a new entity.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => NEW_ENTITY_SENTINEL,
            Self::Persisted(id) => id,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::persisted(s))
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self::persisted(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::persisted(s)
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        match id {
            EntityId::New => NEW_ENTITY_SENTINEL.to_string(),
            EntityId::Persisted(id) => id,
        }
    }
}
