//! Change events emitted while an entity is being edited.
//!
//! Entities do not notify anyone on their own. An editing context calls
//! `set` on the entity and publishes one [`ChangeEvent`] per applied change to
//! whoever subscribed. Values are carried as JSON previews so listeners do not
//! depend on the model crate.

use crate::{EntityId, EntityKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new time-ordered event ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// What part of the entity changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// A fixed, manifest-declared field was set.
    Field,
    /// A dynamic extra field was set.
    ExtraField,
    /// A dynamic extra field was removed.
    ExtraFieldRemoved,
}

/// A single applied change to an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub id: EventId,
    pub entity_kind: EntityKind,
    pub entity_id: EntityId,
    pub change: ChangeKind,
    pub field: String,
    /// Value before the change (`null` when previously unset).
    pub previous: serde_json::Value,
    /// Value after the change (`null` when removed or unset).
    pub current: serde_json::Value,
    pub at: DateTime<Utc>,
}

impl ChangeEvent {
    /// Creates an event stamped with the current time.
    #[must_use]
    pub fn new(
        entity_kind: EntityKind,
        entity_id: EntityId,
        change: ChangeKind,
        field: impl Into<String>,
        previous: serde_json::Value,
        current: serde_json::Value,
    ) -> Self {
        Self {
            id: EventId::new(),
            entity_kind,
            entity_id,
            change,
            field: field.into(),
            previous,
            current,
            at: Utc::now(),
        }
    }

    /// Returns true if the value actually differs.
    #[must_use]
    pub fn is_effective(&self) -> bool {
        self.previous != self.current
    }
}
