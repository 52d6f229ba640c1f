//! Error types for entity mutation and wire serialization.

use skyops_types::EntityKind;
use thiserror::Error;

/// Result type for entity mutation.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors returned by `Entity::set` and friends.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// The identifier key, the extra-field container or an `_`-prefixed name.
    #[error("field '{field}' is reserved on {kind}")]
    ReservedField { kind: EntityKind, field: String },

    /// A field the backend computes.
    #[error("field '{field}' on {kind} is computed by the backend and cannot be set")]
    ReadOnlyField { kind: EntityKind, field: String },

    /// Not a manifest field, and the kind carries no extra fields.
    #[error("{kind} has no field '{field}'")]
    UnknownField { kind: EntityKind, field: String },

    #[error("field '{field}' on {kind} expects {expected}")]
    TypeMismatch {
        kind: EntityKind,
        field: String,
        expected: &'static str,
    },

    #[error("expected a {expected} entity, got {actual}")]
    WrongKind {
        expected: EntityKind,
        actual: EntityKind,
    },
}

/// Result type for wire serialization.
pub type SerializeResult<T> = Result<T, SerializeError>;

/// Preconditions that must hold before an entity can be put on the wire.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SerializeError {
    #[error("{kind} must have an owner for this caller")]
    MissingOwner { kind: EntityKind },

    #[error("{kind}.{field} is degenerate: {distinct_points} distinct points, at least 3 required")]
    DegenerateGeometry {
        kind: EntityKind,
        field: &'static str,
        distinct_points: usize,
    },

    #[error("{kind}: {begin} must be before {end}")]
    InvertedTimeRange {
        kind: EntityKind,
        begin: &'static str,
        end: &'static str,
    },
}
