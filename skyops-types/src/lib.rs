//! Shared type definitions for SkyOps.
//!
//! This crate defines the small, dependency-light types every other crate in
//! the workspace agrees on:
//! - [`EntityKind`]: the closed set of domain entity kinds
//! - [`EntityId`]: identifiers, including the new-entity sentinel
//! - [`timestamp`]: ISO-8601 / epoch conversion for wire dates
//! - [`ChangeEvent`]: the notification emitted when an entity is edited
//!
//! Field manifests, schemas and serialization live in `skyops-schema` and
//! `skyops-model`, not here.

mod event;
mod ids;
mod kind;
pub mod timestamp;

pub use event::{ChangeEvent, ChangeKind, EventId};
pub use ids::{EntityId, NEW_ENTITY_SENTINEL};
pub use kind::EntityKind;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown entity kind: {0}")]
    UnknownKind(String),
}
