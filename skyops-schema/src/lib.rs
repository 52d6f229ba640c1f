//! Dynamic field schemas for SkyOps entities.
//!
//! Each deployment extends the fixed entity manifests with tenant-specific
//! "extra fields". This crate holds the runtime description of those fields
//! and the conversion of their values to and from the wire:
//! - [`Schema`] / [`FieldDescriptor`]: field name → declared type, required-ness, limits
//! - [`SchemaRegistry`]: one schema per entity kind, loaded once per session
//! - [`FieldValue`]: the closed set of typed values an extra field can hold
//! - [`coerce`]: raw JSON ↔ [`FieldValue`] for a declared [`FieldType`]

pub mod coerce;
mod error;
mod registry;
mod schema;
mod value;

pub use coerce::{coerce_from_wire, coerce_to_wire};
pub use error::{SchemaError, SchemaResult};
pub use registry::SchemaRegistry;
pub use schema::{FieldDescriptor, FieldType, Schema};
pub use value::{FieldValue, FileRef, PendingFile};
