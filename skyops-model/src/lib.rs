//! Generic entity engine for SkyOps.
//!
//! Every domain kind (users, vehicles, operations, documents, airspace
//! restrictions, ...) is one [`Entity`] type driven by a static
//! [`KindDefinition`]:
//! - [`Entity::hydrate`] builds an entity from a backend payload and never fails
//! - [`Entity::as_backend_format`] produces the JSON body the backend expects
//! - [`Entity::validate`] reports every violated rule as an [`ErrorDescriptor`]
//! - [`EditSession`] publishes a [`ChangeEvent`](skyops_types::ChangeEvent)
//!   for every field the UI changes
//!
//! Tenant-specific extra fields are typed through the
//! [`SchemaRegistry`](skyops_schema::SchemaRegistry).

mod edit;
mod entity;
mod error;
mod hydrate;
pub mod kinds;
mod manifest;
mod rules;
mod serialize;
mod validate;
mod value;

pub use edit::{ChangeListener, EditSession};
pub use entity::{Entity, INTERNAL_MARKER};
pub use error::{ModelError, ModelResult, SerializeError, SerializeResult};
pub use hydrate::{DOCUMENTS_KEY, EXTRA_FIELDS_KEY};
pub use kinds::definition;
pub use manifest::{Access, FieldKind, FieldSpec, KindDefinition};
pub use rules::{
    CrossFieldRule, DateOrder, FieldsMatch, MIN_POLYGON_POINTS, NumberOrder, PolygonShape,
    Transitions,
};
pub use serialize::SerializeOptions;
pub use validate::{ErrorDescriptor, RuleKind, validate};
pub use value::{EntityRef, Geometry, Value};
