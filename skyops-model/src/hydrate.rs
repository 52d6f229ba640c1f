//! Building entities from backend payloads.
//!
//! Hydration never fails. Malformed values are kept raw (or left at their
//! default) and surface later as validation errors.

use serde_json::{Map, Value as Json};
use skyops_schema::{FieldType, FieldValue, Schema, SchemaRegistry, coerce_from_wire};
use skyops_types::{EntityId, EntityKind};
use tracing::debug;

use crate::entity::{Entity, INTERNAL_MARKER};
use crate::kinds;
use crate::manifest::{Access, FieldKind, FieldSpec};
use crate::value::{EntityRef, Geometry, Value};

/// Wire key of the nested object holding dynamic fields.
pub const EXTRA_FIELDS_KEY: &str = "extra_fields";
/// Key of the document list inside [`EXTRA_FIELDS_KEY`].
pub const DOCUMENTS_KEY: &str = "documents";

pub(crate) fn hydrate(kind: EntityKind, payload: &Json, registry: &SchemaRegistry) -> Entity {
    let definition = kinds::definition(kind);
    let mut entity = Entity::new(kind);

    let Some(object) = payload.as_object() else {
        debug!(%kind, "payload is not an object, hydrating an empty entity");
        return entity;
    };

    if let Some(id_key) = definition.id_key {
        entity.set_id(EntityId::from_wire(object.get(id_key)));
    }

    for spec in definition.fields {
        if spec.access == Access::Local {
            continue;
        }
        if let Some(raw) = object.get(spec.name) {
            entity.insert_hydrated(spec.name, read_fixed(spec, raw, registry));
        }
    }

    let schema = registry.schema(kind);
    for (key, raw) in object {
        let known = definition.is_id_key(key)
            || definition.field(key).is_some()
            || key == EXTRA_FIELDS_KEY
            || key.starts_with(INTERNAL_MARKER);
        if known {
            continue;
        }
        if key == DOCUMENTS_KEY
            && definition.has_documents
            && let Some(documents) = read_documents(raw, registry)
        {
            entity.set_documents(documents);
            continue;
        }
        if !definition.accepts_extra_fields {
            debug!(%kind, key = %key, "dropping unknown key");
            continue;
        }
        entity.insert_extra(key.clone(), read_extra(schema, key, raw));
    }

    if let Some(extra) = object.get(EXTRA_FIELDS_KEY).and_then(Json::as_object) {
        read_extra_object(&mut entity, extra, schema, registry);
    }

    entity.mark_clean();
    entity
}

fn read_extra_object(
    entity: &mut Entity,
    extra: &Map<String, Json>,
    schema: &Schema,
    registry: &SchemaRegistry,
) {
    let definition = entity.definition();
    if !definition.accepts_extra_fields {
        return;
    }

    for (key, raw) in extra {
        if key.starts_with(INTERNAL_MARKER) {
            continue;
        }
        if key == DOCUMENTS_KEY
            && definition.has_documents
            && let Some(documents) = read_documents(raw, registry)
        {
            entity.set_documents(documents);
            continue;
        }
        entity.insert_extra(key.clone(), read_extra(schema, key, raw));
    }
}

/// Documents may arrive at the top level or under [`EXTRA_FIELDS_KEY`].
fn read_documents(raw: &Json, registry: &SchemaRegistry) -> Option<Vec<Entity>> {
    let items = raw.as_array()?;
    Some(
        items
            .iter()
            .filter(|item| item.is_object())
            .map(|item| hydrate(EntityKind::Document, item, registry))
            .collect(),
    )
}

fn read_extra(schema: &Schema, key: &str, raw: &Json) -> FieldValue {
    let declared = schema.field_type(key).unwrap_or(FieldType::Unknown);
    coerce_from_wire(raw, declared)
}

fn read_fixed(spec: &FieldSpec, raw: &Json, registry: &SchemaRegistry) -> Value {
    if raw.is_null() {
        return spec.kind.default_value();
    }
    if matches!(spec.kind, FieldKind::Choice(_))
        && raw.as_str().is_some_and(|s| s.trim().is_empty())
    {
        return Value::Unset;
    }

    if let Some(declared) = spec.kind.scalar_type() {
        return Value::Scalar(coerce_from_wire(raw, declared));
    }

    match spec.kind {
        FieldKind::Polygon | FieldKind::Point => Value::Geometry(Geometry::new(raw.clone())),
        FieldKind::Reference { kind, key } => match read_reference(kind, key, raw, registry) {
            Some(reference) => Value::Reference(reference),
            None => Value::Json(raw.clone()),
        },
        FieldKind::ReferenceList { kind, key } => match raw.as_array() {
            Some(items) => Value::References(
                items
                    .iter()
                    .filter_map(|item| read_reference(kind, key, item, registry))
                    .collect(),
            ),
            None => Value::Json(raw.clone()),
        },
        FieldKind::Entities(kind) => match raw.as_array() {
            Some(items) => Value::Entities(
                items
                    .iter()
                    .map(|item| hydrate(kind, item, registry))
                    .collect(),
            ),
            None => Value::Json(raw.clone()),
        },
        _ => Value::Json(raw.clone()),
    }
}

/// Accepts a bare identifier or the full nested object.
fn read_reference(
    kind: EntityKind,
    key: &str,
    raw: &Json,
    registry: &SchemaRegistry,
) -> Option<EntityRef> {
    match raw {
        Json::String(id) if !id.trim().is_empty() => Some(EntityRef::id(id.trim())),
        Json::Number(n) => Some(EntityRef::id(n.to_string())),
        Json::Object(object) => {
            let nested = hydrate(kind, raw, registry);
            let id = match object.get(key) {
                Some(Json::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
                Some(Json::Number(n)) => Some(n.to_string()),
                _ => nested.id().persisted_str().map(str::to_string),
            };
            match id {
                Some(id) => Some(EntityRef::resolved(id, nested)),
                None => {
                    debug!(%kind, key, "nested reference carries no identifier");
                    None
                }
            }
        }
        _ => None,
    }
}
