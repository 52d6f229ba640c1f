//! Wire serialization.

use serde_json::{Map, Value as Json};
use skyops_schema::coerce_to_wire;
use tracing::trace;

use crate::entity::Entity;
use crate::error::{SerializeError, SerializeResult};
use crate::hydrate::{DOCUMENTS_KEY, EXTRA_FIELDS_KEY};
use crate::manifest::{Access, FieldKind};
use crate::value::Value;

/// Caller-dependent serialization switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Leave the owner out entirely, for callers that may not assign one.
    pub omit_owner: bool,
    /// Refuse to serialize an entity without an owner.
    pub owner_required: bool,
}

impl SerializeOptions {
    #[must_use]
    pub fn omit_owner() -> Self {
        Self {
            omit_owner: true,
            owner_required: false,
        }
    }

    #[must_use]
    pub fn owner_required() -> Self {
        Self {
            omit_owner: false,
            owner_required: true,
        }
    }
}

pub(crate) fn as_backend_format(
    entity: &Entity,
    options: &SerializeOptions,
) -> SerializeResult<Json> {
    let definition = entity.definition();

    for rule in definition.rules {
        rule.precondition(entity)?;
    }

    if let Some(owner_key) = definition.owner_key
        && options.owner_required
        && !options.omit_owner
        && entity.get(owner_key).is_none_or(Value::is_empty)
    {
        return Err(SerializeError::MissingOwner { kind: entity.kind() });
    }

    let mut body = Map::new();
    if let (Some(id_key), Some(id)) = (definition.id_key, entity.id().persisted_str()) {
        body.insert(id_key.to_string(), Json::String(id.to_string()));
    }

    for spec in definition.fields {
        if spec.access != Access::Editable {
            continue;
        }
        if options.omit_owner && definition.owner_key == Some(spec.name) {
            continue;
        }
        let Some(value) = entity.get(spec.name) else {
            continue;
        };
        // An empty choice is never a valid option.
        let omittable = spec.omit_empty || matches!(spec.kind, FieldKind::Choice(_));
        if omittable && value.is_empty() {
            continue;
        }
        if let Some(wire) = value_to_wire(value, options)? {
            body.insert(spec.name.to_string(), wire);
        }
    }

    let mut extra = Map::new();
    for (key, value) in entity.extra_fields() {
        match coerce_to_wire(value) {
            Some(wire) => {
                extra.insert(key.clone(), wire);
            }
            None => trace!(key = %key, "file value left for multipart upload"),
        }
    }
    if !entity.documents().is_empty() {
        let documents = entity
            .documents()
            .iter()
            .map(|d| as_backend_format(d, options))
            .collect::<SerializeResult<Vec<_>>>()?;
        extra.insert(DOCUMENTS_KEY.to_string(), Json::Array(documents));
    }
    if !extra.is_empty() {
        body.insert(EXTRA_FIELDS_KEY.to_string(), Json::Object(extra));
    }

    Ok(Json::Object(body))
}

fn value_to_wire(value: &Value, options: &SerializeOptions) -> SerializeResult<Option<Json>> {
    let wire = match value {
        Value::Unset => None,
        Value::Scalar(v) => coerce_to_wire(v),
        Value::Geometry(g) => Some(g.raw().clone()),
        Value::Json(raw) => Some(raw.clone()),
        Value::Reference(r) => Some(Json::String(r.identifier().to_string())),
        Value::References(refs) => Some(Json::Array(
            refs.iter()
                .map(|r| Json::String(r.identifier().to_string()))
                .collect(),
        )),
        Value::Entities(children) => Some(Json::Array(
            children
                .iter()
                .map(|child| as_backend_format(child, options))
                .collect::<SerializeResult<Vec<_>>>()?,
        )),
    };
    Ok(wire)
}
