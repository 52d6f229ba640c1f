use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde_json::json;
use skyops_schema::FieldValue;

use crate::entity::Entity;

/// Value of a fixed, manifest-declared field.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// No value. Never written to the wire.
    #[default]
    Unset,
    /// String, number, date, bool or file, shared with extra fields.
    Scalar(FieldValue),
    Geometry(Geometry),
    /// Opaque structured data, or a malformed value kept as received.
    Json(serde_json::Value),
    Reference(EntityRef),
    References(Vec<EntityRef>),
    /// Owned sub-entities (volumes, segments).
    Entities(Vec<Entity>),
}

impl Value {
    /// Returns true for values that do not satisfy a `required` rule.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Unset => true,
            Value::Scalar(v) => v.is_empty(),
            Value::Geometry(g) => g.raw().is_null(),
            Value::Json(raw) => FieldValue::Raw(raw.clone()).is_empty(),
            Value::Reference(r) => r.identifier().trim().is_empty(),
            Value::References(refs) => refs.is_empty(),
            Value::Entities(entities) => entities.is_empty(),
        }
    }

    #[must_use]
    pub fn as_scalar(&self) -> Option<&FieldValue> {
        match self {
            Value::Scalar(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(FieldValue::as_str)
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.as_scalar().and_then(FieldValue::as_f64)
    }

    #[must_use]
    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        self.as_scalar().and_then(FieldValue::as_date)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        self.as_scalar().and_then(FieldValue::as_bool)
    }

    #[must_use]
    pub fn as_geometry(&self) -> Option<&Geometry> {
        match self {
            Value::Geometry(g) => Some(g),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_reference(&self) -> Option<&EntityRef> {
        match self {
            Value::Reference(r) => Some(r),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_references(&self) -> &[EntityRef] {
        match self {
            Value::References(refs) => refs,
            _ => &[],
        }
    }

    #[must_use]
    pub fn as_entities(&self) -> &[Entity] {
        match self {
            Value::Entities(entities) => entities,
            _ => &[],
        }
    }

    /// JSON rendering for change notifications.
    #[must_use]
    pub fn preview(&self) -> serde_json::Value {
        match self {
            Value::Unset => serde_json::Value::Null,
            Value::Scalar(v) => v.preview(),
            Value::Geometry(g) => g.raw().clone(),
            Value::Json(raw) => raw.clone(),
            Value::Reference(r) => json!(r.identifier()),
            Value::References(refs) => {
                json!(refs.iter().map(EntityRef::identifier).collect::<Vec<_>>())
            }
            Value::Entities(entities) => json!(
                entities
                    .iter()
                    .map(Entity::display_name)
                    .collect::<Vec<_>>()
            ),
        }
    }
}

impl From<FieldValue> for Value {
    fn from(v: FieldValue) -> Self {
        Value::Scalar(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(FieldValue::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(FieldValue::from(s))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Scalar(FieldValue::Number(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(FieldValue::Bool(b))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Scalar(FieldValue::Date(d))
    }
}

impl From<Geometry> for Value {
    fn from(g: Geometry) -> Self {
        Value::Geometry(g)
    }
}

impl From<EntityRef> for Value {
    fn from(r: EntityRef) -> Self {
        Value::Reference(r)
    }
}

impl From<Vec<EntityRef>> for Value {
    fn from(refs: Vec<EntityRef>) -> Self {
        Value::References(refs)
    }
}

impl From<Vec<Entity>> for Value {
    fn from(entities: Vec<Entity>) -> Self {
        Value::Entities(entities)
    }
}

/// A reference to another entity.
///
/// On read the backend may send the full nested object, on write the core
/// sends only the identifier. Two references are equal when they point at
/// the same identifier, whichever shape they were read from.
#[derive(Debug, Clone)]
pub struct EntityRef {
    id: String,
    entity: Option<Box<Entity>>,
}

impl EntityRef {
    /// A reference known only by identifier.
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entity: None,
        }
    }

    /// A reference carrying the hydrated target.
    #[must_use]
    pub fn resolved(id: impl Into<String>, entity: Entity) -> Self {
        Self {
            id: id.into(),
            entity: Some(Box::new(entity)),
        }
    }

    /// The identifier written to the wire.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.id
    }

    /// The nested entity, when the backend sent one.
    #[must_use]
    pub fn entity(&self) -> Option<&Entity> {
        self.entity.as_deref()
    }
}

impl PartialEq for EntityRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// An opaque polygon or point.
///
/// Accepts GeoJSON-like objects (`{"type": "Polygon", "coordinates": ...}`)
/// or bare coordinate arrays; the core never reprojects or measures them.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry(serde_json::Value);

impl Geometry {
    #[must_use]
    pub fn new(raw: serde_json::Value) -> Self {
        Self(raw)
    }

    /// A GeoJSON polygon with a single ring.
    #[must_use]
    pub fn polygon(ring: &[[f64; 2]]) -> Self {
        Self(json!({ "type": "Polygon", "coordinates": [ring] }))
    }

    /// A GeoJSON point.
    #[must_use]
    pub fn point(x: f64, y: f64) -> Self {
        Self(json!({ "type": "Point", "coordinates": [x, y] }))
    }

    #[must_use]
    pub fn raw(&self) -> &serde_json::Value {
        &self.0
    }

    fn coordinates(&self) -> &serde_json::Value {
        self.0.get("coordinates").unwrap_or(&self.0)
    }

    /// Coordinate pairs of the outer ring, skipping malformed entries.
    #[must_use]
    pub fn outer_ring(&self) -> Vec<[f64; 2]> {
        let mut level = self.coordinates();
        // Descend through polygon / multipolygon nesting until the elements
        // are coordinate pairs.
        while let Some(first) = level.as_array().and_then(|a| a.first()) {
            if first.as_array().and_then(|a| a.first()).is_some_and(|v| v.is_array()) {
                level = first;
            } else {
                break;
            }
        }
        level
            .as_array()
            .map(|pairs| pairs.iter().filter_map(pair).collect())
            .unwrap_or_default()
    }

    /// Number of distinct points in the outer ring.
    #[must_use]
    pub fn distinct_points(&self) -> usize {
        self.outer_ring()
            .iter()
            .map(|[x, y]| (x.to_bits(), y.to_bits()))
            .collect::<HashSet<_>>()
            .len()
    }

    /// The coordinates of a point geometry.
    #[must_use]
    pub fn as_point(&self) -> Option<[f64; 2]> {
        pair(self.coordinates())
    }
}

fn pair(value: &serde_json::Value) -> Option<[f64; 2]> {
    let items = value.as_array()?;
    if items.len() < 2 {
        return None;
    }
    let x = items[0].as_f64()?;
    let y = items[1].as_f64()?;
    (x.is_finite() && y.is_finite()).then_some([x, y])
}
