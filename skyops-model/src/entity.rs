use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use skyops_schema::{FieldValue, PendingFile, SchemaRegistry};
use skyops_types::{ChangeEvent, ChangeKind, EntityId, EntityKind};

use crate::error::{ModelError, ModelResult, SerializeResult};
use crate::hydrate::{self, DOCUMENTS_KEY, EXTRA_FIELDS_KEY};
use crate::kinds;
use crate::manifest::{Access, FieldKind, KindDefinition};
use crate::serialize::{self, SerializeOptions};
use crate::validate::{self, ErrorDescriptor};
use crate::value::{EntityRef, Geometry, Value};

/// Names starting with this marker are UI-internal and never leave the core.
pub const INTERNAL_MARKER: char = '_';

/// A domain entity of any kind.
///
/// Fixed fields come from the kind's manifest and always have a value
/// (possibly [`Value::Unset`]). Extra fields are the tenant-specific dynamic
/// fields described by the schema registry. Documents are attached document
/// entities, carried on the wire under `extra_fields.documents`.
#[derive(Debug, Clone)]
pub struct Entity {
    kind: EntityKind,
    id: EntityId,
    fields: BTreeMap<&'static str, Value>,
    extra_fields: BTreeMap<String, FieldValue>,
    documents: Vec<Entity>,
    /// Fixed fields as they were when hydrated or constructed.
    original: BTreeMap<&'static str, Value>,
}

impl Entity {
    /// Creates a new, unsaved entity with every fixed field at its default.
    #[must_use]
    pub fn new(kind: EntityKind) -> Self {
        let fields: BTreeMap<_, _> = kinds::definition(kind)
            .fields
            .iter()
            .map(|spec| (spec.name, spec.kind.default_value()))
            .collect();
        Self {
            kind,
            id: EntityId::New,
            original: fields.clone(),
            fields,
            extra_fields: BTreeMap::new(),
            documents: Vec::new(),
        }
    }

    /// Builds an entity from a backend payload. Never fails.
    #[must_use]
    pub fn hydrate(
        kind: EntityKind,
        payload: &serde_json::Value,
        registry: &SchemaRegistry,
    ) -> Self {
        hydrate::hydrate(kind, payload, registry)
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Returns true until the backend has assigned an identifier.
    pub fn is_new(&self) -> bool {
        self.id.is_new()
    }

    pub fn definition(&self) -> &'static KindDefinition {
        kinds::definition(self.kind)
    }

    pub(crate) fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    pub(crate) fn insert_hydrated(&mut self, name: &'static str, value: Value) {
        self.fields.insert(name, value);
    }

    pub(crate) fn insert_extra(&mut self, key: String, value: FieldValue) {
        self.extra_fields.insert(key, value);
    }

    pub(crate) fn set_documents(&mut self, documents: Vec<Entity>) {
        self.documents = documents;
    }

    /// Marks the current fixed fields as the hydrated baseline.
    pub(crate) fn mark_clean(&mut self) {
        self.original = self.fields.clone();
    }

    // ---- reading ----

    /// Value of a fixed field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(Value::as_f64)
    }

    pub fn get_date(&self, field: &str) -> Option<&DateTime<Utc>> {
        self.get(field).and_then(Value::as_date)
    }

    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(Value::as_bool)
    }

    pub fn geometry(&self, field: &str) -> Option<&Geometry> {
        self.get(field).and_then(Value::as_geometry)
    }

    pub fn reference(&self, field: &str) -> Option<&EntityRef> {
        self.get(field).and_then(Value::as_reference)
    }

    /// Owned sub-entities of an entity-list field.
    pub fn entities(&self, field: &str) -> &[Entity] {
        self.get(field).map(Value::as_entities).unwrap_or_default()
    }

    /// Value of a fixed field at hydration (or construction) time.
    pub fn original(&self, field: &str) -> Option<&Value> {
        self.original.get(field)
    }

    pub fn extra(&self, key: &str) -> Option<&FieldValue> {
        self.extra_fields.get(key)
    }

    pub fn extra_fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.extra_fields
    }

    pub fn documents(&self) -> &[Entity] {
        &self.documents
    }

    /// Human-readable label, chosen per kind.
    pub fn display_name(&self) -> String {
        (self.definition().display_name)(self)
    }

    /// Names of editable fixed fields that differ from the hydrated state.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        self.definition()
            .fields
            .iter()
            .filter(|spec| spec.access == Access::Editable)
            .filter(|spec| self.fields.get(spec.name) != self.original.get(spec.name))
            .map(|spec| spec.name)
            .collect()
    }

    /// Local files waiting to be uploaded, keyed by field name.
    ///
    /// Includes file-typed fixed fields and extra fields of this entity;
    /// documents report their own.
    pub fn pending_files(&self) -> Vec<(&str, &PendingFile)> {
        let fixed = self
            .fields
            .iter()
            .filter_map(|(name, v)| Some((*name, v.as_scalar()?.pending_file()?)));
        let extra = self
            .extra_fields
            .iter()
            .filter_map(|(name, v)| Some((name.as_str(), v.pending_file()?)));
        fixed.chain(extra).collect()
    }

    /// For documents: true when a file is attached locally or already
    /// stored on the backend.
    pub fn has_content(&self) -> bool {
        let pending = !self.pending_files().is_empty();
        let remote = self
            .get_str(kinds::document::DOWNLOAD_URL)
            .is_some_and(|url| !url.trim().is_empty());
        pending || remote
    }

    // ---- editing ----

    /// Sets a fixed or extra field.
    ///
    /// Names the manifest does not declare go to the extra fields of kinds
    /// that accept them. Setting [`Value::Unset`] on an extra field removes
    /// it. Returns the applied change.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> ModelResult<ChangeEvent> {
        let value = value.into();
        let definition = self.definition();
        self.check_reserved(field)?;

        let Some(spec) = definition.field(field) else {
            if !definition.accepts_extra_fields {
                return Err(ModelError::UnknownField {
                    kind: self.kind,
                    field: field.to_string(),
                });
            }
            return match value {
                Value::Unset => Ok(self.remove_extra(field).unwrap_or_else(|| {
                    self.event(
                        ChangeKind::ExtraFieldRemoved,
                        field,
                        serde_json::Value::Null,
                        serde_json::Value::Null,
                    )
                })),
                Value::Scalar(v) => self.set_extra(field, v),
                _ => Err(ModelError::TypeMismatch {
                    kind: self.kind,
                    field: field.to_string(),
                    expected: "a scalar extra-field value",
                }),
            };
        };

        if spec.access == Access::Computed {
            return Err(ModelError::ReadOnlyField {
                kind: self.kind,
                field: field.to_string(),
            });
        }
        if !spec.kind.accepts(&value) {
            if let (FieldKind::Entities(expected), Value::Entities(children)) = (spec.kind, &value)
                && let Some(child) = children.iter().find(|c| c.kind != expected)
            {
                return Err(ModelError::WrongKind {
                    expected,
                    actual: child.kind,
                });
            }
            return Err(ModelError::TypeMismatch {
                kind: self.kind,
                field: field.to_string(),
                expected: spec.kind.type_name(),
            });
        }

        let current = value.preview();
        let previous = self
            .fields
            .insert(spec.name, value)
            .map(|v| v.preview())
            .unwrap_or_default();
        Ok(self.event(ChangeKind::Field, spec.name, previous, current))
    }

    /// Sets a dynamic extra field.
    pub fn set_extra(
        &mut self,
        key: &str,
        value: impl Into<FieldValue>,
    ) -> ModelResult<ChangeEvent> {
        let definition = self.definition();
        self.check_reserved(key)?;
        if definition.field(key).is_some() {
            // Fixed names are routed through the manifest.
            return self.set(key, Value::Scalar(value.into()));
        }
        if !definition.accepts_extra_fields {
            return Err(ModelError::UnknownField {
                kind: self.kind,
                field: key.to_string(),
            });
        }

        let value = value.into();
        let current = value.preview();
        let previous = self
            .extra_fields
            .insert(key.to_string(), value)
            .map(|v| v.preview())
            .unwrap_or_default();
        Ok(self.event(ChangeKind::ExtraField, key, previous, current))
    }

    /// Removes a dynamic extra field, returning the change if it existed.
    pub fn remove_extra(&mut self, key: &str) -> Option<ChangeEvent> {
        let previous = self.extra_fields.remove(key)?;
        Some(self.event(
            ChangeKind::ExtraFieldRemoved,
            key,
            previous.preview(),
            serde_json::Value::Null,
        ))
    }

    /// Mutable access to an entity-list field, for editing volumes or
    /// segments in place.
    pub fn entities_mut(&mut self, field: &str) -> ModelResult<&mut Vec<Entity>> {
        let kind = self.kind;
        let spec = self.definition().field(field).ok_or_else(|| ModelError::UnknownField {
            kind,
            field: field.to_string(),
        })?;
        if !matches!(spec.kind, FieldKind::Entities(_)) || spec.access != Access::Editable {
            return Err(ModelError::TypeMismatch {
                kind,
                field: field.to_string(),
                expected: spec.kind.type_name(),
            });
        }
        // A malformed hydrated value is replaced by an empty list.
        if !matches!(self.fields.get(spec.name), Some(Value::Entities(_))) {
            self.fields.insert(spec.name, Value::Entities(Vec::new()));
        }
        match self.fields.get_mut(spec.name) {
            Some(Value::Entities(children)) => Ok(children),
            _ => Err(ModelError::TypeMismatch {
                kind,
                field: field.to_string(),
                expected: spec.kind.type_name(),
            }),
        }
    }

    /// Attaches a document entity.
    pub fn add_document(&mut self, document: Entity) -> ModelResult<()> {
        if document.kind != EntityKind::Document {
            return Err(ModelError::WrongKind {
                expected: EntityKind::Document,
                actual: document.kind,
            });
        }
        if !self.definition().has_documents {
            return Err(ModelError::UnknownField {
                kind: self.kind,
                field: DOCUMENTS_KEY.to_string(),
            });
        }
        self.documents.push(document);
        Ok(())
    }

    pub fn documents_mut(&mut self) -> &mut Vec<Entity> {
        &mut self.documents
    }

    fn check_reserved(&self, field: &str) -> ModelResult<()> {
        let reserved = field.starts_with(INTERNAL_MARKER)
            || field == EXTRA_FIELDS_KEY
            || field == DOCUMENTS_KEY
            || self.definition().is_id_key(field);
        if reserved {
            return Err(ModelError::ReservedField {
                kind: self.kind,
                field: field.to_string(),
            });
        }
        Ok(())
    }

    fn event(
        &self,
        change: ChangeKind,
        field: &str,
        previous: serde_json::Value,
        current: serde_json::Value,
    ) -> ChangeEvent {
        ChangeEvent::new(self.kind, self.id.clone(), change, field, previous, current)
    }

    // ---- whole-entity operations ----

    /// Validates against the manifest, the kind's schema and the kind's
    /// cross-field rules.
    pub fn validate(&self, registry: &SchemaRegistry) -> Vec<ErrorDescriptor> {
        validate::validate(self, registry)
    }

    /// Produces the JSON body the backend expects.
    pub fn as_backend_format(
        &self,
        options: &SerializeOptions,
    ) -> SerializeResult<serde_json::Value> {
        serialize::as_backend_format(self, options)
    }

    /// Equality over everything that survives a wire round trip: kind,
    /// identifier, editable fixed fields, non-file extra fields and
    /// documents. Computed and local fields are ignored.
    pub fn eq_ignoring_internal(&self, other: &Entity) -> bool {
        if self.kind != other.kind || self.id != other.id {
            return false;
        }

        let fixed_equal = self
            .definition()
            .fields
            .iter()
            .filter(|spec| spec.access == Access::Editable)
            .all(|spec| {
                let unset = Value::Unset;
                let a = self.fields.get(spec.name).unwrap_or(&unset);
                let b = other.fields.get(spec.name).unwrap_or(&unset);
                match (a, b) {
                    (Value::Entities(xs), Value::Entities(ys)) => {
                        xs.len() == ys.len()
                            && xs.iter().zip(ys).all(|(x, y)| x.eq_ignoring_internal(y))
                    }
                    (Value::Scalar(FieldValue::File(_)), _)
                    | (_, Value::Scalar(FieldValue::File(_))) => true,
                    _ if matches!(spec.kind, FieldKind::Choice(_)) => {
                        a == b || (a.is_empty() && b.is_empty())
                    }
                    _ => a == b,
                }
            });

        let wire_extra = |e: &Entity| -> BTreeMap<String, FieldValue> {
            e.extra_fields
                .iter()
                .filter(|(_, v)| !matches!(v, FieldValue::File(_)))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        };

        fixed_equal
            && wire_extra(self) == wire_extra(other)
            && self.documents.len() == other.documents.len()
            && self
                .documents
                .iter()
                .zip(&other.documents)
                .all(|(a, b)| a.eq_ignoring_internal(b))
    }
}

impl PartialEq for Entity {
    /// Structural equality, ignoring the hydrated baseline.
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.id == other.id
            && self.fields == other.fields
            && self.extra_fields == other.extra_fields
            && self.documents == other.documents
    }
}
