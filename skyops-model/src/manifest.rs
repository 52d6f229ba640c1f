//! Field manifests.
//!
//! Each entity kind declares its fixed fields once, as static data: wire
//! name, value kind, who may write it and its validation limits. Hydration,
//! serialization and validation are generic code driven by these tables.

use std::fmt;

use skyops_schema::FieldType;
use skyops_types::EntityKind;

use crate::entity::Entity;
use crate::rules::CrossFieldRule;
use crate::value::Value;

/// Kind of value a fixed field holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text,
    /// Text that must look like an e-mail address.
    Email,
    /// Text restricted to a closed set of options.
    Choice(&'static [&'static str]),
    Number,
    Bool,
    Date,
    File,
    Polygon,
    Point,
    /// Opaque structured data passed through unchanged.
    Json,
    /// Another entity, written as the value of its `key`.
    Reference { kind: EntityKind, key: &'static str },
    /// A list of other entities, written as a list of keys.
    ReferenceList { kind: EntityKind, key: &'static str },
    /// Owned sub-entities, written inline.
    Entities(EntityKind),
}

impl FieldKind {
    /// The scalar type used for wire coercion, for scalar kinds.
    #[must_use]
    pub const fn scalar_type(&self) -> Option<FieldType> {
        match self {
            FieldKind::Text | FieldKind::Email | FieldKind::Choice(_) => Some(FieldType::String),
            FieldKind::Number => Some(FieldType::Number),
            FieldKind::Bool => Some(FieldType::Bool),
            FieldKind::Date => Some(FieldType::Date),
            FieldKind::File => Some(FieldType::File),
            _ => None,
        }
    }

    /// Value of the field on a freshly constructed entity.
    ///
    /// Choices start unset: an empty string is not a member of any option
    /// list.
    #[must_use]
    pub fn default_value(&self) -> Value {
        match self {
            FieldKind::Text | FieldKind::Email => Value::from(""),
            FieldKind::Bool => Value::from(false),
            FieldKind::ReferenceList { .. } => Value::References(Vec::new()),
            FieldKind::Entities(_) => Value::Entities(Vec::new()),
            _ => Value::Unset,
        }
    }

    /// Name used in type-mismatch messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text | FieldKind::Email | FieldKind::Choice(_) => "string",
            FieldKind::Number => "number",
            FieldKind::Bool => "bool",
            FieldKind::Date => "date",
            FieldKind::File => "file",
            FieldKind::Polygon => "polygon",
            FieldKind::Point => "point",
            FieldKind::Json => "json",
            FieldKind::Reference { .. } => "reference",
            FieldKind::ReferenceList { .. } => "reference list",
            FieldKind::Entities(_) => "entity list",
        }
    }

    /// Returns true if `value` has the runtime shape this kind expects.
    ///
    /// `Unset` fits every kind.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Unset) => true,
            (kind, Value::Scalar(v)) => kind.scalar_type().is_some_and(|t| v.matches(t)),
            (FieldKind::Polygon | FieldKind::Point, Value::Geometry(_)) => true,
            (FieldKind::Json, Value::Json(_)) => true,
            (FieldKind::Reference { .. }, Value::Reference(_)) => true,
            (FieldKind::ReferenceList { .. }, Value::References(_)) => true,
            (FieldKind::Entities(kind), Value::Entities(children)) => {
                children.iter().all(|c| c.kind() == *kind)
            }
            _ => false,
        }
    }
}

/// Who may write a fixed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Read from and written to the wire, settable by the UI.
    Editable,
    /// Filled by the backend: hydrated, never set, never written back.
    Computed,
    /// UI-only state: never hydrated, never written.
    Local,
}

/// One fixed field of an entity kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Wire name, also the name used with `Entity::set`.
    pub name: &'static str,
    pub kind: FieldKind,
    pub access: Access,
    pub required: bool,
    /// Leave the key out of the wire body when the value is empty.
    pub omit_empty: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl FieldSpec {
    #[must_use]
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            access: Access::Editable,
            required: false,
            omit_empty: false,
            min_length: None,
            max_length: None,
            min: None,
            max: None,
        }
    }

    #[must_use]
    pub const fn text(name: &'static str) -> Self {
        Self::new(name, FieldKind::Text)
    }

    #[must_use]
    pub const fn email(name: &'static str) -> Self {
        Self::new(name, FieldKind::Email)
    }

    #[must_use]
    pub const fn choice(name: &'static str, options: &'static [&'static str]) -> Self {
        Self::new(name, FieldKind::Choice(options))
    }

    #[must_use]
    pub const fn number(name: &'static str) -> Self {
        Self::new(name, FieldKind::Number)
    }

    #[must_use]
    pub const fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldKind::Bool)
    }

    #[must_use]
    pub const fn date(name: &'static str) -> Self {
        Self::new(name, FieldKind::Date)
    }

    #[must_use]
    pub const fn file(name: &'static str) -> Self {
        Self::new(name, FieldKind::File)
    }

    #[must_use]
    pub const fn polygon(name: &'static str) -> Self {
        Self::new(name, FieldKind::Polygon)
    }

    #[must_use]
    pub const fn point(name: &'static str) -> Self {
        Self::new(name, FieldKind::Point)
    }

    #[must_use]
    pub const fn json(name: &'static str) -> Self {
        Self::new(name, FieldKind::Json)
    }

    #[must_use]
    pub const fn reference(name: &'static str, kind: EntityKind, key: &'static str) -> Self {
        Self::new(name, FieldKind::Reference { kind, key })
    }

    #[must_use]
    pub const fn references(name: &'static str, kind: EntityKind, key: &'static str) -> Self {
        Self::new(name, FieldKind::ReferenceList { kind, key })
    }

    #[must_use]
    pub const fn entities(name: &'static str, kind: EntityKind) -> Self {
        Self::new(name, FieldKind::Entities(kind))
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub const fn computed(mut self) -> Self {
        self.access = Access::Computed;
        self
    }

    #[must_use]
    pub const fn local(mut self) -> Self {
        self.access = Access::Local;
        self
    }

    #[must_use]
    pub const fn omit_empty(mut self) -> Self {
        self.omit_empty = true;
        self
    }

    /// Length limits in characters.
    #[must_use]
    pub const fn length(mut self, min: usize, max: usize) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }

    #[must_use]
    pub const fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    #[must_use]
    pub const fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Inclusive numeric range.
    #[must_use]
    pub const fn range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    #[must_use]
    pub const fn at_least(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }
}

/// Static description of an entity kind.
pub struct KindDefinition {
    pub kind: EntityKind,
    /// Wire key of the identifier. Embedded kinds have none.
    pub id_key: Option<&'static str>,
    /// The field naming the owning user, if the kind has one.
    pub owner_key: Option<&'static str>,
    pub fields: &'static [FieldSpec],
    pub rules: &'static [&'static dyn CrossFieldRule],
    /// Whether unknown wire keys are kept as extra fields.
    pub accepts_extra_fields: bool,
    /// Whether attached documents are read from `extra_fields.documents`.
    pub has_documents: bool,
    pub display_name: fn(&Entity) -> String,
}

impl KindDefinition {
    /// Looks up a fixed field by wire name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        let fields: &'static [FieldSpec] = self.fields;
        fields.iter().find(|f| f.name == name)
    }

    /// Returns true if `name` is the identifier key.
    #[must_use]
    pub fn is_id_key(&self, name: &str) -> bool {
        self.id_key == Some(name)
    }
}

impl fmt::Debug for KindDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindDefinition")
            .field("kind", &self.kind)
            .field("id_key", &self.id_key)
            .field("owner_key", &self.owner_key)
            .field("fields", &self.fields.len())
            .field("rules", &self.rules.len())
            .finish_non_exhaustive()
    }
}
