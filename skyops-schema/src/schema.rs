use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declared type of a dynamic field.
///
/// Schema documents spell these `String`, `Number`, `Date`, `Bool`, `File`;
/// lowercase spellings are accepted too. Any other declared type
/// deserializes as [`FieldType::Unknown`]: the field is kept, its value
/// stays raw and it is never type-checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(alias = "string", alias = "text")]
    String,
    #[serde(alias = "number")]
    Number,
    #[serde(alias = "date", alias = "datetime", alias = "DateTime")]
    Date,
    #[serde(alias = "bool", alias = "boolean", alias = "Boolean")]
    Bool,
    #[serde(alias = "file")]
    File,
    #[default]
    #[serde(other)]
    Unknown,
}

impl FieldType {
    /// Returns true for the five types the coercion layer understands.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, FieldType::Unknown)
    }
}

/// Describes one dynamic field of an entity kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "minLength")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "maxLength")]
    pub max_length: Option<usize>,
    /// Everything else the document carries (labels, placeholders, ...),
    /// preserved for presentation code.
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl FieldDescriptor {
    /// Creates a descriptor of the given type.
    #[must_use]
    pub fn new(field_type: FieldType, required: bool) -> Self {
        Self {
            field_type,
            required,
            min_length: None,
            max_length: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Shorthand for a string field.
    #[must_use]
    pub fn string(required: bool) -> Self {
        Self::new(FieldType::String, required)
    }

    /// Shorthand for a numeric field.
    #[must_use]
    pub fn number(required: bool) -> Self {
        Self::new(FieldType::Number, required)
    }

    /// Shorthand for a date field.
    #[must_use]
    pub fn date(required: bool) -> Self {
        Self::new(FieldType::Date, required)
    }

    /// Shorthand for a boolean field.
    #[must_use]
    pub fn bool(required: bool) -> Self {
        Self::new(FieldType::Bool, required)
    }

    /// Shorthand for a file attachment field.
    #[must_use]
    pub fn file(required: bool) -> Self {
        Self::new(FieldType::File, required)
    }

    /// Sets length limits, counted in characters.
    #[must_use]
    pub fn with_length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }
}

/// The dynamic fields of one entity kind.
///
/// Serializes as a plain object: `{"serial_number": {"type": "String", "required": true}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: BTreeMap<String, FieldDescriptor>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Adds a field, replacing any previous descriptor with the same name.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        self.fields.insert(name.into(), descriptor);
        self
    }

    /// Looks up a field descriptor.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    /// Declared type of a field, if the schema knows the field.
    #[must_use]
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields.get(name).map(|d| d.field_type)
    }

    /// Iterates descriptors in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Names of the fields marked `required`, in name order.
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, d)| d.required)
            .map(|(k, _)| k.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
