//! Entity validation.
//!
//! Validation never fails and never stops early: it returns every violated
//! rule as an [`ErrorDescriptor`]. Order is fixed fields in manifest order,
//! then extra fields in schema order, then cross-field rules, then owned
//! sub-entities and documents with their path prefixed.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use skyops_schema::{FieldDescriptor, Schema, SchemaRegistry};

use crate::entity::Entity;
use crate::hydrate::DOCUMENTS_KEY;
use crate::manifest::{Access, FieldKind, FieldSpec};
use crate::value::Value;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// The rule a descriptor reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Required,
    Type,
    MinLength,
    MaxLength,
    Email,
    Choice,
    Range,
    Mismatch,
    Geometry,
    TimeOrder,
    NumberOrder,
    Transition,
}

/// One violated rule, with the arguments a UI needs to render a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    /// Field path: `name`, `serial_number` or `operation_volumes[0].max_altitude`.
    pub field: String,
    pub rule: RuleKind,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub args: BTreeMap<String, serde_json::Value>,
}

impl ErrorDescriptor {
    #[must_use]
    pub fn new(field: impl Into<String>, rule: RuleKind) -> Self {
        Self {
            field: field.into(),
            rule,
            args: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_arg(mut self, name: &str, value: impl Into<serde_json::Value>) -> Self {
        self.args.insert(name.to_string(), value.into());
        self
    }

    fn prefixed(mut self, prefix: &str) -> Self {
        self.field = format!("{prefix}{}", self.field);
        self
    }
}

/// Validates an entity against its manifest, its kind's schema and its
/// cross-field rules.
#[must_use]
pub fn validate(entity: &Entity, registry: &SchemaRegistry) -> Vec<ErrorDescriptor> {
    let mut errors = Vec::new();
    let definition = entity.definition();

    for spec in definition.fields {
        if spec.access == Access::Computed {
            continue;
        }
        if let Some(value) = entity.get(spec.name) {
            check_fixed(spec, value, &mut errors);
        }
    }

    check_extra(entity, registry.schema(entity.kind()), &mut errors);

    for rule in definition.rules {
        rule.check(entity, &mut errors);
    }

    for spec in definition.fields {
        if !matches!(spec.kind, FieldKind::Entities(_)) {
            continue;
        }
        let children = entity.get(spec.name).map(Value::as_entities).unwrap_or_default();
        for (index, child) in children.iter().enumerate() {
            let prefix = format!("{}[{index}].", spec.name);
            errors.extend(
                validate(child, registry)
                    .into_iter()
                    .map(|e| e.prefixed(&prefix)),
            );
        }
    }

    for (index, document) in entity.documents().iter().enumerate() {
        let prefix = format!("{DOCUMENTS_KEY}[{index}].");
        errors.extend(
            validate(document, registry)
                .into_iter()
                .map(|e| e.prefixed(&prefix)),
        );
    }

    errors
}

fn check_fixed(spec: &FieldSpec, value: &Value, errors: &mut Vec<ErrorDescriptor>) {
    if value.is_empty() {
        if spec.required {
            errors.push(ErrorDescriptor::new(spec.name, RuleKind::Required));
        }
        return;
    }

    if !spec.kind.accepts(value) {
        errors.push(
            ErrorDescriptor::new(spec.name, RuleKind::Type)
                .with_arg("expected", spec.kind.type_name()),
        );
        return;
    }

    if let Some(text) = value.as_str() {
        check_length(spec.name, text, spec.min_length, spec.max_length, errors);
    }

    match spec.kind {
        FieldKind::Email => {
            if !value.as_str().is_some_and(|s| EMAIL.is_match(s.trim())) {
                errors.push(ErrorDescriptor::new(spec.name, RuleKind::Email));
            }
        }
        FieldKind::Choice(options) => {
            let selected = value.as_str().unwrap_or_default();
            if !options.iter().any(|option| *option == selected) {
                errors.push(
                    ErrorDescriptor::new(spec.name, RuleKind::Choice)
                        .with_arg("options", options.to_vec()),
                );
            }
        }
        FieldKind::Number => {
            if let Some(n) = value.as_f64() {
                let below = spec.min.is_some_and(|min| n < min);
                let above = spec.max.is_some_and(|max| n > max);
                if below || above {
                    let mut descriptor = ErrorDescriptor::new(spec.name, RuleKind::Range);
                    if let Some(min) = spec.min {
                        descriptor = descriptor.with_arg("min", min);
                    }
                    if let Some(max) = spec.max {
                        descriptor = descriptor.with_arg("max", max);
                    }
                    errors.push(descriptor);
                }
            }
        }
        FieldKind::Point => {
            if value.as_geometry().and_then(|g| g.as_point()).is_none() {
                errors.push(
                    ErrorDescriptor::new(spec.name, RuleKind::Geometry)
                        .with_arg("expected", "point"),
                );
            }
        }
        _ => {}
    }
}

fn check_extra(entity: &Entity, schema: &Schema, errors: &mut Vec<ErrorDescriptor>) {
    for (name, descriptor) in schema.fields() {
        let value = entity.extra(name).filter(|v| !v.is_empty());
        let Some(value) = value else {
            if descriptor.required {
                errors.push(ErrorDescriptor::new(name, RuleKind::Required));
            }
            continue;
        };

        if !value.matches(descriptor.field_type) {
            errors.push(type_mismatch(name, descriptor));
            continue;
        }

        if let Some(text) = value.as_str() {
            check_length(name, text, descriptor.min_length, descriptor.max_length, errors);
        }
    }
}

fn type_mismatch(name: &str, descriptor: &FieldDescriptor) -> ErrorDescriptor {
    let expected = serde_json::to_value(descriptor.field_type).unwrap_or_default();
    ErrorDescriptor::new(name, RuleKind::Type).with_arg("expected", expected)
}

fn check_length(
    name: &str,
    text: &str,
    min: Option<usize>,
    max: Option<usize>,
    errors: &mut Vec<ErrorDescriptor>,
) {
    let length = text.chars().count();
    if let Some(min) = min
        && length < min
    {
        errors.push(ErrorDescriptor::new(name, RuleKind::MinLength).with_arg("min", min));
    }
    if let Some(max) = max
        && length > max
    {
        errors.push(ErrorDescriptor::new(name, RuleKind::MaxLength).with_arg("max", max));
    }
}
