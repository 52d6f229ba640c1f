use serde_json::json;

use crate::entity::Entity;
use crate::error::SerializeError;
use crate::validate::{ErrorDescriptor, RuleKind};

/// A rule spanning several fields of one entity.
///
/// Kinds list their rules in their [`KindDefinition`](crate::KindDefinition).
/// Validation calls [`check`](Self::check) after the per-field rules;
/// serialization calls [`precondition`](Self::precondition) and refuses to
/// build a wire body when it fails.
///
/// Most rules only need `check`. Implement `precondition` when the backend
/// would reject or corrupt data that violates the rule.
pub trait CrossFieldRule: Send + Sync {
    /// Appends a descriptor for every violation.
    fn check(&self, entity: &Entity, errors: &mut Vec<ErrorDescriptor>);

    /// Returns an error if the entity must not be serialized.
    fn precondition(&self, entity: &Entity) -> Result<(), SerializeError> {
        let _ = entity;
        Ok(())
    }
}

/// A confirmation field must repeat its source field.
#[derive(Debug, Clone, Copy)]
pub struct FieldsMatch {
    pub field: &'static str,
    pub confirmation: &'static str,
}

impl CrossFieldRule for FieldsMatch {
    fn check(&self, entity: &Entity, errors: &mut Vec<ErrorDescriptor>) {
        let value = entity.get_str(self.field).unwrap_or_default();
        let confirmation = entity.get_str(self.confirmation).unwrap_or_default();
        if value.is_empty() && confirmation.is_empty() {
            return;
        }
        if value != confirmation {
            errors.push(
                ErrorDescriptor::new(self.confirmation, RuleKind::Mismatch)
                    .with_arg("other", self.field),
            );
        }
    }
}

/// `begin` must be strictly before `end` when both are set.
#[derive(Debug, Clone, Copy)]
pub struct DateOrder {
    pub begin: &'static str,
    pub end: &'static str,
}

impl DateOrder {
    fn inverted(&self, entity: &Entity) -> bool {
        match (entity.get_date(self.begin), entity.get_date(self.end)) {
            (Some(begin), Some(end)) => begin >= end,
            _ => false,
        }
    }
}

impl CrossFieldRule for DateOrder {
    fn check(&self, entity: &Entity, errors: &mut Vec<ErrorDescriptor>) {
        if self.inverted(entity) {
            errors.push(
                ErrorDescriptor::new(self.begin, RuleKind::TimeOrder).with_arg("end", self.end),
            );
        }
    }

    fn precondition(&self, entity: &Entity) -> Result<(), SerializeError> {
        if self.inverted(entity) {
            return Err(SerializeError::InvertedTimeRange {
                kind: entity.kind(),
                begin: self.begin,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// `min` must not exceed `max` when both are set.
#[derive(Debug, Clone, Copy)]
pub struct NumberOrder {
    pub min: &'static str,
    pub max: &'static str,
}

impl CrossFieldRule for NumberOrder {
    fn check(&self, entity: &Entity, errors: &mut Vec<ErrorDescriptor>) {
        if let (Some(min), Some(max)) = (entity.get_f64(self.min), entity.get_f64(self.max))
            && min > max
        {
            errors.push(
                ErrorDescriptor::new(self.min, RuleKind::NumberOrder).with_arg("max", self.max),
            );
        }
    }
}

/// A polygon must have at least three distinct points.
///
/// A closed ring repeats its first point last, so a triangle written as
/// four pairs passes.
#[derive(Debug, Clone, Copy)]
pub struct PolygonShape {
    pub field: &'static str,
}

pub const MIN_POLYGON_POINTS: usize = 3;

impl PolygonShape {
    fn degenerate(&self, entity: &Entity) -> Option<usize> {
        let geometry = entity.get(self.field)?.as_geometry()?;
        let distinct = geometry.distinct_points();
        (distinct < MIN_POLYGON_POINTS).then_some(distinct)
    }
}

impl CrossFieldRule for PolygonShape {
    fn check(&self, entity: &Entity, errors: &mut Vec<ErrorDescriptor>) {
        if let Some(distinct) = self.degenerate(entity) {
            errors.push(
                ErrorDescriptor::new(self.field, RuleKind::Geometry)
                    .with_arg("distinct_points", distinct)
                    .with_arg("minimum", MIN_POLYGON_POINTS),
            );
        }
    }

    fn precondition(&self, entity: &Entity) -> Result<(), SerializeError> {
        match self.degenerate(entity) {
            Some(distinct_points) => Err(SerializeError::DegenerateGeometry {
                kind: entity.kind(),
                field: self.field,
                distinct_points,
            }),
            None => Ok(()),
        }
    }
}

/// Allowed lifecycle moves of a state field.
///
/// A new entity may only start in one of `initial`. A persisted entity may
/// keep its hydrated state or move along one of `allowed`.
#[derive(Debug, Clone, Copy)]
pub struct Transitions {
    pub field: &'static str,
    pub initial: &'static [&'static str],
    pub allowed: &'static [(&'static str, &'static str)],
}

impl CrossFieldRule for Transitions {
    fn check(&self, entity: &Entity, errors: &mut Vec<ErrorDescriptor>) {
        let current = entity.get_str(self.field).unwrap_or_default();
        if current.is_empty() {
            return;
        }

        let hydrated = entity
            .original(self.field)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty());

        let permitted = match hydrated {
            None if entity.is_new() => self.initial.iter().any(|s| *s == current),
            None => true,
            Some(from) => {
                from == current
                    || self
                        .allowed
                        .iter()
                        .any(|(a, b)| *a == from && *b == current)
            }
        };

        if !permitted {
            errors.push(
                ErrorDescriptor::new(self.field, RuleKind::Transition)
                    .with_arg("from", json!(hydrated))
                    .with_arg("to", current),
            );
        }
    }
}
