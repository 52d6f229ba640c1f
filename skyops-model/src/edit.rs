use std::fmt;

use skyops_schema::{FieldValue, SchemaRegistry};
use skyops_types::ChangeEvent;
use tracing::{debug, trace};

use crate::entity::Entity;
use crate::error::{ModelError, ModelResult};
use crate::validate::ErrorDescriptor;
use crate::value::Value;

/// Receives changes applied through an [`EditSession`].
///
/// Only `on_change` is required. Closures taking a `&ChangeEvent` implement
/// the trait directly.
pub trait ChangeListener: Send + Sync {
    /// Called once per applied change whose value actually differs.
    fn on_change(&self, event: &ChangeEvent);

    /// Called when the entity refused a change.
    fn on_rejected(&self, field: &str, error: &ModelError) {
        let _ = (field, error);
    }
}

impl<F> ChangeListener for F
where
    F: Fn(&ChangeEvent) + Send + Sync,
{
    fn on_change(&self, event: &ChangeEvent) {
        self(event);
    }
}

/// An entity being edited, with subscribers notified of every change.
pub struct EditSession {
    entity: Entity,
    listeners: Vec<Box<dyn ChangeListener>>,
}

impl EditSession {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: impl ChangeListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn into_entity(self) -> Entity {
        self.entity
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> ModelResult<()> {
        let result = self.entity.set(field, value);
        self.publish(field, result)
    }

    pub fn set_extra(&mut self, key: &str, value: impl Into<FieldValue>) -> ModelResult<()> {
        let result = self.entity.set_extra(key, value);
        self.publish(key, result)
    }

    pub fn remove_extra(&mut self, key: &str) {
        if let Some(event) = self.entity.remove_extra(key) {
            self.notify(&event);
        }
    }

    pub fn validate(&self, registry: &SchemaRegistry) -> Vec<ErrorDescriptor> {
        self.entity.validate(registry)
    }

    fn publish(&self, field: &str, result: ModelResult<ChangeEvent>) -> ModelResult<()> {
        match result {
            Ok(event) => {
                if event.is_effective() {
                    self.notify(&event);
                } else {
                    trace!(field, "value unchanged, nothing published");
                }
                Ok(())
            }
            Err(e) => {
                debug!(field, error = %e, "change rejected");
                for listener in &self.listeners {
                    listener.on_rejected(field, &e);
                }
                Err(e)
            }
        }
    }

    fn notify(&self, event: &ChangeEvent) {
        for listener in &self.listeners {
            listener.on_change(event);
        }
    }
}

impl fmt::Debug for EditSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditSession")
            .field("entity", &self.entity)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
