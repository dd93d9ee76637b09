//! TextAttribute - Unbounded string attribute

use super::{purge_expired, ChangeHandler, ManagedAttribute, TickResult};
use crate::error::AttributeError;
use crate::event::{Listeners, SubscriptionId};
use crate::modifier::{Modifier, ModifierId};
use crate::types::{AttributeKind, Slot, Tick, Value};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A string attribute
///
/// Has a single facet: every slot reads and writes the same text. Modifiers
/// can be attached and expire on schedule but never alter the value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextAttribute {
    name: String,
    value: String,
    #[serde(default)]
    modifiers: Vec<Modifier>,
    #[serde(skip)]
    on_changed: Listeners<dyn FnMut(&dyn ManagedAttribute)>,
}

impl TextAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        TextAttribute {
            name: name.into(),
            value: value.into(),
            modifiers: Vec::new(),
            on_changed: Listeners::new(),
        }
    }

    pub fn get(&self, _slot: Slot) -> &str {
        &self.value
    }

    pub fn get_raw(&self, _slot: Slot) -> &str {
        &self.value
    }

    /// Replace the text; only text input is accepted
    pub fn set(&mut self, value: impl Into<Value>, _slot: Slot) -> Result<(), AttributeError> {
        let text = Self::coerce(value.into())?;
        if text != self.value {
            self.value = text;
            trace!(attribute = %self.name, value = %self.value, "text assigned");
            self.raise_changed();
        }
        Ok(())
    }

    /// Append to the text
    pub fn add(&mut self, value: impl Into<Value>, _slot: Slot) -> Result<(), AttributeError> {
        let text = Self::coerce(value.into())?;
        if !text.is_empty() {
            self.value.push_str(&text);
            trace!(attribute = %self.name, value = %self.value, "text appended");
            self.raise_changed();
        }
        Ok(())
    }

    fn coerce(value: Value) -> Result<String, AttributeError> {
        match value {
            Value::Text(text) => Ok(text),
            other => Err(AttributeError::invalid(AttributeKind::Text, other.describe())),
        }
    }

    fn raise_changed(&mut self) {
        let mut listeners = self.on_changed.take();
        let attribute: &dyn ManagedAttribute = &*self;
        listeners.notify(|handler| handler(attribute));
        self.on_changed.restore(listeners);
    }
}

impl ManagedAttribute for TextAttribute {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> AttributeKind {
        AttributeKind::Text
    }

    fn value(&self, slot: Slot) -> Value {
        Value::Text(self.get(slot).to_string())
    }

    fn raw_value(&self, slot: Slot) -> Value {
        Value::Text(self.get_raw(slot).to_string())
    }

    fn set(&mut self, value: Value, slot: Slot) -> Result<(), AttributeError> {
        TextAttribute::set(self, value, slot)
    }

    fn add(&mut self, value: Value, slot: Slot) -> Result<(), AttributeError> {
        TextAttribute::add(self, value, slot)
    }

    fn update(&mut self, tick: Tick) -> TickResult {
        let mut result = TickResult {
            expired_modifiers: purge_expired(&self.name, &mut self.modifiers, tick),
            notifications: 0,
        };
        if !result.expired_modifiers.is_empty() {
            self.raise_changed();
            result.notifications += 1;
        }
        result
    }

    fn add_modifier(&mut self, modifier: Modifier) {
        self.modifiers.push(modifier);
    }

    fn remove_modifier(&mut self, id: ModifierId) -> Option<Modifier> {
        let index = self.modifiers.iter().position(|m| m.id() == id)?;
        Some(self.modifiers.remove(index))
    }

    fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    fn subscribe(&mut self, handler: ChangeHandler) -> SubscriptionId {
        self.on_changed.subscribe(handler)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.on_changed.unsubscribe(id)
    }
}

impl PartialEq for TextAttribute {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value && self.modifiers == other.modifiers
    }
}
