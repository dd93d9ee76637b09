//! Attributes - Named values with bounds, regeneration and modifiers
//!
//! Every kind shares the [`ManagedAttribute`] contract. Numeric and vector
//! kinds are [`BoundedAttribute`]s over an [`AttributeValue`]; strings are
//! [`TextAttribute`]s. [`Attribute`] is the closed, kind-tagged union stored
//! by the container and used for serialization.

mod bounded;
mod kind;
mod text;

pub use bounded::BoundedAttribute;
pub use kind::AttributeValue;
pub use text::TextAttribute;

use crate::error::AttributeError;
use crate::event::SubscriptionId;
use crate::modifier::{Modifier, ModifierId};
use crate::types::{AttributeKind, Slot, Tick, Value};
use glam::IVec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Handler for the "attribute changed" notification
pub type ChangeHandler = Box<dyn FnMut(&dyn ManagedAttribute)>;

/// Common capability interface of every attribute kind
pub trait ManagedAttribute {
    /// Stable identifier, used as the container key
    fn name(&self) -> &str;

    fn kind(&self) -> AttributeKind;

    /// Computed value of a slot (raw value folded through active modifiers)
    fn value(&self, slot: Slot) -> Value;

    /// Stored value of a slot, ignoring modifiers
    fn raw_value(&self, slot: Slot) -> Value;

    /// Coerce `value` and assign it to the raw slot
    fn set(&mut self, value: Value, slot: Slot) -> Result<(), AttributeError>;

    /// Coerce `value` and add it to the raw slot
    fn add(&mut self, value: Value, slot: Slot) -> Result<(), AttributeError>;

    /// Purge expired modifiers, then apply one regeneration step
    fn update(&mut self, tick: Tick) -> TickResult;

    fn add_modifier(&mut self, modifier: Modifier);

    /// Detach a modifier without firing its elapsed notification
    fn remove_modifier(&mut self, id: ModifierId) -> Option<Modifier>;

    /// Active modifiers in evaluation order
    fn modifiers(&self) -> &[Modifier];

    fn subscribe(&mut self, handler: ChangeHandler) -> SubscriptionId;

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}

/// Result of a single attribute update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickResult {
    /// IDs of modifiers purged this tick
    pub expired_modifiers: Vec<ModifierId>,
    /// Number of changed notifications raised
    pub notifications: u32,
}

impl TickResult {
    pub fn changed(&self) -> bool {
        self.notifications > 0
    }
}

/// Remove every modifier expired at `tick`, firing its elapsed notification
///
/// Returns the ids of the purged modifiers.
pub(crate) fn purge_expired(
    name: &str,
    modifiers: &mut Vec<Modifier>,
    tick: Tick,
) -> Vec<ModifierId> {
    let (expired, active): (Vec<Modifier>, Vec<Modifier>) = std::mem::take(modifiers)
        .into_iter()
        .partition(|m| m.is_expired(tick));
    *modifiers = active;

    expired
        .into_iter()
        .map(|mut modifier| {
            debug!(
                attribute = name,
                modifier = %modifier.id(),
                expiry_tick = modifier.expiry_tick(),
                tick,
                "modifier elapsed"
            );
            modifier.raise_elapsed();
            modifier.id()
        })
        .collect()
}

// ============================================================================
// Kind-tagged union
// ============================================================================

/// An attribute of any supported kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Attribute {
    Int(BoundedAttribute<i32>),
    Float(BoundedAttribute<f32>),
    Vector(BoundedAttribute<IVec3>),
    Text(TextAttribute),
}

impl Attribute {
    /// Build an attribute of `kind` from loosely-typed slot values
    ///
    /// Missing bounds use the kind's default range, a missing value is the
    /// kind's zero and a missing regen is zero. Text attributes only accept
    /// `value`.
    pub fn from_values(
        kind: AttributeKind,
        name: impl Into<String>,
        min: Option<&Value>,
        value: Option<&Value>,
        max: Option<&Value>,
        regen: Option<&Value>,
    ) -> Result<Self, AttributeError> {
        let name = name.into();
        Ok(match kind {
            AttributeKind::Int => {
                Attribute::Int(BoundedAttribute::from_values(name, min, value, max, regen)?)
            }
            AttributeKind::Float => {
                Attribute::Float(BoundedAttribute::from_values(name, min, value, max, regen)?)
            }
            AttributeKind::Vector => {
                Attribute::Vector(BoundedAttribute::from_values(name, min, value, max, regen)?)
            }
            AttributeKind::Text => {
                if let Some(slot) = [(Slot::Min, min), (Slot::Max, max), (Slot::Regen, regen)]
                    .iter()
                    .find_map(|(slot, v)| v.map(|_| *slot))
                {
                    return Err(AttributeError::UnsupportedSlot(format!(
                        "{} on text attribute '{}'",
                        slot, name
                    )));
                }
                let text = match value {
                    Some(Value::Text(s)) => s.clone(),
                    Some(other) => {
                        return Err(AttributeError::InvalidValueType {
                            expected: AttributeKind::Text,
                            found: other.describe(),
                        })
                    }
                    None => String::new(),
                };
                Attribute::Text(TextAttribute::new(name, text))
            }
        })
    }

    /// Typed `set` accepting anything convertible to a [`Value`]
    pub fn set(&mut self, value: impl Into<Value>, slot: Slot) -> Result<(), AttributeError> {
        self.inner_mut().set(value.into(), slot)
    }

    /// Typed `add` accepting anything convertible to a [`Value`]
    pub fn add(&mut self, value: impl Into<Value>, slot: Slot) -> Result<(), AttributeError> {
        self.inner_mut().add(value.into(), slot)
    }

    pub fn as_int(&self) -> Option<&BoundedAttribute<i32>> {
        match self {
            Attribute::Int(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_int_mut(&mut self) -> Option<&mut BoundedAttribute<i32>> {
        match self {
            Attribute::Int(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<&BoundedAttribute<f32>> {
        match self {
            Attribute::Float(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_float_mut(&mut self) -> Option<&mut BoundedAttribute<f32>> {
        match self {
            Attribute::Float(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&BoundedAttribute<IVec3>> {
        match self {
            Attribute::Vector(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_vector_mut(&mut self) -> Option<&mut BoundedAttribute<IVec3>> {
        match self {
            Attribute::Vector(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextAttribute> {
        match self {
            Attribute::Text(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextAttribute> {
        match self {
            Attribute::Text(a) => Some(a),
            _ => None,
        }
    }

    fn inner(&self) -> &dyn ManagedAttribute {
        match self {
            Attribute::Int(a) => a,
            Attribute::Float(a) => a,
            Attribute::Vector(a) => a,
            Attribute::Text(a) => a,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ManagedAttribute {
        match self {
            Attribute::Int(a) => a,
            Attribute::Float(a) => a,
            Attribute::Vector(a) => a,
            Attribute::Text(a) => a,
        }
    }
}

impl ManagedAttribute for Attribute {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn kind(&self) -> AttributeKind {
        self.inner().kind()
    }

    fn value(&self, slot: Slot) -> Value {
        self.inner().value(slot)
    }

    fn raw_value(&self, slot: Slot) -> Value {
        self.inner().raw_value(slot)
    }

    fn set(&mut self, value: Value, slot: Slot) -> Result<(), AttributeError> {
        self.inner_mut().set(value, slot)
    }

    fn add(&mut self, value: Value, slot: Slot) -> Result<(), AttributeError> {
        self.inner_mut().add(value, slot)
    }

    fn update(&mut self, tick: Tick) -> TickResult {
        self.inner_mut().update(tick)
    }

    fn add_modifier(&mut self, modifier: Modifier) {
        self.inner_mut().add_modifier(modifier)
    }

    fn remove_modifier(&mut self, id: ModifierId) -> Option<Modifier> {
        self.inner_mut().remove_modifier(id)
    }

    fn modifiers(&self) -> &[Modifier] {
        self.inner().modifiers()
    }

    fn subscribe(&mut self, handler: ChangeHandler) -> SubscriptionId {
        self.inner_mut().subscribe(handler)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.inner_mut().unsubscribe(id)
    }
}

impl From<BoundedAttribute<i32>> for Attribute {
    fn from(a: BoundedAttribute<i32>) -> Self {
        Attribute::Int(a)
    }
}

impl From<BoundedAttribute<f32>> for Attribute {
    fn from(a: BoundedAttribute<f32>) -> Self {
        Attribute::Float(a)
    }
}

impl From<BoundedAttribute<IVec3>> for Attribute {
    fn from(a: BoundedAttribute<IVec3>) -> Self {
        Attribute::Vector(a)
    }
}

impl From<TextAttribute> for Attribute {
    fn from(a: TextAttribute) -> Self {
        Attribute::Text(a)
    }
}
