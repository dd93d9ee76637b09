//! BoundedAttribute - Min/value/max/regen slots over a numeric or vector kind

use super::kind::AttributeValue;
use super::{purge_expired, ChangeHandler, ManagedAttribute, TickResult};
use crate::error::AttributeError;
use crate::event::{Listeners, SubscriptionId};
use crate::modifier::{Modifier, ModifierId};
use crate::types::{AttributeKind, Slot, Tick, Value};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, trace};

/// A bounded attribute of kind `V`
///
/// Raw slots satisfy `min <= value <= max` (componentwise for vectors)
/// unless an integer attribute carries modifiers on its bounds, in which
/// case its value is clamped against the computed bounds instead. Computed
/// values fold the raw slot through every active modifier in insertion order.
#[derive(Debug, Clone, Serialize)]
#[serde(bound(serialize = ""))]
pub struct BoundedAttribute<V: AttributeValue> {
    name: String,
    min: V,
    #[serde(rename = "value")]
    current: V,
    max: V,
    regen: V,
    #[serde(default)]
    modifiers: Vec<Modifier>,
    #[serde(skip)]
    on_changed: Listeners<dyn FnMut(&dyn ManagedAttribute)>,
}

/// Serialized record, repaired into a valid attribute on load
#[derive(Deserialize)]
#[serde(bound(deserialize = ""))]
struct StoredAttribute<V: AttributeValue> {
    name: String,
    min: V,
    value: V,
    max: V,
    regen: V,
    #[serde(default)]
    modifiers: Vec<Modifier>,
}

impl<V: AttributeValue> BoundedAttribute<V> {
    /// Create with the kind's full range and a zero value
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_value(name, V::zero())
    }

    /// Create with the kind's full range
    pub fn with_value(name: impl Into<String>, value: V) -> Self {
        Self::with_range(name, V::lowest(), value, V::highest())
    }

    /// Create with explicit bounds
    ///
    /// An inverted range is repaired by raising `max` to `min`, and the
    /// value is clamped into the range.
    pub fn with_range(name: impl Into<String>, min: V, value: V, max: V) -> Self {
        let max = max.at_least(min);
        BoundedAttribute {
            name: name.into(),
            min,
            current: value.clamp_between(min, max),
            max,
            regen: V::zero(),
            modifiers: Vec::new(),
            on_changed: Listeners::new(),
        }
    }

    /// Set the per-tick regeneration
    pub fn with_regen(mut self, regen: V) -> Self {
        self.regen = regen;
        self
    }

    pub(crate) fn from_values(
        name: String,
        min: Option<&Value>,
        value: Option<&Value>,
        max: Option<&Value>,
        regen: Option<&Value>,
    ) -> Result<Self, AttributeError> {
        let coerce_or = |v: Option<&Value>, default: V| v.map(V::coerce).unwrap_or(Ok(default));

        let min = coerce_or(min, V::lowest())?;
        let max = coerce_or(max, V::highest())?;
        let value = coerce_or(value, V::zero())?;
        let regen = coerce_or(regen, V::zero())?;

        Ok(Self::with_range(name, min, value, max).with_regen(regen))
    }

    /// Computed value of a slot
    pub fn get(&self, slot: Slot) -> V {
        self.modifiers
            .iter()
            .filter_map(|m| m.value(slot))
            .fold(self.get_raw(slot), |result, modifier| result.modify(modifier))
    }

    /// Stored value of a slot
    pub fn get_raw(&self, slot: Slot) -> V {
        match slot {
            Slot::Min => self.min,
            Slot::Value => self.current,
            Slot::Max => self.max,
            Slot::Regen => self.regen,
        }
    }

    /// Coerce `value` and assign it to the raw slot
    pub fn set(&mut self, value: impl Into<Value>, slot: Slot) -> Result<(), AttributeError> {
        let value = V::coerce(&value.into())?;
        self.assign(slot, value);
        Ok(())
    }

    /// Coerce `value` and add it to the raw slot
    ///
    /// Operates on the raw value, so active modifiers do not compound.
    pub fn add(&mut self, value: impl Into<Value>, slot: Slot) -> Result<(), AttributeError> {
        let delta = V::coerce(&value.into())?;
        self.assign(slot, self.get_raw(slot).combine(delta));
        Ok(())
    }

    fn assign(&mut self, slot: Slot, value: V) {
        let changed = match slot {
            Slot::Min => self.set_min(value),
            Slot::Value => self.set_current(value),
            Slot::Max => self.set_max(value),
            Slot::Regen => self.set_regen(value),
        };

        trace!(attribute = %self.name, %slot, value = ?self.get_raw(slot), changed, "slot assigned");

        if changed {
            self.raise_changed();
        }
    }

    fn set_min(&mut self, value: V) -> bool {
        let mut changed = self.min != value;
        self.min = value;

        let max = self.max.at_least(self.min);
        changed |= max != self.max;
        self.max = max;

        self.repair_current() || changed
    }

    fn set_max(&mut self, value: V) -> bool {
        let mut changed = self.max != value;
        self.max = value;

        let min = self.min.at_most(self.max);
        changed |= min != self.min;
        self.min = min;

        self.repair_current() || changed
    }

    fn set_current(&mut self, value: V) -> bool {
        let before = self.current;
        self.current = self.clamp(value);
        before != self.current
    }

    fn set_regen(&mut self, value: V) -> bool {
        let changed = self.regen != value;
        self.regen = value;
        changed
    }

    /// Pull `current` back into the raw range, then apply the kind's clamp
    fn repair_current(&mut self) -> bool {
        let before = self.current;
        self.current = self.clamp(self.current.clamp_between(self.min, self.max));
        before != self.current
    }

    /// Clamp into the bounds the kind clamps against
    ///
    /// Integers use the computed min/max; floats and vectors the raw ones.
    fn clamp(&self, value: V) -> V {
        if V::CLAMPS_TO_COMPUTED {
            value.clamp_between(self.get(Slot::Min), self.get(Slot::Max))
        } else {
            value.clamp_between(self.min, self.max)
        }
    }

    fn raise_changed(&mut self) {
        let mut listeners = self.on_changed.take();
        let attribute: &dyn ManagedAttribute = &*self;
        listeners.notify(|handler| handler(attribute));
        self.on_changed.restore(listeners);
    }
}

impl<V: AttributeValue> ManagedAttribute for BoundedAttribute<V> {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> AttributeKind {
        V::KIND
    }

    fn value(&self, slot: Slot) -> Value {
        self.get(slot).into_value()
    }

    fn raw_value(&self, slot: Slot) -> Value {
        self.get_raw(slot).into_value()
    }

    fn set(&mut self, value: Value, slot: Slot) -> Result<(), AttributeError> {
        BoundedAttribute::set(self, value, slot)
    }

    fn add(&mut self, value: Value, slot: Slot) -> Result<(), AttributeError> {
        BoundedAttribute::add(self, value, slot)
    }

    fn update(&mut self, tick: Tick) -> TickResult {
        let mut result = TickResult::default();

        result.expired_modifiers = purge_expired(&self.name, &mut self.modifiers, tick);
        if !result.expired_modifiers.is_empty() {
            self.raise_changed();
            result.notifications += 1;
        }

        let before = self.current;
        self.current = self.clamp(self.current.combine(self.regen));
        if before != self.current {
            self.raise_changed();
            result.notifications += 1;
        }

        result
    }

    fn add_modifier(&mut self, modifier: Modifier) {
        debug!(
            attribute = %self.name,
            modifier = %modifier.id(),
            expiry_tick = modifier.expiry_tick(),
            "modifier added"
        );
        let caps_max = modifier.affects(Slot::Max);
        self.modifiers.push(modifier);

        if caps_max {
            let before = self.current;
            self.current = self
                .current
                .clamp_between(self.get(Slot::Min), self.get(Slot::Max));
            if before != self.current {
                self.raise_changed();
            }
        }
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

/// Records go through the same range repair as [`BoundedAttribute::with_range`],
/// with the value clamped the way `set` would once modifiers are attached.
impl<'de, V: AttributeValue> Deserialize<'de> for BoundedAttribute<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let stored = StoredAttribute::<V>::deserialize(deserializer)?;

        let mut attribute = Self::with_range(stored.name, stored.min, stored.min, stored.max)
            .with_regen(stored.regen);
        attribute.modifiers = stored.modifiers;
        attribute.current = attribute.clamp(stored.value);
        Ok(attribute)
    }
}

impl<V: AttributeValue> PartialEq for BoundedAttribute<V> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.min == other.min
            && self.current == other.current
            && self.max == other.max
            && self.regen == other.regen
            && self.modifiers == other.modifiers
    }
}
