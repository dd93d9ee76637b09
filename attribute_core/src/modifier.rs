//! Modifiers - Time-bound affine transforms applied to attribute slots
//!
//! A modifier bundles at most one [`ModifierValue`] per [`Slot`]. Each value
//! transforms a slot as `result = multiplier * (result + add)`. Modifiers on
//! an attribute are folded in insertion order, so stacking is not
//! commutative.

use crate::event::{Listeners, SubscriptionId};
use crate::types::{Slot, Tick};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Unique identifier of a modifier instance
pub type ModifierId = Uuid;

/// Additive term followed by a multiplicative factor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModifierValue {
    #[serde(default)]
    add: f64,
    #[serde(default = "default_multiplier")]
    multiplier: f64,
}

fn default_multiplier() -> f64 {
    1.0
}

impl Default for ModifierValue {
    fn default() -> Self {
        ModifierValue {
            add: 0.0,
            multiplier: 1.0,
        }
    }
}

impl ModifierValue {
    pub fn new(add: f64, multiplier: f64) -> Self {
        ModifierValue { add, multiplier }
    }

    /// Pure additive transform
    pub fn add(add: f64) -> Self {
        ModifierValue::new(add, 1.0)
    }

    /// Pure multiplicative transform
    pub fn multiply(multiplier: f64) -> Self {
        ModifierValue::new(0.0, multiplier)
    }

    pub fn add_term(&self) -> f64 {
        self.add
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Apply to a single component
    pub fn apply(&self, value: f64) -> f64 {
        self.multiplier * (value + self.add)
    }

    /// Whether this transform leaves every value unchanged
    pub fn is_identity(&self) -> bool {
        self.add == 0.0 && self.multiplier == 1.0
    }
}

/// A temporary buff or debuff
///
/// Expired exactly when the driving tick reaches `expiry_tick`. The owning
/// attribute fires the elapsed notification when it purges the modifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Modifier {
    id: ModifierId,
    values: BTreeMap<Slot, ModifierValue>,
    apply_tick: Tick,
    expiry_tick: Tick,
    #[serde(skip)]
    on_elapsed: Listeners<dyn FnMut(&Modifier)>,
}

impl Modifier {
    /// Create an empty modifier with a fresh id
    pub fn new(apply_tick: Tick, expiry_tick: Tick) -> Self {
        Modifier {
            id: Uuid::new_v4(),
            values: BTreeMap::new(),
            apply_tick,
            expiry_tick,
            on_elapsed: Listeners::new(),
        }
    }

    /// Set the transform for a slot, replacing any previous one
    pub fn with_value(mut self, slot: Slot, value: ModifierValue) -> Self {
        self.values.insert(slot, value);
        self
    }

    pub fn id(&self) -> ModifierId {
        self.id
    }

    pub fn apply_tick(&self) -> Tick {
        self.apply_tick
    }

    pub fn expiry_tick(&self) -> Tick {
        self.expiry_tick
    }

    /// Transform defined for a slot, if any
    pub fn value(&self, slot: Slot) -> Option<&ModifierValue> {
        self.values.get(&slot)
    }

    /// All transforms, ordered by slot
    pub fn values(&self) -> impl Iterator<Item = (Slot, &ModifierValue)> {
        self.values.iter().map(|(slot, value)| (*slot, value))
    }

    pub fn affects(&self, slot: Slot) -> bool {
        self.values.contains_key(&slot)
    }

    pub fn is_expired(&self, tick: Tick) -> bool {
        tick >= self.expiry_tick
    }

    /// Ticks left before expiry (0 once expired)
    pub fn remaining(&self, tick: Tick) -> Tick {
        self.expiry_tick.saturating_sub(tick)
    }

    /// Whether this modifier leaves every computed value unchanged
    pub fn is_identity(&self) -> bool {
        self.values.values().all(ModifierValue::is_identity)
    }

    /// Register a handler for when the owning attribute purges this modifier
    pub fn on_elapsed<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&Modifier) + 'static,
    {
        self.on_elapsed.subscribe(Box::new(handler))
    }

    pub fn remove_elapsed_handler(&mut self, id: SubscriptionId) -> bool {
        self.on_elapsed.unsubscribe(id)
    }

    pub(crate) fn raise_elapsed(&mut self) {
        let mut listeners = self.on_elapsed.take();
        let modifier: &Modifier = self;
        listeners.notify(|handler| handler(modifier));
        self.on_elapsed.restore(listeners);
    }
}

impl PartialEq for Modifier {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.values == other.values
            && self.apply_tick == other.apply_tick
            && self.expiry_tick == other.expiry_tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_modifier_value_defaults() {
        let value = ModifierValue::default();
        assert!(value.is_identity());
        assert!((value.apply(42.0) - 42.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_modifier_value_adds_then_multiplies() {
        let value = ModifierValue::new(10.0, 2.0);
        // 2 * (5 + 10)
        assert!((value.apply(5.0) - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_modifier_value_json_defaults() {
        let value: ModifierValue = serde_json::from_str(r#"{"add": 3.0}"#).unwrap();
        assert_eq!(value, ModifierValue::add(3.0));

        let value: ModifierValue = serde_json::from_str(r#"{"multiplier": 0.5}"#).unwrap();
        assert_eq!(value, ModifierValue::multiply(0.5));
    }

    #[test]
    fn test_expiry_is_inclusive() {
        let modifier = Modifier::new(0, 5);
        assert!(!modifier.is_expired(4));
        assert!(modifier.is_expired(5));
        assert!(modifier.is_expired(6));
        assert_eq!(modifier.remaining(3), 2);
        assert_eq!(modifier.remaining(9), 0);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Modifier::new(0, 10);
        let b = Modifier::new(0, 10);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_one_value_per_slot() {
        let modifier = Modifier::new(0, 10)
            .with_value(Slot::Max, ModifierValue::add(5.0))
            .with_value(Slot::Max, ModifierValue::multiply(2.0));

        assert_eq!(modifier.values().count(), 1);
        assert_eq!(modifier.value(Slot::Max), Some(&ModifierValue::multiply(2.0)));
        assert!(modifier.affects(Slot::Max));
        assert!(!modifier.affects(Slot::Value));
    }

    #[test]
    fn test_identity_detection() {
        let empty = Modifier::new(0, 1);
        assert!(empty.is_identity());

        let noop = Modifier::new(0, 1).with_value(Slot::Value, ModifierValue::default());
        assert!(noop.is_identity());

        let buff = Modifier::new(0, 1).with_value(Slot::Value, ModifierValue::add(1.0));
        assert!(!buff.is_identity());
    }

    #[test]
    fn test_raise_elapsed() {
        let fired = Rc::new(Cell::new(0));
        let mut modifier = Modifier::new(0, 1);

        let counter = Rc::clone(&fired);
        let expected = modifier.id();
        modifier.on_elapsed(move |m| {
            assert_eq!(m.id(), expected);
            counter.set(counter.get() + 1);
        });

        modifier.raise_elapsed();
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_serde_keeps_id_and_values() {
        let modifier = Modifier::new(3, 8)
            .with_value(Slot::Value, ModifierValue::new(1.0, 1.5))
            .with_value(Slot::Regen, ModifierValue::multiply(0.0));

        let json = serde_json::to_string(&modifier).unwrap();
        let parsed: Modifier = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, modifier);
    }
}
