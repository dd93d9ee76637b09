//! AttributeContainer - Named collection of attributes driven by a shared tick

use crate::attribute::{Attribute, ChangeHandler, ManagedAttribute};
use crate::event::{Listeners, SubscriptionId};
use crate::types::Tick;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

type Hub = Rc<RefCell<Listeners<dyn FnMut(&dyn ManagedAttribute)>>>;

struct Entry {
    attribute: Attribute,
    /// Subscription forwarding the attribute's changes to the container
    forwarder: SubscriptionId,
}

/// Insertion-ordered collection of uniquely named attributes
///
/// Changes raised by any contained attribute are re-broadcast to the
/// container's own subscribers. Handlers run synchronously and must not
/// touch the container.
#[derive(Default)]
pub struct AttributeContainer {
    entries: Vec<Entry>,
    hub: Hub,
}

impl AttributeContainer {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute, returning false if its name is already taken
    pub fn add(&mut self, attribute: impl Into<Attribute>) -> bool {
        let mut attribute = attribute.into();
        if self.contains(attribute.name()) {
            warn!(attribute = attribute.name(), "duplicate attribute name rejected");
            return false;
        }

        let hub = Rc::clone(&self.hub);
        let forwarder = attribute.subscribe(Box::new(move |changed: &dyn ManagedAttribute| {
            hub.borrow_mut().notify(|handler| handler(changed))
        }));

        debug!(attribute = attribute.name(), kind = %attribute.kind(), "attribute added");
        self.entries.push(Entry {
            attribute,
            forwarder,
        });
        true
    }

    /// Remove an attribute by name, returning false if absent
    pub fn remove(&mut self, name: &str) -> bool {
        self.take(name).is_some()
    }

    /// Detach an attribute by name and hand it back to the caller
    pub fn take(&mut self, name: &str) -> Option<Attribute> {
        let index = self.entries.iter().position(|e| e.attribute.name() == name)?;
        let Entry {
            mut attribute,
            forwarder,
        } = self.entries.remove(index);
        attribute.unsubscribe(forwarder);
        Some(attribute)
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.entries
            .iter()
            .find(|e| e.attribute.name() == name)
            .map(|e| &e.attribute)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.entries
            .iter_mut()
            .find(|e| e.attribute.name() == name)
            .map(|e| &mut e.attribute)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.attribute.name() == name)
    }

    /// Advance every attribute to `tick`, in insertion order
    pub fn update(&mut self, tick: Tick) {
        for entry in &mut self.entries {
            entry.attribute.update(tick);
        }
    }

    /// Register a handler for changes of any contained attribute
    pub fn subscribe(&mut self, handler: ChangeHandler) -> SubscriptionId {
        self.hub.borrow_mut().subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.hub.borrow_mut().unsubscribe(id)
    }

    /// Attributes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.entries.iter().map(|e| &e.attribute)
    }

    /// Attribute names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|a| a.name())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize as an indented JSON array of kind-tagged attribute records
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Rebuild a container from [`AttributeContainer::to_json`] output
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl fmt::Debug for AttributeContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeContainer")
            .field("attributes", &self.iter().collect::<Vec<_>>())
            .field("subscribers", &self.hub.borrow().len())
            .finish()
    }
}

impl Serialize for AttributeContainer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for AttributeContainer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let attributes = Vec::<Attribute>::deserialize(deserializer)?;
        let mut container = AttributeContainer::new();
        for attribute in attributes {
            let name = attribute.name().to_string();
            if !container.add(attribute) {
                return Err(D::Error::custom(format!("duplicate attribute name '{}'", name)));
            }
        }
        Ok(container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{BoundedAttribute, TextAttribute};
    use crate::modifier::{Modifier, ModifierValue};
    use crate::types::{Slot, Value};
    use glam::IVec3;
    use std::cell::RefCell;

    fn sample() -> AttributeContainer {
        let mut container = AttributeContainer::new();
        container.add(BoundedAttribute::with_range("health", 0, 80, 100).with_regen(5));
        container.add(BoundedAttribute::with_range("speed", 0.0f32, 1.5, 3.0));
        container.add(BoundedAttribute::with_value("position", IVec3::new(4, 0, -2)));
        container.add(TextAttribute::new("title", "Squire"));
        container
    }

    fn recorded(container: &mut AttributeContainer) -> Rc<RefCell<Vec<String>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        container.subscribe(Box::new(move |a: &dyn ManagedAttribute| {
            sink.borrow_mut().push(a.name().to_string())
        }));
        log
    }

    #[test]
    fn test_add_and_get() {
        let container = sample();
        assert_eq!(container.len(), 4);
        assert_eq!(
            container.names().collect::<Vec<_>>(),
            vec!["health", "speed", "position", "title"]
        );
        assert_eq!(
            container.get("health").unwrap().value(Slot::Value),
            Value::Int(80)
        );
        assert!(container.get("mana").is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut container = sample();
        assert!(!container.add(BoundedAttribute::with_range("health", 0, 1, 1)));
        assert_eq!(container.len(), 4);
        assert_eq!(
            container.get("health").unwrap().raw_value(Slot::Max),
            Value::Int(100)
        );
    }

    #[test]
    fn test_remove() {
        let mut container = sample();
        assert!(container.remove("speed"));
        assert!(!container.remove("speed"));
        assert!(!container.contains("speed"));
        assert_eq!(container.len(), 3);
    }

    #[test]
    fn test_remove_held_attribute() {
        let mut container = sample();
        let held = container.get("title").unwrap().clone();

        assert!(container.remove(held.name()));
        assert!(container.get("title").is_none());
        assert!(container.add(held));
        assert_eq!(container.names().last(), Some("title"));
    }

    #[test]
    fn test_changes_are_rebroadcast() {
        let mut container = sample();
        let log = recorded(&mut container);

        container
            .get_mut("title")
            .unwrap()
            .set("Knight", Slot::Value)
            .unwrap();
        container.update(1);

        // Only health regenerates
        assert_eq!(*log.borrow(), vec!["title".to_string(), "health".to_string()]);
    }

    #[test]
    fn test_taken_attribute_is_detached() {
        let mut container = sample();
        let log = recorded(&mut container);

        let mut health = container.take("health").unwrap();
        health.set(10, Slot::Value).unwrap();

        assert!(log.borrow().is_empty());
        assert!(container.add(health));
    }

    #[test]
    fn test_update_uses_same_tick_for_all() {
        let mut container = AttributeContainer::new();
        for name in ["a", "b", "c"] {
            let mut attr = BoundedAttribute::with_range(name, 0, 10, 100);
            attr.add_modifier(
                Modifier::new(0, 5).with_value(Slot::Value, ModifierValue::add(1.0)),
            );
            container.add(attr);
        }

        container.update(4);
        assert!(container.iter().all(|a| a.modifiers().len() == 1));

        container.update(5);
        assert!(container.iter().all(|a| a.modifiers().is_empty()));
    }

    #[test]
    fn test_unsubscribe() {
        let mut container = sample();
        let log = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&log);
        let id = container.subscribe(Box::new(move |_: &dyn ManagedAttribute| {
            *counter.borrow_mut() += 1
        }));

        assert!(container.unsubscribe(id));
        container.update(1);
        assert_eq!(*log.borrow(), 0);
    }

    #[test]
    fn test_json_round_trip() {
        let mut container = sample();
        container.get_mut("speed").unwrap().add_modifier(
            Modifier::new(2, 9)
                .with_value(Slot::Value, ModifierValue::new(0.5, 2.0))
                .with_value(Slot::Max, ModifierValue::add(1.0)),
        );

        let json = container.to_json().unwrap();
        let restored = AttributeContainer::from_json(&json).unwrap();

        assert_eq!(restored.names().collect::<Vec<_>>(), container.names().collect::<Vec<_>>());
        for (a, b) in restored.iter().zip(container.iter()) {
            assert_eq!(a, b);
        }
        assert_eq!(
            restored.get("speed").unwrap().value(Slot::Value),
            Value::Float(4.0)
        );
    }

    #[test]
    fn test_json_records_are_kind_tagged() {
        let json: serde_json::Value = serde_json::to_value(sample()).unwrap();
        let kinds: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|record| record["kind"].as_str().unwrap())
            .collect();
        assert_eq!(kinds, vec!["int", "float", "vector", "text"]);
    }

    #[test]
    fn test_restored_container_rebroadcasts() {
        let json = sample().to_json().unwrap();
        let mut restored = AttributeContainer::from_json(&json).unwrap();
        let log = recorded(&mut restored);

        restored.update(1);
        assert_eq!(*log.borrow(), vec!["health".to_string()]);
    }

    #[test]
    fn test_loaded_records_are_repaired() {
        let json = r#"[
            {"kind": "int", "name": "h", "min": 10, "value": 50, "max": 5, "regen": 0},
            {"kind": "vector", "name": "p", "min": [0, 0, 0], "value": [-4, 2, 9], "max": [5, 5, 5], "regen": [0, 0, 0]}
        ]"#;
        let container = AttributeContainer::from_json(json).unwrap();

        let h = container.get("h").unwrap();
        assert_eq!(h.raw_value(Slot::Min), Value::Int(10));
        assert_eq!(h.raw_value(Slot::Value), Value::Int(10));
        assert_eq!(h.raw_value(Slot::Max), Value::Int(10));

        assert_eq!(
            container.get("p").unwrap().raw_value(Slot::Value),
            Value::Vector(IVec3::new(0, 2, 5))
        );
    }

    #[test]
    fn test_non_finite_float_keeps_round_trip() {
        let mut container = sample();
        let speed = container.get_mut("speed").unwrap();
        assert!(speed.set("NaN", Slot::Min).is_err());
        assert!(speed.set("inf", Slot::Max).is_err());

        let json = container.to_json().unwrap();
        assert!(!json.contains("null"));
        let restored = AttributeContainer::from_json(&json).unwrap();
        assert_eq!(restored.get("speed"), container.get("speed"));
    }

    #[test]
    fn test_duplicate_names_fail_deserialization() {
        let json = r#"[
            {"kind": "text", "name": "title", "value": "a"},
            {"kind": "text", "name": "title", "value": "b"}
        ]"#;
        assert!(AttributeContainer::from_json(json).is_err());
    }
}
