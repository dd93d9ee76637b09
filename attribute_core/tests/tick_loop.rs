//! End-to-end: template -> container -> tick loop -> snapshot -> resume

use attribute_core::prelude::*;
use attribute_core::IVec3;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const HERO: &str = r#"
[template]
id = "hero"

[[attributes]]
name = "health"
kind = "int"
min = 0
value = 90
max = 100
regen = 10

[[attributes]]
name = "stamina"
kind = "float"
min = 0.0
value = 2.5
max = 10.0
regen = 0.5

[[attributes]]
name = "position"
kind = "vector"
min = [-10, -10, -10]
max = "(10, 10, 10)"
regen = [1, 0, 0]

[[attributes]]
name = "title"
kind = "text"
value = "Squire"
"#;

fn hero() -> AttributeContainer {
    let mut registry = TemplateRegistry::new();
    registry.parse_template(HERO).unwrap();
    registry.instantiate("hero").unwrap()
}

fn record(container: &mut AttributeContainer) -> Rc<RefCell<Vec<String>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    container.subscribe(Box::new(move |a: &dyn ManagedAttribute| {
        sink.borrow_mut().push(a.name().to_string())
    }));
    log
}

fn value_of(container: &AttributeContainer, name: &str) -> Value {
    container.get(name).unwrap().value(Slot::Value)
}

#[test]
fn test_tick_loop_with_buffs() {
    let mut container = hero();
    let log = record(&mut container);

    let elapsed = Rc::new(Cell::new(0));
    let mut fortify = Modifier::new(0, 3).with_value(Slot::Max, ModifierValue::add(50.0));
    let counter = Rc::clone(&elapsed);
    fortify.on_elapsed(move |_| counter.set(counter.get() + 1));
    container.get_mut("health").unwrap().add_modifier(fortify);

    container
        .get_mut("stamina")
        .unwrap()
        .add_modifier(Modifier::new(0, 2).with_value(Slot::Value, ModifierValue::multiply(2.0)));

    // Tick 1: every bounded attribute regenerates once
    container.update(1);
    assert_eq!(value_of(&container, "health"), Value::Int(100));
    assert_eq!(value_of(&container, "stamina"), Value::Float(6.0));
    assert_eq!(value_of(&container, "position"), Value::Vector(IVec3::new(1, 0, 0)));
    assert_eq!(*log.borrow(), vec!["health", "stamina", "position"]);
    log.borrow_mut().clear();

    // Tick 2: the buffed max lets health pass its raw max; the stamina
    // multiplier expires and notifies before regeneration does
    container.update(2);
    assert_eq!(value_of(&container, "health"), Value::Int(110));
    assert_eq!(value_of(&container, "stamina"), Value::Float(3.5));
    assert_eq!(*log.borrow(), vec!["health", "stamina", "stamina", "position"]);
    log.borrow_mut().clear();

    // Tick 3: fortify expires and health falls back under the raw max
    container.update(3);
    assert_eq!(elapsed.get(), 1);
    assert_eq!(value_of(&container, "health"), Value::Int(100));
    assert!(container.get("health").unwrap().modifiers().is_empty());
    assert_eq!(*log.borrow(), vec!["health", "health", "stamina", "position"]);
    log.borrow_mut().clear();

    // Tick 4: health is capped, nothing moves there
    container.update(4);
    assert_eq!(value_of(&container, "health"), Value::Int(100));
    assert_eq!(*log.borrow(), vec!["stamina", "position"]);
    assert_eq!(value_of(&container, "title"), Value::from("Squire"));
}

#[test]
fn test_snapshot_resumes_identically() {
    let mut live = hero();
    live.get_mut("position").unwrap().add_modifier(
        Modifier::new(0, 6).with_value(Slot::Value, ModifierValue::add(2.0)),
    );
    live.get_mut("title").unwrap().add(" of the Vale", Slot::Value).unwrap();
    for tick in 1..=3 {
        live.update(tick);
    }

    let mut restored = AttributeContainer::from_json(&live.to_json().unwrap()).unwrap();
    let log = record(&mut restored);

    for tick in 4..=7 {
        live.update(tick);
        restored.update(tick);
    }

    for (a, b) in live.iter().zip(restored.iter()) {
        assert_eq!(a, b);
    }
    assert_eq!(
        value_of(&restored, "position"),
        Value::Vector(IVec3::new(7, 0, 0))
    );
    assert_eq!(value_of(&restored, "title"), Value::from("Squire of the Vale"));
    assert!(log.borrow().contains(&"position".to_string()));
}

#[test]
fn test_vector_stays_in_bounds() {
    let mut container = hero();
    for tick in 1..=25 {
        container.update(tick);
    }
    assert_eq!(
        value_of(&container, "position"),
        Value::Vector(IVec3::new(10, 0, 0))
    );

    let position = container.get_mut("position").unwrap();
    position.set("(-50, 3, 99)", Slot::Value).unwrap();
    assert_eq!(
        position.value(Slot::Value),
        Value::Vector(IVec3::new(-10, 3, 10))
    );
}

#[test]
fn test_bad_input_leaves_container_untouched() {
    let mut container = hero();
    let log = record(&mut container);

    let health = container.get_mut("health").unwrap();
    assert!(matches!(
        health.set("plenty", Slot::Value),
        Err(AttributeError::InvalidValueType { expected: AttributeKind::Int, .. })
    ));
    assert!(container
        .get_mut("title")
        .unwrap()
        .set(IVec3::ONE, Slot::Value)
        .is_err());

    assert_eq!(value_of(&container, "health"), Value::Int(90));
    assert!(log.borrow().is_empty());
}
