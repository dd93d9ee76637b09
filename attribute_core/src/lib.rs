//! attribute_core - Managed attributes for game entities
//!
//! This library provides:
//! - BoundedAttribute: Int, float and vector values with min/max bounds and regeneration
//! - TextAttribute: Unbounded string values
//! - Modifier: Temporary add/multiply effects on any slot, expiring on a tick schedule
//! - AttributeContainer: Named attributes advanced together by a shared tick
//! - TemplateRegistry: TOML attribute templates instantiated into containers
//!
//! # Quick Start
//!
//! ```rust
//! use attribute_core::prelude::*;
//!
//! let mut hero = AttributeContainer::new();
//! hero.add(BoundedAttribute::with_range("health", 0, 80, 100).with_regen(5));
//! hero.add(TextAttribute::new("title", "Squire"));
//!
//! // A five-tick buff adding 10 to max health
//! let health = hero.get_mut("health").unwrap();
//! health.add_modifier(Modifier::new(0, 5).with_value(Slot::Max, ModifierValue::add(10.0)));
//! assert_eq!(health.value(Slot::Max), Value::Int(110));
//!
//! // Regeneration and expiry happen on update
//! hero.update(1);
//! assert_eq!(hero.get("health").unwrap().value(Slot::Value), Value::Int(85));
//! ```

pub mod attribute;
pub mod config;
pub mod container;
pub mod error;
pub mod event;
pub mod modifier;
pub mod prelude;
pub mod types;

// Core API - what most users need
pub use attribute::{Attribute, BoundedAttribute, ManagedAttribute, TextAttribute};
pub use container::AttributeContainer;
pub use modifier::{Modifier, ModifierId, ModifierValue};
pub use types::{AttributeKind, Slot, Tick, Value};

// Errors
pub use config::ConfigError;
pub use error::AttributeError;

// Configuration
pub use config::{TemplateFile, TemplateRegistry};

// Advanced: notifications and custom kinds
pub use attribute::{AttributeValue, ChangeHandler, TickResult};
pub use event::SubscriptionId;

// Re-export the vector type used by vector attributes
pub use glam::IVec3;
