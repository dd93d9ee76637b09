//! Prelude module for convenient imports
//!
//! ```rust
//! use attribute_core::prelude::*;
//! ```

// Attributes
pub use crate::attribute::{Attribute, BoundedAttribute, ManagedAttribute, TextAttribute};
pub use crate::types::{AttributeKind, Slot, Tick, Value};

// Modifiers
pub use crate::modifier::{Modifier, ModifierValue};

// Container
pub use crate::container::AttributeContainer;

// Notifications
pub use crate::event::SubscriptionId;

// Config
pub use crate::config::TemplateRegistry;

// Errors
pub use crate::error::AttributeError;
