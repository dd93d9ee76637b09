//! Core types shared by every attribute kind

use crate::error::AttributeError;
use glam::IVec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Simulation time unit driving regeneration and modifier expiry
pub type Tick = u64;

// ============================================================================
// Slots
// ============================================================================

/// Facet of an attribute that a read, write or modifier targets
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Min,
    #[default]
    Value,
    Max,
    Regen,
}

impl Slot {
    /// Get all slots
    pub fn all() -> &'static [Slot] {
        &[Slot::Min, Slot::Value, Slot::Max, Slot::Regen]
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Min => write!(f, "min"),
            Slot::Value => write!(f, "value"),
            Slot::Max => write!(f, "max"),
            Slot::Regen => write!(f, "regen"),
        }
    }
}

impl FromStr for Slot {
    type Err = AttributeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" => Ok(Slot::Min),
            "value" => Ok(Slot::Value),
            "max" => Ok(Slot::Max),
            "regen" => Ok(Slot::Regen),
            _ => Err(AttributeError::UnsupportedSlot(s.to_string())),
        }
    }
}

impl TryFrom<u8> for Slot {
    type Error = AttributeError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Slot::all()
            .get(index as usize)
            .copied()
            .ok_or_else(|| AttributeError::UnsupportedSlot(index.to_string()))
    }
}

// ============================================================================
// Kinds
// ============================================================================

/// The closed set of value kinds an attribute can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Int,
    Float,
    Vector,
    Text,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeKind::Int => write!(f, "int"),
            AttributeKind::Float => write!(f, "float"),
            AttributeKind::Vector => write!(f, "vector"),
            AttributeKind::Text => write!(f, "text"),
        }
    }
}

// ============================================================================
// Loosely-typed values
// ============================================================================

/// A value crossing the attribute boundary
///
/// Used both as input to `set`/`add` (where it is coerced to the attribute's
/// kind) and as the kind-erased output of `get`/`get_raw`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i32),
    Float(f32),
    Vector(IVec3),
    Text(String),
}

impl Value {
    /// The kind this value natively belongs to
    pub fn kind(&self) -> AttributeKind {
        match self {
            Value::Int(_) => AttributeKind::Int,
            Value::Float(_) => AttributeKind::Float,
            Value::Vector(_) => AttributeKind::Vector,
            Value::Text(_) => AttributeKind::Text,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<IVec3> {
        match self {
            Value::Vector(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Short description used in error messages
    pub(crate) fn describe(&self) -> String {
        match self {
            Value::Text(s) => format!("text {:?}", s),
            other => format!("{} {}", other.kind(), other),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Vector(v) => write!(f, "{}", format_vector(*v)),
            Value::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<IVec3> for Value {
    fn from(v: IVec3) -> Self {
        Value::Vector(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

// ============================================================================
// Vector text format
// ============================================================================

/// Format a vector as `"(x, y, z)"`
pub fn format_vector(v: IVec3) -> String {
    format!("({}, {}, {})", v.x, v.y, v.z)
}

/// Parse a vector written as `"(x, y, z)"`
///
/// Surrounding whitespace and whitespace around components are accepted;
/// anything else returns `None`.
pub fn parse_vector(s: &str) -> Option<IVec3> {
    let inner = s.trim().strip_prefix('(')?.strip_suffix(')')?;

    let mut components = inner.split(',').map(|part| part.trim().parse::<i32>());
    let x = components.next()?.ok()?;
    let y = components.next()?.ok()?;
    let z = components.next()?.ok()?;
    if components.next().is_some() {
        return None;
    }

    Some(IVec3::new(x, y, z))
}
