//! Per-kind arithmetic, bounds and coercion for bounded attributes

use crate::error::AttributeError;
use crate::modifier::ModifierValue;
use crate::types::{parse_vector, AttributeKind, Value};
use glam::IVec3;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// A value kind that supports bounds, regeneration and modifiers
///
/// Implemented for `i32`, `f32` and `IVec3`. Ordering operations are
/// componentwise for vectors.
pub trait AttributeValue:
    Copy + PartialEq + fmt::Debug + Serialize + DeserializeOwned + 'static
{
    const KIND: AttributeKind;

    /// Whether `clamp` uses the modified min/max instead of the raw ones
    const CLAMPS_TO_COMPUTED: bool;

    fn zero() -> Self;

    /// Smallest representable value, the default lower bound
    fn lowest() -> Self;

    /// Largest representable value, the default upper bound
    fn highest() -> Self;

    /// Convert a loosely-typed input following the kind's coercion table
    fn coerce(value: &Value) -> Result<Self, AttributeError>;

    fn into_value(self) -> Value;

    /// Raw addition used by `add` and regeneration
    fn combine(self, other: Self) -> Self;

    /// Apply one modifier step: `multiplier * (self + add)`
    fn modify(self, modifier: &ModifierValue) -> Self;

    /// Raise to at least `floor`
    fn at_least(self, floor: Self) -> Self;

    /// Lower to at most `ceiling`
    fn at_most(self, ceiling: Self) -> Self;

    /// Clamp into `[min, max]`; `min` wins if the range is inverted
    fn clamp_between(self, min: Self, max: Self) -> Self {
        self.at_most(max).at_least(min)
    }
}

impl AttributeValue for i32 {
    const KIND: AttributeKind = AttributeKind::Int;
    const CLAMPS_TO_COMPUTED: bool = true;

    fn zero() -> Self {
        0
    }

    fn lowest() -> Self {
        i32::MIN
    }

    fn highest() -> Self {
        i32::MAX
    }

    fn coerce(value: &Value) -> Result<Self, AttributeError> {
        match value {
            Value::Int(v) => Ok(*v),
            // Truncates toward zero, saturating at the i32 range
            Value::Float(v) => Ok(*v as i32),
            Value::Text(s) => s
                .trim()
                .parse::<i32>()
                .map_err(|_| AttributeError::invalid(Self::KIND, value.describe())),
            Value::Vector(_) => Err(AttributeError::invalid(Self::KIND, value.describe())),
        }
    }

    fn into_value(self) -> Value {
        Value::Int(self)
    }

    fn combine(self, other: Self) -> Self {
        self.saturating_add(other)
    }

    fn modify(self, modifier: &ModifierValue) -> Self {
        modifier.apply(self as f64) as i32
    }

    fn at_least(self, floor: Self) -> Self {
        self.max(floor)
    }

    fn at_most(self, ceiling: Self) -> Self {
        self.min(ceiling)
    }
}

impl AttributeValue for f32 {
    const KIND: AttributeKind = AttributeKind::Float;
    const CLAMPS_TO_COMPUTED: bool = false;

    fn zero() -> Self {
        0.0
    }

    fn lowest() -> Self {
        f32::MIN
    }

    fn highest() -> Self {
        f32::MAX
    }

    /// Rejects NaN and infinities, which have no place in a bounded range
    fn coerce(value: &Value) -> Result<Self, AttributeError> {
        let coerced = match value {
            Value::Int(v) => Some(*v as f32),
            Value::Float(v) => Some(*v),
            Value::Text(s) => s.trim().parse::<f32>().ok(),
            Value::Vector(_) => None,
        };
        coerced
            .filter(|v| v.is_finite())
            .ok_or_else(|| AttributeError::invalid(Self::KIND, value.describe()))
    }

    fn into_value(self) -> Value {
        Value::Float(self)
    }

    fn combine(self, other: Self) -> Self {
        (self + other).clamp(f32::MIN, f32::MAX)
    }

    fn modify(self, modifier: &ModifierValue) -> Self {
        modifier.apply(self as f64) as f32
    }

    fn at_least(self, floor: Self) -> Self {
        self.max(floor)
    }

    fn at_most(self, ceiling: Self) -> Self {
        self.min(ceiling)
    }
}

impl AttributeValue for IVec3 {
    const KIND: AttributeKind = AttributeKind::Vector;
    const CLAMPS_TO_COMPUTED: bool = false;

    fn zero() -> Self {
        IVec3::ZERO
    }

    fn lowest() -> Self {
        IVec3::splat(i32::MIN)
    }

    fn highest() -> Self {
        IVec3::splat(i32::MAX)
    }

    fn coerce(value: &Value) -> Result<Self, AttributeError> {
        match value {
            Value::Vector(v) => Ok(*v),
            Value::Text(s) => {
                parse_vector(s).ok_or_else(|| AttributeError::invalid(Self::KIND, value.describe()))
            }
            Value::Int(_) | Value::Float(_) => {
                Err(AttributeError::invalid(Self::KIND, value.describe()))
            }
        }
    }

    fn into_value(self) -> Value {
        Value::Vector(self)
    }

    fn combine(self, other: Self) -> Self {
        IVec3::new(
            self.x.saturating_add(other.x),
            self.y.saturating_add(other.y),
            self.z.saturating_add(other.z),
        )
    }

    fn modify(self, modifier: &ModifierValue) -> Self {
        IVec3::new(
            self.x.modify(modifier),
            self.y.modify(modifier),
            self.z.modify(modifier),
        )
    }

    fn at_least(self, floor: Self) -> Self {
        self.max(floor)
    }

    fn at_most(self, ceiling: Self) -> Self {
        self.min(ceiling)
    }
}
