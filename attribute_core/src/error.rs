//! Errors raised at the loosely-typed input boundary

use crate::types::AttributeKind;
use thiserror::Error;

/// Error returned when a value or slot cannot be applied to an attribute
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttributeError {
    #[error("Invalid value type: expected {expected}, got {found}")]
    InvalidValueType {
        expected: AttributeKind,
        found: String,
    },
    #[error("Unsupported slot: {0}")]
    UnsupportedSlot(String),
}

impl AttributeError {
    pub(crate) fn invalid(expected: AttributeKind, found: impl Into<String>) -> Self {
        AttributeError::InvalidValueType {
            expected,
            found: found.into(),
        }
    }
}
