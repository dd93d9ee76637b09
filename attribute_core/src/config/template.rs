//! Attribute templates - TOML descriptions of attribute sets

use super::{load_toml, parse_toml, ConfigError};
use crate::attribute::Attribute;
use crate::container::AttributeContainer;
use crate::types::{AttributeKind, Value};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A template file: a header plus the attributes it defines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateFile {
    pub template: TemplateHeader,
    #[serde(default)]
    pub attributes: Vec<AttributeTemplate>,
}

/// Identification of a template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateHeader {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Definition of a single attribute
///
/// Slot values go through the same coercion as `set`, so a vector may be
/// written as `[1, 2, 3]` or `"(1, 2, 3)"` and an integer as `5` or `"5"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeTemplate {
    pub name: String,
    pub kind: AttributeKind,
    #[serde(default)]
    pub min: Option<Value>,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub max: Option<Value>,
    #[serde(default)]
    pub regen: Option<Value>,
}

impl AttributeTemplate {
    /// Build a fresh attribute from this definition
    pub fn build(&self) -> Result<Attribute, ConfigError> {
        Ok(Attribute::from_values(
            self.kind,
            self.name.clone(),
            self.min.as_ref(),
            self.value.as_ref(),
            self.max.as_ref(),
            self.regen.as_ref(),
        )?)
    }
}

impl TemplateFile {
    /// Load a template from a TOML file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        load_toml(path)
    }

    /// Parse a template from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        parse_toml(content)
    }

    pub fn id(&self) -> &str {
        &self.template.id
    }

    /// Build a container holding one fresh attribute per definition
    pub fn build_container(&self) -> Result<AttributeContainer, ConfigError> {
        let mut container = AttributeContainer::new();
        for definition in &self.attributes {
            if !container.add(definition.build()?) {
                return Err(ConfigError::Validation(format!(
                    "duplicate attribute '{}' in template '{}'",
                    definition.name, self.template.id
                )));
            }
        }
        Ok(container)
    }
}
