use super::template::TemplateFile;
use super::{toml_files, ConfigError};
use crate::container::AttributeContainer;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Registry of attribute templates, loaded from TOML files
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, TemplateFile>,
}

impl TemplateRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load all templates from a directory (recursively), in path order
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        for path in toml_files(dir)? {
            registry.load_file(&path)?;
        }
        debug!(templates = registry.len(), dir = %dir.display(), "templates loaded");
        Ok(registry)
    }

    /// Load a single template file
    fn load_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let template = TemplateFile::load_from_path(path)?;
        self.register(template).map_err(|e| match e {
            ConfigError::Validation(message) => {
                ConfigError::Validation(format!("{}: {}", path.display(), message))
            }
            other => other,
        })
    }

    /// Add a template after checking that it instantiates cleanly
    pub fn register(&mut self, template: TemplateFile) -> Result<(), ConfigError> {
        if self.templates.contains_key(template.id()) {
            return Err(ConfigError::Validation(format!(
                "duplicate template id '{}'",
                template.id()
            )));
        }
        template.build_container()?;

        debug!(
            template = template.id(),
            attributes = template.attributes.len(),
            "template registered"
        );
        self.templates.insert(template.id().to_string(), template);
        Ok(())
    }

    /// Parse a template from a TOML string and register it
    pub fn parse_template(&mut self, content: &str) -> Result<(), ConfigError> {
        self.register(TemplateFile::parse(content)?)
    }

    /// Get a template by ID
    pub fn get(&self, id: &str) -> Option<&TemplateFile> {
        self.templates.get(id)
    }

    /// Check if a template exists
    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// List all template IDs
    pub fn template_ids(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Build a fresh container from a template by ID
    pub fn instantiate(&self, id: &str) -> Result<AttributeContainer, ConfigError> {
        let template = self
            .get(id)
            .ok_or_else(|| ConfigError::UnknownTemplate(id.to_string()))?;

        template.build_container()
    }
}
