//! Configuration - TOML attribute templates
//!
//! Attribute sets can be described in TOML files and instantiated into
//! containers, either one file at a time or through a [`TemplateRegistry`]
//! loaded from a directory.

mod registry;
mod template;

pub use registry::TemplateRegistry;
pub use template::{AttributeTemplate, TemplateFile, TemplateHeader};

use crate::error::AttributeError;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error loading or instantiating attribute templates
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading '{path:?}': {error}")]
    Io {
        error: std::io::Error,
        path: Option<PathBuf>,
    },
    #[error("Parse error in '{path:?}': {error}")]
    Parse {
        error: toml::de::Error,
        path: Option<PathBuf>,
    },
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),
    #[error("Invalid attribute value: {0}")]
    Attribute(#[from] AttributeError),
}

/// Load and parse a TOML file
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        error: e,
        path: Some(path.to_path_buf()),
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        error: e,
        path: Some(path.to_path_buf()),
    })
}

/// Collect every `*.toml` file under `dir`, recursively, in path order
///
/// A missing directory yields no files.
pub fn toml_files(dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    let io_error = |error, path: &Path| ConfigError::Io {
        error,
        path: Some(path.to_path_buf()),
    };

    while let Some(current) = pending.pop() {
        if !current.exists() {
            continue;
        }
        for entry in std::fs::read_dir(&current).map_err(|e| io_error(e, &current))? {
            let path = entry.map_err(|e| io_error(e, &current))?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "toml") {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Parse a TOML string
pub fn parse_toml<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::Parse {
        error: e,
        path: None,
    })
}
