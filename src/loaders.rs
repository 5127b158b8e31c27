//! File loading utilities
//!
//! This module handles loading of schema text and YAML documents from
//! the filesystem, enforcing the argument contracts before any I/O.

use std::fs;
use std::path::Path;

use serde_yaml::Value;

use crate::error::{Error, Result};

/// File extension every schema file must carry
pub const SCHEMA_EXTENSION: &str = "ys";

/// Load schema text from a file
///
/// Fails before touching the filesystem when the path is empty or the
/// extension is not `.ys`.
pub fn load_schema(path: &Path) -> Result<String> {
    if path.as_os_str().is_empty() {
        return Err(Error::Value("schema path must not be empty".to_string()));
    }

    let extension = path.extension().and_then(|ext| ext.to_str());
    if extension != Some(SCHEMA_EXTENSION) {
        return Err(Error::SchemaFilename(format!(
            "'{}' is not a schema file: expected a .{} extension",
            path.display(),
            SCHEMA_EXTENSION
        )));
    }

    fs::read_to_string(path)
        .map_err(|e| Error::Resource(format!("Failed to read file '{}': {}", path.display(), e)))
}

/// Load a YAML document from a file
pub fn load_yaml_file(path: &Path) -> Result<Value> {
    if path.as_os_str().is_empty() {
        return Err(Error::Value("YAML path must not be empty".to_string()));
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Resource(format!("Failed to read file '{}': {}", path.display(), e)))?;

    Ok(serde_yaml::from_str(&content)?)
}
