//! Validated loading of `registry.json`.
//!
//! Loading is strict: the whole document is checked against the registry
//! schema before deserialization, and duplicate item names are rejected since
//! names key both the catalog files and the lookup module. Any failure here is
//! fatal for a build.

use crate::registry::model::{Registry, RegistryItem};
use crate::schema::{CompiledSchema, ValidationError};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unable to read registry {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("registry is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Schema(#[from] ValidationError),

    #[error("duplicate registry item name '{0}'")]
    DuplicateName(String),
}

impl Registry {
    /// Read, validate, and index the registry file at `path`.
    pub fn load(path: &Path, schema: &CompiledSchema) -> Result<Self, RegistryError> {
        let data = fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let value: Value = serde_json::from_str(&data)?;
        let subject = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_value(value, schema, &subject)
    }

    /// Validate an in-memory registry definition.
    pub fn from_value(
        value: Value,
        schema: &CompiledSchema,
        subject: &str,
    ) -> Result<Self, RegistryError> {
        schema.validate(subject, &value)?;
        let items: Vec<RegistryItem> = serde_json::from_value(value)?;
        ensure_unique_names(&items)?;
        debug!(items = items.len(), "registry validated");
        Ok(Registry::from_validated(items))
    }
}

fn ensure_unique_names(items: &[RegistryItem]) -> Result<(), RegistryError> {
    let mut seen = BTreeSet::new();
    for item in items {
        if !seen.insert(item.name.as_str()) {
            return Err(RegistryError::DuplicateName(item.name.0.clone()));
        }
    }
    Ok(())
}
