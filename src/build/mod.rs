//! Registry build pipeline.
//!
//! [`run_build`] is what `build-registry` executes: load and validate
//! `registry.json` (fatal on failure), write one catalog file per whitelisted
//! item, then regenerate `index.json` and the lookup module. Per-item and
//! per-file problems end up in the returned [`BuildReport`]; anything else aborts the
//! run without rolling back files already written.

pub mod catalog;
pub mod index;
pub mod module;

pub use catalog::{CatalogBuilder, CatalogPayload, CatalogReport, FileIssue, SkippedItem};
pub use index::{IndexBuilder, IndexEntry, IndexReport, component_path};
pub use module::{ModuleFlavor, render_module};

use crate::content::DirectorySource;
use crate::layout::BuildLayout;
use crate::registry::Registry;
use crate::rewrite::SourceRewriter;
use crate::schema::RegistrySchemas;
use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome of a full build.
pub struct BuildReport {
    pub items: usize,
    pub catalog: CatalogReport,
    pub index: IndexReport,
}

/// Load `registry.json` from the layout and validate it without writing.
pub fn load_registry(layout: &BuildLayout, schemas: &RegistrySchemas) -> Result<Registry> {
    Registry::load(&layout.registry_file, &schemas.registry)
        .with_context(|| format!("loading {}", layout.registry_file.display()))
}

/// Validate the registry, then run the catalog and index builders in order.
pub fn run_build(layout: &BuildLayout, schemas: &RegistrySchemas) -> Result<BuildReport> {
    let registry = load_registry(layout, schemas)?;
    let source = DirectorySource::new(&layout.registry_dir);
    let rewriter = SourceRewriter::new();

    let catalog = CatalogBuilder::new(layout, &source, &rewriter, &schemas.payload)
        .build(&registry)
        .context("building catalog")?;
    let index = IndexBuilder::new(layout)
        .build(&registry)
        .context("building index")?;

    info!(
        items = registry.len(),
        catalogued = catalog.written.len(),
        skipped = catalog.skipped.len(),
        unreadable = catalog.unreadable.len(),
        unrewritten = catalog.unrewritten.len(),
        module_entries = index.module_entries,
        "registry build finished"
    );
    Ok(BuildReport {
        items: registry.len(),
        catalog,
        index,
    })
}

/// Delete `path`, treating an already-missing file as success.
pub(crate) fn remove_artifact(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).with_context(|| format!("removing {}", path.display())),
    }
}

/// Write `contents` to `path`, creating parent directories as needed.
pub(crate) fn write_artifact(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn removing_a_missing_artifact_is_fine() {
        let temp = TempDir::new().expect("temp dir");
        remove_artifact(&temp.path().join("absent.json")).expect("missing file ignored");
    }

    #[test]
    fn write_artifact_creates_parents() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("public/r/index.json");
        write_artifact(&path, "[]").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
        remove_artifact(&path).unwrap();
        assert!(!path.exists());
    }
}
