//! Registry builder for the hookagain documentation site.
//!
//! The crate turns `registry.json` plus the sources under `registry/` into the
//! static artifacts the site serves: one catalog JSON per hook, a flat
//! `index.json`, and a generated lookup module with lazy component imports.
//! `build-registry` is the entry point; the pieces are public so tests and
//! other tooling can drive individual stages.

use anyhow::{Result, bail};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub mod build;
pub mod content;
pub mod layout;
pub mod registry;
pub mod rewrite;
pub mod schema;

pub use build::{BuildReport, CatalogReport, IndexReport, load_registry, run_build};
pub use content::{ContentSource, DirectorySource, MemorySource};
pub use layout::BuildLayout;
pub use registry::{
    FileDescriptor, FileEntry, ItemName, ItemType, Registry, RegistryError, RegistryItem,
};
pub use rewrite::{ParseError, SourceParser, SourceRewriter, TreeSitterParser};
pub use schema::{CompiledSchema, RegistrySchemas, ValidationError};

/// Environment variable naming the repository root explicitly.
pub const ROOT_ENV: &str = "REGISTRY_ROOT";

/// Returns true when `candidate` holds a registry definition and its sources.
fn is_repo_root(candidate: &Path) -> bool {
    candidate.join(layout::REGISTRY_FILE).is_file()
        && candidate.join(layout::REGISTRY_DIR).is_dir()
}

fn repo_root_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !is_repo_root(&hint_path) {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        if is_repo_root(&dir) {
            return Some(dir);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Locate the repository root.
///
/// Order: `REGISTRY_ROOT` when it points at a valid root, then the current
/// directory and its ancestors, then the executable's ancestors.
pub fn find_repo_root() -> Result<PathBuf> {
    if let Ok(env_root) = env::var(ROOT_ENV) {
        if let Some(root) = repo_root_from_hint(&env_root) {
            return Ok(root);
        }
    }

    if let Ok(cwd) = env::current_dir() {
        if let Some(root) = search_upwards(&cwd) {
            return Ok(root);
        }
    }

    if let Ok(exe_path) = env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            if let Some(root) = search_upwards(exe_dir) {
                return Ok(root);
            }
        }
    }

    bail!(
        "Unable to locate a registry root (a directory with {} and {}/). Set {ROOT_ENV}.",
        layout::REGISTRY_FILE,
        layout::REGISTRY_DIR
    );
}
