//! Filesystem layout of a registry build.
//!
//! All input and output locations hang off the repository root. Defaults match
//! the docs site: sources under `registry/`, public artifacts under
//! `public/r/`, and the generated lookup module under `__registry__/`.

use std::path::{Path, PathBuf};

pub const REGISTRY_FILE: &str = "registry.json";
pub const REGISTRY_DIR: &str = "registry";
pub const DEFAULT_PUBLIC_DIR: &str = "public/r";
pub const DEFAULT_MODULE_DIR: &str = "__registry__";
pub const DEFAULT_MODULE_EXT: &str = "tsx";
pub const INDEX_JSON: &str = "index.json";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Resolved paths for one build.
pub struct BuildLayout {
    pub root: PathBuf,
    pub registry_file: PathBuf,
    pub registry_dir: PathBuf,
    pub public_dir: PathBuf,
    pub module_dir: PathBuf,
    pub module_ext: String,
}

impl BuildLayout {
    /// Default layout anchored at `root`.
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            registry_file: root.join(REGISTRY_FILE),
            registry_dir: root.join(REGISTRY_DIR),
            public_dir: root.join(DEFAULT_PUBLIC_DIR),
            module_dir: root.join(DEFAULT_MODULE_DIR),
            module_ext: DEFAULT_MODULE_EXT.to_string(),
            root,
        }
    }

    /// Resolve `path` against the root unless it is already absolute.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn with_registry_file(mut self, path: &Path) -> Self {
        self.registry_file = self.resolve(path);
        self
    }

    pub fn with_public_dir(mut self, path: &Path) -> Self {
        self.public_dir = self.resolve(path);
        self
    }

    pub fn with_module_dir(mut self, path: &Path) -> Self {
        self.module_dir = self.resolve(path);
        self
    }

    pub fn with_module_ext(mut self, ext: &str) -> Self {
        self.module_ext = ext.trim_start_matches('.').to_string();
        self
    }

    /// `<public>/index.json`
    pub fn index_json_path(&self) -> PathBuf {
        self.public_dir.join(INDEX_JSON)
    }

    /// `<public>/<name>.json`
    pub fn catalog_path(&self, name: &str) -> PathBuf {
        self.public_dir.join(format!("{name}.json"))
    }

    /// `<module dir>/index.<ext>`
    pub fn module_path(&self) -> PathBuf {
        self.module_dir.join(format!("index.{}", self.module_ext))
    }
}
