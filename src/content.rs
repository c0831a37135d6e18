//! Read access to registry file contents keyed by registry-relative path.
//!
//! The catalog builder treats every error from a source as "file
//! unavailable", so implementations only need to report failures, not
//! classify them.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Anything that can resolve a registry-relative path to source text.
pub trait ContentSource {
    fn read(&self, path: &str) -> io::Result<String>;
}

/// Files under a registry root directory (normally `<repo>/registry`).
///
/// Paths must stay inside the root: absolute paths and `..` segments are
/// refused rather than resolved.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative.components().any(|component| {
            matches!(
                component,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("path '{path}' escapes the registry root"),
            ));
        }
        Ok(self.root.join(relative))
    }
}

impl ContentSource for DirectorySource {
    fn read(&self, path: &str) -> io::Result<String> {
        fs::read_to_string(self.resolve(path)?)
    }
}

/// In-memory sources, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }
}

impl ContentSource for MemorySource {
    fn read(&self, path: &str) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no content for '{path}'"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn directory_source_reads_relative_paths() {
        let temp = TempDir::new().expect("temp dir");
        let hooks = temp.path().join("hooks");
        fs::create_dir_all(&hooks).unwrap();
        fs::write(hooks.join("use-foo.ts"), "export {}\n").unwrap();

        let source = DirectorySource::new(temp.path());
        assert_eq!(source.read("hooks/use-foo.ts").unwrap(), "export {}\n");
        assert_eq!(
            source.read("hooks/missing.ts").unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[test]
    fn directory_source_refuses_escaping_paths() {
        let temp = TempDir::new().expect("temp dir");
        let source = DirectorySource::new(temp.path().join("registry"));
        for path in ["../secret.ts", "/etc/passwd", "hooks/../../x.ts"] {
            assert_eq!(
                source.read(path).unwrap_err().kind(),
                io::ErrorKind::InvalidInput,
                "{path}"
            );
        }
    }

    #[test]
    fn memory_source_reports_missing_keys() {
        let source = MemorySource::new().with_file("a.ts", "a");
        assert_eq!(source.read("a.ts").unwrap(), "a");
        assert!(source.read("b.ts").is_err());
    }
}
