//! Flat `index.json` and the lookup-module entries.

use crate::build::module::{ModuleFlavor, render_module};
use crate::build::{remove_artifact, write_artifact};
use crate::layout::BuildLayout;
use crate::registry::{Chunk, ItemType, Registry, RegistryItem};
use anyhow::{Context, Result};
use tracing::{debug, info};

/// Root the site imports registry modules from.
pub const MODULE_IMPORT_ROOT: &str = "@/registry";
/// Prefix applied to file paths recorded in lookup entries.
pub const FILE_PATH_PREFIX: &str = "registry/";

#[derive(Clone, Debug, PartialEq, Eq)]
/// One record of the generated lookup table.
pub struct IndexEntry {
    pub name: String,
    pub description: String,
    pub item_type: ItemType,
    pub registry_dependencies: Option<Vec<String>>,
    pub files: Vec<String>,
    /// Specifier passed to the lazy `import()`.
    pub component: String,
    pub source: String,
    pub category: String,
    pub subcategory: String,
    pub chunks: Vec<Chunk>,
}

impl IndexEntry {
    /// Entry for `item`, or `None` when it declares no files.
    pub fn from_item(item: &RegistryItem) -> Option<Self> {
        let files = item.files.as_ref().filter(|files| !files.is_empty())?;
        let first = files.first().map(|entry| entry.path());
        Some(Self {
            name: item.name.0.clone(),
            description: item.description.clone().unwrap_or_default(),
            item_type: item.item_type,
            registry_dependencies: item.registry_dependencies.clone(),
            files: files
                .iter()
                .map(|entry| format!("{FILE_PATH_PREFIX}{}", entry.path()))
                .collect(),
            component: component_path(item.item_type, item.name.as_str(), first),
            source: String::new(),
            category: item.category.clone().unwrap_or_default(),
            subcategory: item.subcategory.clone().unwrap_or_default(),
            chunks: Vec::new(),
        })
    }
}

/// Module specifier for an item's lazy component.
///
/// Uses the first file when there is one, otherwise the conventional
/// `<short type>/<name>` location.
pub fn component_path(item_type: ItemType, name: &str, first_file: Option<&str>) -> String {
    match first_file {
        Some(path) => format!("{MODULE_IMPORT_ROOT}/{path}"),
        None => format!("{MODULE_IMPORT_ROOT}/{}/{name}", item_type.short_name()),
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexReport {
    pub flat_entries: usize,
    pub module_entries: usize,
    /// Items left out of the lookup module because they have no files.
    pub without_files: Vec<String>,
}

pub struct IndexBuilder<'a> {
    layout: &'a BuildLayout,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(layout: &'a BuildLayout) -> Self {
        Self { layout }
    }

    /// Regenerate `index.json` and the lookup module from scratch.
    pub fn build(&self, registry: &Registry) -> Result<IndexReport> {
        let flavor = ModuleFlavor::from_extension(&self.layout.module_ext)?;
        let mut report = IndexReport::default();

        let flat = flat_index(registry);
        let index_path = self.layout.index_json_path();
        remove_artifact(&index_path)?;
        let rendered = serde_json::to_string_pretty(&flat).context("rendering index.json")?;
        write_artifact(&index_path, &rendered)?;
        report.flat_entries = flat.len();
        debug!(path = %index_path.display(), entries = flat.len(), "index.json written");

        let mut entries = Vec::new();
        for item in registry.items() {
            match IndexEntry::from_item(item) {
                Some(entry) => entries.push(entry),
                None => report.without_files.push(item.name.0.clone()),
            }
        }
        let module_path = self.layout.module_path();
        remove_artifact(&module_path)?;
        write_artifact(&module_path, &render_module(&entries, flavor)?)?;
        report.module_entries = entries.len();
        info!(
            path = %module_path.display(),
            entries = entries.len(),
            without_files = report.without_files.len(),
            "lookup module written"
        );
        Ok(report)
    }
}

/// Whitelisted items with file entries normalized, in registry order.
pub fn flat_index(registry: &Registry) -> Vec<RegistryItem> {
    registry
        .catalogued()
        .map(RegistryItem::with_normalized_files)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RegistrySchemas;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use std::fs;
    use tempfile::TempDir;

    fn registry(value: Value) -> Registry {
        let schemas = RegistrySchemas::bundled().expect("bundled schema");
        Registry::from_value(value, &schemas.registry, "registry").expect("valid registry")
    }

    fn sample() -> Registry {
        registry(json!([
            {
                "name": "use-foo",
                "type": "registry:hook",
                "registryDependencies": ["use-bar"],
                "files": ["hooks/use-foo.ts"]
            },
            {"name": "use-empty", "type": "registry:hook"},
            {
                "name": "home",
                "type": "registry:page",
                "description": "Landing page",
                "category": "pages",
                "files": [{"path": "app/page.tsx", "type": "registry:page", "target": "app/page.tsx"}]
            }
        ]))
    }

    #[test]
    fn entries_prefix_paths_and_default_missing_text() {
        let registry = sample();
        let entry = IndexEntry::from_item(registry.get("use-foo").unwrap()).unwrap();
        assert_eq!(entry.files, vec!["registry/hooks/use-foo.ts".to_string()]);
        assert_eq!(entry.component, "@/registry/hooks/use-foo.ts");
        assert_eq!(entry.description, "");
        assert_eq!(entry.subcategory, "");
        assert_eq!(entry.registry_dependencies, Some(vec!["use-bar".to_string()]));
        assert!(entry.chunks.is_empty());
        assert!(IndexEntry::from_item(registry.get("use-empty").unwrap()).is_none());
    }

    #[test]
    fn component_path_falls_back_to_type_and_name() {
        assert_eq!(
            component_path(ItemType::Hook, "use-foo", None),
            "@/registry/hook/use-foo"
        );
        assert_eq!(
            component_path(ItemType::Page, "home", Some("app/page.tsx")),
            "@/registry/app/page.tsx"
        );
    }

    #[test]
    fn flat_index_keeps_whitelisted_items_only() {
        let flat = serde_json::to_value(flat_index(&sample())).unwrap();
        assert_eq!(
            flat,
            json!([
                {
                    "name": "use-foo",
                    "type": "registry:hook",
                    "registryDependencies": ["use-bar"],
                    "files": [{
                        "path": "hooks/use-foo.ts",
                        "type": "registry:hook",
                        "content": "",
                        "target": ""
                    }]
                },
                {"name": "use-empty", "type": "registry:hook"}
            ])
        );
    }

    #[test]
    fn build_writes_both_artifacts() {
        let temp = TempDir::new().expect("temp dir");
        let layout = BuildLayout::from_root(temp.path());
        fs::create_dir_all(&layout.module_dir).unwrap();
        fs::write(layout.module_path(), "stale").unwrap();

        let report = IndexBuilder::new(&layout).build(&sample()).unwrap();
        assert_eq!(report.flat_entries, 2);
        assert_eq!(report.module_entries, 2);
        assert_eq!(report.without_files, vec!["use-empty".to_string()]);

        let module = fs::read_to_string(layout.module_path()).unwrap();
        assert!(module.contains("\"home\": {"));
        assert!(module.contains("import(\"@/registry/app/page.tsx\")"));
        assert!(!module.contains("use-empty"));
        assert!(!module.contains("stale"));

        let index: Value =
            serde_json::from_str(&fs::read_to_string(layout.index_json_path()).unwrap()).unwrap();
        assert_eq!(index.as_array().unwrap().len(), 2);
    }

    #[test]
    fn unknown_module_extension_is_an_error() {
        let temp = TempDir::new().expect("temp dir");
        let layout = BuildLayout::from_root(temp.path()).with_module_ext("py");
        assert!(IndexBuilder::new(&layout).build(&sample()).is_err());
    }
}
