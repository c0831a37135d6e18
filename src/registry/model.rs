//! Deserializable representation of `registry.json`.
//!
//! The types mirror `schema/registry.schema.json` so the builders can work on
//! typed items instead of ad-hoc JSON maps. Construct a [`Registry`] through
//! the loader, which validates against the schema first; these structs alone
//! perform no validation beyond what serde enforces.

use crate::registry::identity::{ItemName, ItemType};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One distributable entry of the registry (a hook, a page, ...).
pub struct RegistryItem {
    pub name: ItemName,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_dependencies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_dependencies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunks: Option<Vec<Chunk>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
/// A file reference as written in the registry: a bare path or a descriptor.
pub enum FileEntry {
    Path(String),
    Descriptor(FileDescriptor),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Structured file reference.
///
/// `content` and `target` stay `None` when the registry omits them; the
/// catalog builder fills both in for the resolved form.
pub struct FileDescriptor {
    pub path: String,
    #[serde(rename = "type")]
    pub file_type: ItemType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Slot for split-out component chunks.
///
/// No chunk shapes are produced yet, so the only case is `Reserved`. Lookup
/// entries start with an empty list and render whatever they hold.
pub enum Chunk {
    Reserved,
}

impl FileEntry {
    pub fn path(&self) -> &str {
        match self {
            FileEntry::Path(path) => path,
            FileEntry::Descriptor(descriptor) => &descriptor.path,
        }
    }

    /// Convert into a descriptor; bare paths inherit the owning item's type and
    /// get empty `content`/`target`.
    pub fn normalize(&self, item_type: ItemType) -> FileDescriptor {
        match self {
            FileEntry::Path(path) => FileDescriptor {
                path: path.clone(),
                file_type: item_type,
                content: Some(String::new()),
                target: Some(String::new()),
            },
            FileEntry::Descriptor(descriptor) => descriptor.clone(),
        }
    }
}

impl RegistryItem {
    /// File entries normalized to descriptors, without reading any content.
    pub fn normalized_files(&self) -> Option<Vec<FileDescriptor>> {
        self.files.as_ref().map(|files| {
            files
                .iter()
                .map(|entry| entry.normalize(self.item_type))
                .collect()
        })
    }

    /// Copy of the item whose file list only holds descriptors.
    pub fn with_normalized_files(&self) -> RegistryItem {
        RegistryItem {
            files: self
                .normalized_files()
                .map(|files| files.into_iter().map(FileEntry::Descriptor).collect()),
            ..self.clone()
        }
    }

    /// True when the item declares at least one file.
    pub fn has_files(&self) -> bool {
        self.files.as_ref().is_some_and(|files| !files.is_empty())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Ordered, schema-validated collection of registry items with unique names.
pub struct Registry {
    items: Vec<RegistryItem>,
}

impl Registry {
    /// Wrap items that already passed validation; see `registry::loader`.
    pub(crate) fn from_validated(items: Vec<RegistryItem>) -> Self {
        Self { items }
    }

    /// Items in declaration order.
    pub fn items(&self) -> &[RegistryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&RegistryItem> {
        self.items.iter().find(|item| item.name.as_str() == name)
    }

    /// Items whose type is on the catalogue whitelist, in declaration order.
    pub fn catalogued(&self) -> impl Iterator<Item = &RegistryItem> {
        self.items
            .iter()
            .filter(|item| item.item_type.is_catalogued())
    }
}
