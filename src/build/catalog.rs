//! Per-item catalog files (`<public>/<name>.json`).
//!
//! Only whitelisted item types are catalogued. Each file entry is normalized,
//! its content read and rewritten, and a target derived for `v0-` hooks. The
//! assembled payload must pass the narrow payload schema; items that fail are
//! skipped and reported while the build carries on. A file the rewriter cannot
//! handle is published with its original text and reported.

use crate::build::{remove_artifact, write_artifact};
use crate::content::ContentSource;
use crate::layout::BuildLayout;
use crate::registry::{FileDescriptor, ItemName, ItemType, Registry, RegistryItem};
use crate::rewrite::SourceRewriter;
use crate::schema::CompiledSchema;
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, warn};

/// Item-name prefix that opts hook files into a derived `hooks/<file>` target.
pub const V0_PREFIX: &str = "v0-";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
/// The published form of a catalogued item.
pub struct CatalogPayload {
    pub name: ItemName,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_dependencies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_dependencies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileDescriptor>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedItem {
    pub name: String,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A file of `item` that was dropped or published unrewritten.
pub struct FileIssue {
    pub item: String,
    pub path: String,
    pub reason: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// What the catalog pass wrote and what it left out.
pub struct CatalogReport {
    pub written: Vec<String>,
    pub skipped: Vec<SkippedItem>,
    pub unreadable: Vec<FileIssue>,
    pub unrewritten: Vec<FileIssue>,
}

pub struct CatalogBuilder<'a> {
    layout: &'a BuildLayout,
    source: &'a dyn ContentSource,
    rewriter: &'a SourceRewriter,
    payload_schema: &'a CompiledSchema,
}

impl<'a> CatalogBuilder<'a> {
    pub fn new(
        layout: &'a BuildLayout,
        source: &'a dyn ContentSource,
        rewriter: &'a SourceRewriter,
        payload_schema: &'a CompiledSchema,
    ) -> Self {
        Self {
            layout,
            source,
            rewriter,
            payload_schema,
        }
    }

    /// Write a catalog file for every whitelisted item of `registry`.
    ///
    /// Unreadable files, files the rewriter failed on and payloads rejected by
    /// the schema are recorded in the report; only I/O on the output aborts.
    pub fn build(&self, registry: &Registry) -> Result<CatalogReport> {
        let mut report = CatalogReport::default();
        for item in registry.catalogued() {
            let path = self.layout.catalog_path(item.name.as_str());
            remove_artifact(&path)?;

            let payload = self.assemble(item, &mut report)?;
            let value = serde_json::to_value(&payload)
                .with_context(|| format!("serializing catalog payload for {}", item.name))?;
            if let Err(err) = self.payload_schema.validate(item.name.as_str(), &value) {
                warn!(item = %item.name, "catalog payload rejected; item skipped");
                report.skipped.push(SkippedItem {
                    name: item.name.0.clone(),
                    reason: err.to_string(),
                });
                continue;
            }

            let rendered = serde_json::to_string_pretty(&value)
                .with_context(|| format!("rendering catalog payload for {}", item.name))?;
            write_artifact(&path, &rendered)?;
            debug!(item = %item.name, path = %path.display(), "catalog file written");
            report.written.push(item.name.0.clone());
        }
        Ok(report)
    }

    /// Build the payload for one item, dropping files that cannot be read.
    pub fn assemble(
        &self,
        item: &RegistryItem,
        report: &mut CatalogReport,
    ) -> Result<CatalogPayload> {
        let files = match item.normalized_files() {
            Some(descriptors) => {
                let mut resolved = Vec::with_capacity(descriptors.len());
                for descriptor in descriptors {
                    if let Some(file) = self.resolve_file(item, descriptor, report)? {
                        resolved.push(file);
                    }
                }
                Some(resolved)
            }
            None => None,
        };

        Ok(CatalogPayload {
            name: item.name.clone(),
            item_type: item.item_type,
            description: item.description.clone(),
            dependencies: item.dependencies.clone(),
            dev_dependencies: item.dev_dependencies.clone(),
            registry_dependencies: item.registry_dependencies.clone(),
            files,
        })
    }

    fn resolve_file(
        &self,
        item: &RegistryItem,
        descriptor: FileDescriptor,
        report: &mut CatalogReport,
    ) -> Result<Option<FileDescriptor>> {
        let raw = match self.source.read(&descriptor.path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(
                    item = %item.name,
                    path = %descriptor.path,
                    error = %err,
                    "file unavailable"
                );
                report.unreadable.push(FileIssue {
                    item: item.name.0.clone(),
                    path: descriptor.path,
                    reason: err.to_string(),
                });
                return Ok(None);
            }
        };

        let content = match self.rewriter.rewrite(&raw, &descriptor.path) {
            Ok(content) => content,
            Err(err) => {
                warn!(
                    item = %item.name,
                    path = %descriptor.path,
                    error = %err,
                    "source not rewritten; publishing it unchanged"
                );
                report.unrewritten.push(FileIssue {
                    item: item.name.0.clone(),
                    path: descriptor.path.clone(),
                    reason: err.to_string(),
                });
                raw
            }
        };
        let target = derive_target(&item.name, &descriptor);
        Ok(Some(FileDescriptor {
            content: Some(content),
            target: Some(target),
            ..descriptor
        }))
    }
}

/// Target for a resolved file: the given one when set, `hooks/<basename>`
/// for hook files of `v0-` items, otherwise empty.
pub fn derive_target(name: &ItemName, descriptor: &FileDescriptor) -> String {
    match descriptor.target.as_deref() {
        Some(target) if !target.is_empty() => target.to_string(),
        _ if name.as_str().starts_with(V0_PREFIX) && descriptor.file_type == ItemType::Hook => {
            let basename = descriptor.path.rsplit('/').next().unwrap_or(&descriptor.path);
            format!("hooks/{basename}")
        }
        _ => String::new(),
    }
}
