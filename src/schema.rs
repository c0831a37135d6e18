//! JSON Schema loading and validation for registries and catalog payloads.
//!
//! The registry schema ships as `schema/registry.schema.json`. The narrower
//! catalog payload schema is derived from its `registryItem` definition so the
//! two cannot drift: the payload drops the fields that never leave the build
//! and requires every file to be a fully resolved descriptor.

use anyhow::{Context, Result, anyhow};
use jsonschema::JSONSchema;
use serde_json::{Value, json};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

const BUNDLED_REGISTRY_SCHEMA: &str = include_str!("../schema/registry.schema.json");

/// Item fields stripped from catalog payloads before validation and writing.
pub const PAYLOAD_OMITTED_FIELDS: &[&str] = &["source", "category", "subcategory", "chunks"];

#[derive(Debug, Clone, PartialEq, Eq)]
/// A single schema violation: where it happened and what was wrong.
pub struct Violation {
    pub pointer: String,
    pub message: String,
}

#[derive(Debug, Error)]
#[error("{subject} failed schema validation:\n{}", render_violations(.violations))]
/// Every violation found while validating one instance.
pub struct ValidationError {
    pub subject: String,
    pub violations: Vec<Violation>,
}

fn render_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| format!("  {}: {}", violation.pointer, violation.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A compiled JSON Schema plus the raw document it was built from.
pub struct CompiledSchema {
    label: String,
    compiled: JSONSchema,
    raw: Value,
}

impl CompiledSchema {
    pub fn compile(label: impl Into<String>, raw: Value) -> Result<Self> {
        let label = label.into();
        let compiled =
            JSONSchema::compile(&raw).map_err(|err| anyhow!("compiling {label}: {err}"))?;
        Ok(Self {
            label,
            compiled,
            raw,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Validate `instance`, collecting all violations rather than stopping at
    /// the first one.
    pub fn validate(&self, subject: &str, instance: &Value) -> Result<(), ValidationError> {
        let Err(errors) = self.compiled.validate(instance) else {
            return Ok(());
        };
        let violations = errors
            .map(|err| {
                let pointer = err.instance_path.to_string();
                Violation {
                    pointer: if pointer.is_empty() {
                        "/".to_string()
                    } else {
                        pointer
                    },
                    message: err.to_string(),
                }
            })
            .collect();
        Err(ValidationError {
            subject: subject.to_string(),
            violations,
        })
    }
}

/// The whole-registry schema and the derived per-item payload schema.
pub struct RegistrySchemas {
    pub registry: CompiledSchema,
    pub payload: CompiledSchema,
}

impl RegistrySchemas {
    /// Compile the schema bundled with the crate.
    pub fn bundled() -> Result<Self> {
        let raw: Value = serde_json::from_str(BUNDLED_REGISTRY_SCHEMA)
            .context("parsing bundled registry schema")?;
        Self::from_registry_schema(raw)
    }

    /// Compile a registry schema read from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("opening schema {}", path.display()))?;
        let raw: Value = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing schema {}", path.display()))?;
        Self::from_registry_schema(raw)
            .with_context(|| format!("loading registry schema {}", path.display()))
    }

    pub fn from_registry_schema(raw: Value) -> Result<Self> {
        let payload_raw = catalog_payload_schema(&raw)?;
        Ok(Self {
            registry: CompiledSchema::compile("registry schema", raw)?,
            payload: CompiledSchema::compile("catalog payload schema", payload_raw)?,
        })
    }
}

/// Derive the payload schema from the registry schema's item definition.
fn catalog_payload_schema(registry_schema: &Value) -> Result<Value> {
    let definitions = registry_schema
        .get("definitions")
        .cloned()
        .ok_or_else(|| anyhow!("registry schema missing definitions"))?;
    let mut item = registry_schema
        .pointer("/definitions/registryItem")
        .cloned()
        .ok_or_else(|| anyhow!("registry schema missing definitions/registryItem"))?;
    let object = item
        .as_object_mut()
        .ok_or_else(|| anyhow!("definitions/registryItem must be an object"))?;

    let properties = object
        .get_mut("properties")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| anyhow!("definitions/registryItem missing properties"))?;
    for field in PAYLOAD_OMITTED_FIELDS {
        properties.remove(*field);
    }
    properties.insert(
        "files".to_string(),
        json!({
            "type": "array",
            "items": {
                "allOf": [
                    { "$ref": "#/definitions/fileDescriptor" },
                    { "required": ["content", "target"] }
                ]
            }
        }),
    );

    if let Some(required) = object.get_mut("required").and_then(Value::as_array_mut) {
        required.retain(|field| {
            field
                .as_str()
                .is_none_or(|name| !PAYLOAD_OMITTED_FIELDS.contains(&name))
        });
    }

    if let Some(draft) = registry_schema.get("$schema") {
        object.insert("$schema".to_string(), draft.clone());
    }
    object.insert(
        "title".to_string(),
        Value::String("hookagain catalog payload".to_string()),
    );
    object.insert("definitions".to_string(), definitions);
    Ok(item)
}
