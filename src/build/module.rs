//! Rendering of the generated lookup module (`__registry__/index.<ext>`).
//!
//! The module exports one object, `Index`, mapping item names to their
//! metadata and a `React.lazy` component. Every string is emitted as a JSON
//! string literal, which is also a valid JS literal.

use crate::build::index::IndexEntry;
use anyhow::{Context, Result, bail};
use serde_json::Value;

const GENERATED_BANNER: &str = "// This file is autogenerated by build-registry.\n\
// Do not edit this file directly.\n";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModuleFlavor {
    TypeScript,
    JavaScript,
}

impl ModuleFlavor {
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext {
            "ts" | "tsx" => Ok(ModuleFlavor::TypeScript),
            "js" | "jsx" | "mjs" => Ok(ModuleFlavor::JavaScript),
            other => bail!("unsupported module extension '{other}'"),
        }
    }
}

fn literal(value: &str) -> String {
    Value::from(value).to_string()
}

fn string_list(values: &[String]) -> String {
    Value::from(values.to_vec()).to_string()
}

/// Render the complete module text for `entries`, in the given order.
pub fn render_module(entries: &[IndexEntry], flavor: ModuleFlavor) -> Result<String> {
    let mut out = String::new();
    if flavor == ModuleFlavor::TypeScript {
        out.push_str("// @ts-nocheck\n");
    }
    out.push_str(GENERATED_BANNER);
    out.push_str("import * as React from \"react\"\n\n");
    out.push_str(match flavor {
        ModuleFlavor::TypeScript => "export const Index: Record<string, any> = {\n",
        ModuleFlavor::JavaScript => "export const Index = {\n",
    });

    for entry in entries {
        let dependencies = entry
            .registry_dependencies
            .as_deref()
            .map_or_else(|| "undefined".to_string(), string_list);
        out.push_str(&format!("  {}: {{\n", literal(&entry.name)));
        out.push_str(&format!("    name: {},\n", literal(&entry.name)));
        out.push_str(&format!("    description: {},\n", literal(&entry.description)));
        out.push_str(&format!("    type: {},\n", literal(entry.item_type.as_str())));
        out.push_str(&format!("    registryDependencies: {dependencies},\n"));
        out.push_str(&format!("    files: {},\n", string_list(&entry.files)));
        out.push_str(&format!(
            "    component: React.lazy(() => import({})),\n",
            literal(&entry.component)
        ));
        out.push_str(&format!("    source: {},\n", literal(&entry.source)));
        out.push_str(&format!("    category: {},\n", literal(&entry.category)));
        out.push_str(&format!("    subcategory: {},\n", literal(&entry.subcategory)));
        let chunks = serde_json::to_string(&entry.chunks)
            .with_context(|| format!("rendering chunks of {}", entry.name))?;
        out.push_str(&format!("    chunks: {chunks}\n"));
        out.push_str("  },\n");
    }
    out.push_str("}\n");
    Ok(out)
}
