//! Registry item definitions.
//!
//! This module wraps `registry.json` so the builders consume a validated,
//! typed snapshot. Types here mirror the schema fields; use
//! [`Registry::load`] (or [`Registry::from_value`]) to obtain one.

pub mod identity;
pub mod loader;
pub mod model;

pub use identity::{CATALOGUED_TYPES, ItemName, ItemType};
pub use loader::RegistryError;
pub use model::{Chunk, FileDescriptor, FileEntry, Registry, RegistryItem};
