use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Unique name of a registry item (e.g., `use-debounce`).
///
/// Names double as artifact file names (`<public>/<name>.json`) and as keys in
/// the generated lookup module.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemName(pub String);

impl ItemName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Item types that get a per-item catalog file and a flat index entry.
pub const CATALOGUED_TYPES: &[ItemType] = &[ItemType::Hook];

/// Closed set of `registry:*` type tags.
///
/// Unknown tags are rejected at deserialization time; the registry schema
/// lists the same values so schema and model cannot drift apart silently.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ItemType {
    Style,
    Lib,
    Example,
    Block,
    Component,
    Ui,
    Hook,
    Theme,
    Page,
}

impl ItemType {
    pub const ALL: [ItemType; 9] = [
        ItemType::Style,
        ItemType::Lib,
        ItemType::Example,
        ItemType::Block,
        ItemType::Component,
        ItemType::Ui,
        ItemType::Hook,
        ItemType::Theme,
        ItemType::Page,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Style => "registry:style",
            ItemType::Lib => "registry:lib",
            ItemType::Example => "registry:example",
            ItemType::Block => "registry:block",
            ItemType::Component => "registry:component",
            ItemType::Ui => "registry:ui",
            ItemType::Hook => "registry:hook",
            ItemType::Theme => "registry:theme",
            ItemType::Page => "registry:page",
        }
    }

    /// Tag without the `registry:` namespace, used for fallback module paths.
    pub fn short_name(self) -> &'static str {
        let tag = self.as_str();
        tag.split_once(':').map(|(_, rest)| rest).unwrap_or(tag)
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.as_str() == value)
    }

    /// Whether items of this type are written to the catalog and flat index.
    pub fn is_catalogued(self) -> bool {
        CATALOGUED_TYPES.contains(&self)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ItemType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ItemType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).ok_or_else(|| {
            serde::de::Error::custom(format!("unknown registry item type '{value}'"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_type_round_trips_every_tag() {
        for ty in ItemType::ALL {
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json.trim_matches('"'), ty.as_str());
            let back: ItemType = serde_json::from_str(&json).unwrap();
            assert_eq!(back, ty);
        }
    }

    #[test]
    fn unknown_item_type_is_rejected() {
        let err = serde_json::from_str::<ItemType>("\"registry:widget\"").unwrap_err();
        assert!(err.to_string().contains("registry:widget"));
    }

    #[test]
    fn short_name_drops_namespace() {
        assert_eq!(ItemType::Hook.short_name(), "hook");
        assert_eq!(ItemType::Page.short_name(), "page");
    }

    #[test]
    fn only_hooks_are_catalogued() {
        let catalogued: Vec<_> = ItemType::ALL
            .into_iter()
            .filter(|ty| ty.is_catalogued())
            .collect();
        assert_eq!(catalogued, vec![ItemType::Hook]);
    }

    #[test]
    fn item_name_is_transparent() {
        let name = ItemName("use-foo".to_string());
        let serialized = serde_json::to_string(&name).unwrap();
        assert_eq!(serialized, "\"use-foo\"");
        let parsed: ItemName = serde_json::from_str(&serialized).unwrap();
        assert_eq!(parsed, name);
    }
}
