use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

/// Opaque identifier the host assigns to an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    /// Wrap a host-provided identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a random 16-character identifier in the host's style.
    pub fn generate() -> Self {
        let simple = Uuid::new_v4().simple().to_string();
        Self(simple[..16].to_string())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of an item. Extensible via `Custom(String)` for kinds the
/// engine has no special handling for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemKind {
    /// A physical weapon carried by a character.
    Weapon,
    /// An NPC strike (the host calls these "melee" items even when ranged).
    Strike,
    /// A spell.
    Spell,
    /// A consumable such as a bomb or a scroll.
    Consumable,
    /// Any other item type.
    Custom(String),
}

impl ItemKind {
    /// Parse a kind from the host's item type string.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "weapon" => Self::Weapon,
            "melee" | "strike" => Self::Strike,
            "spell" => Self::Spell,
            "consumable" => Self::Consumable,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Returns true for kinds that represent weapon attacks.
    pub fn is_weapon(&self) -> bool {
        matches!(self, Self::Weapon | Self::Strike)
    }
}

impl From<String> for ItemKind {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<ItemKind> for String {
    fn from(kind: ItemKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weapon => write!(f, "weapon"),
            Self::Strike => write!(f, "melee"),
            Self::Spell => write!(f, "spell"),
            Self::Consumable => write!(f, "consumable"),
            Self::Custom(s) => write!(f, "{s}"),
        }
    }
}

/// An item as the host exposes it: identity, kind, and raw system data.
///
/// `system` holds the host's loosely-typed item data. Damage descriptions,
/// runes, traits, and bonus fields are all read out of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Host identifier of the item.
    #[serde(default = "ItemId::generate", alias = "_id")]
    pub id: ItemId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Item kind.
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Raw system data.
    #[serde(default)]
    pub system: Value,
}

impl Item {
    /// Create an item with a fresh identifier.
    pub fn new(kind: ItemKind, name: impl Into<String>, system: Value) -> Self {
        Self::with_id(ItemId::generate(), kind, name, system)
    }

    /// Create an item with a known identifier.
    pub fn with_id(id: ItemId, kind: ItemKind, name: impl Into<String>, system: Value) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            system,
        }
    }

    /// Read an item from its JSON representation.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::InvalidItem(e.to_string()))
    }

    /// Trait tokens on the item, lowercased.
    ///
    /// Accepts both `system.traits.value: [..]` and a bare `system.traits: [..]`.
    pub fn traits(&self) -> Vec<String> {
        trait_tokens(&self.system)
    }

    /// Returns true if the item carries the given trait token.
    pub fn has_trait(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.traits().iter().any(|t| *t == name)
    }

    /// Returns true for unarmed attacks (fist, claws, and the like).
    pub fn is_unarmed(&self) -> bool {
        self.has_trait("unarmed")
            || self.system["category"]
                .as_str()
                .is_some_and(|c| c.eq_ignore_ascii_case("unarmed"))
    }

    /// Returns true for ranged attacks.
    ///
    /// An item is ranged when it has a positive range increment, or carries
    /// a `range-*` trait (the form NPC strikes use).
    pub fn is_ranged(&self) -> bool {
        let range = &self.system["range"];
        let increment = range
            .as_i64()
            .or_else(|| range.get("increment").and_then(Value::as_i64))
            .unwrap_or(0);
        increment > 0 || self.traits().iter().any(|t| t.starts_with("range-"))
    }
}

/// Trait tokens in raw system data, lowercased.
pub fn trait_tokens(system: &Value) -> Vec<String> {
    let traits = &system["traits"];
    let list = traits
        .get("value")
        .and_then(Value::as_array)
        .or_else(|| traits.as_array());
    list.map(|values| {
        values
            .iter()
            .filter_map(Value::as_str)
            .map(|t| t.trim().to_lowercase())
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn item_id_generate_has_host_length() {
        let id = ItemId::generate();
        assert_eq!(id.as_str().len(), 16);
        assert_ne!(id, ItemId::generate());
    }

    #[test]
    fn item_kind_parse_known_kinds() {
        assert_eq!(ItemKind::parse("weapon"), ItemKind::Weapon);
        assert_eq!(ItemKind::parse("Melee"), ItemKind::Strike);
        assert_eq!(ItemKind::parse("spell"), ItemKind::Spell);
        assert_eq!(ItemKind::parse("consumable"), ItemKind::Consumable);
    }

    #[test]
    fn item_kind_parse_custom() {
        assert_eq!(
            ItemKind::parse("feat"),
            ItemKind::Custom("feat".to_string())
        );
        assert!(!ItemKind::parse("feat").is_weapon());
        assert!(ItemKind::Strike.is_weapon());
    }

    #[test]
    fn item_from_json_reads_host_fields() {
        let item = Item::from_json(
            r#"{"_id": "abc123", "name": "Rapier", "type": "weapon",
                "system": {"traits": {"value": ["Deadly-d8", "finesse"]}}}"#,
        )
        .unwrap();
        assert_eq!(item.id, ItemId::from("abc123"));
        assert_eq!(item.kind, ItemKind::Weapon);
        assert_eq!(item.traits(), vec!["deadly-d8", "finesse"]);
        assert!(item.has_trait("FINESSE"));
    }

    #[test]
    fn item_from_json_generates_missing_id() {
        let item = Item::from_json(r#"{"type": "spell"}"#).unwrap();
        assert_eq!(item.id.as_str().len(), 16);
        assert!(item.name.is_empty());
    }

    #[test]
    fn item_from_json_rejects_missing_type() {
        let err = Item::from_json(r#"{"name": "Rapier"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid item"));
    }

    #[test]
    fn bare_trait_array_is_accepted() {
        let item = Item::new(
            ItemKind::Strike,
            "Jaws",
            json!({"traits": ["unarmed", "range-increment-30"]}),
        );
        assert!(item.is_unarmed());
        assert!(item.is_ranged());
    }

    #[test]
    fn range_increment_marks_ranged() {
        let bow = Item::new(ItemKind::Weapon, "Shortbow", json!({"range": 60}));
        let sword = Item::new(ItemKind::Weapon, "Longsword", json!({"range": null}));
        assert!(bow.is_ranged());
        assert!(!sword.is_ranged());
    }

    #[test]
    fn unarmed_category_marks_unarmed() {
        let fist = Item::new(ItemKind::Weapon, "Fist", json!({"category": "unarmed"}));
        assert!(fist.is_unarmed());
    }
}
