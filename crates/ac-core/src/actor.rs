use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CoreError, CoreResult};

/// One of the six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    /// Strength.
    #[serde(rename = "str", alias = "strength")]
    Strength,
    /// Dexterity.
    #[serde(rename = "dex", alias = "dexterity")]
    Dexterity,
    /// Constitution.
    #[serde(rename = "con", alias = "constitution")]
    Constitution,
    /// Intelligence.
    #[serde(rename = "int", alias = "intelligence")]
    Intelligence,
    /// Wisdom.
    #[serde(rename = "wis", alias = "wisdom")]
    Wisdom,
    /// Charisma.
    #[serde(rename = "cha", alias = "charisma")]
    Charisma,
}

impl FromStr for Ability {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "str" | "strength" => Ok(Self::Strength),
            "dex" | "dexterity" => Ok(Self::Dexterity),
            "con" | "constitution" => Ok(Self::Constitution),
            "int" | "intelligence" => Ok(Self::Intelligence),
            "wis" | "wisdom" => Ok(Self::Wisdom),
            "cha" | "charisma" => Ok(Self::Charisma),
            _ => Err(CoreError::UnknownAbility(s.to_string())),
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = match self {
            Self::Strength => "str",
            Self::Dexterity => "dex",
            Self::Constitution => "con",
            Self::Intelligence => "int",
            Self::Wisdom => "wis",
            Self::Charisma => "cha",
        };
        write!(f, "{short}")
    }
}

/// The actor owning an item. Only ability modifiers are read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Actor {
    /// Display name, used as the chat speaker.
    #[serde(default)]
    pub name: String,
    /// Ability modifiers keyed by ability.
    #[serde(default, deserialize_with = "deserialize_abilities")]
    pub abilities: HashMap<Ability, i32>,
}

impl Actor {
    /// Create an actor without ability modifiers.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            abilities: HashMap::new(),
        }
    }

    /// Set an ability modifier.
    pub fn with_ability(mut self, ability: Ability, modifier: i32) -> Self {
        self.abilities.insert(ability, modifier);
        self
    }

    /// Read an actor from its JSON representation.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::InvalidActor(e.to_string()))
    }

    /// The modifier for an ability, or 0 if the actor has none recorded.
    pub fn modifier(&self, ability: Ability) -> i32 {
        self.abilities.get(&ability).copied().unwrap_or(0)
    }
}

/// Abilities arrive either as plain numbers (`"str": 4`) or as the host's
/// block form (`"str": {"mod": 4}`).
#[derive(Deserialize)]
#[serde(untagged)]
enum AbilityValue {
    Plain(i32),
    Block {
        #[serde(rename = "mod")]
        modifier: i32,
    },
}

fn deserialize_abilities<'de, D>(deserializer: D) -> Result<HashMap<Ability, i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = HashMap::<Ability, AbilityValue>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(ability, value)| {
            let modifier = match value {
                AbilityValue::Plain(m) => m,
                AbilityValue::Block { modifier } => modifier,
            };
            (ability, modifier)
        })
        .collect())
}
