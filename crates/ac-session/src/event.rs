//! Events the host delivers and the values handed back to it.

use std::fmt;
use std::str::FromStr;

use ac_core::{Actor, DegreeOfSuccess, Item, ItemId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Type tag the host puts on rich damage rolls.
pub const DAMAGE_ROLL_TAG: &str = "DamageRoll";

/// Who can see a chat post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Everyone.
    #[default]
    Public,
    /// The roller and the game master.
    Gm,
    /// The game master only; the roller sees nothing.
    Blind,
    /// The roller only.
    #[serde(rename = "self")]
    SelfOnly,
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "public" | "publicroll" => Ok(Self::Public),
            "gm" | "gmroll" => Ok(Self::Gm),
            "blind" | "blindroll" => Ok(Self::Blind),
            "self" | "selfroll" => Ok(Self::SelfOnly),
            other => Err(format!("unknown visibility: {other}")),
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Gm => write!(f, "gm"),
            Self::Blind => write!(f, "blind"),
            Self::SelfOnly => write!(f, "self"),
        }
    }
}

/// One roll attached to a chat entry, as far as this crate cares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollRecord {
    /// The host's roll class name.
    #[serde(rename = "class", alias = "typeTag")]
    pub type_tag: String,
    /// The roll's damage description, present on damage rolls.
    #[serde(default)]
    pub damage: Option<Value>,
}

impl RollRecord {
    /// A rich damage roll carrying `damage`.
    pub fn damage_roll(damage: Value) -> Self {
        Self {
            type_tag: DAMAGE_ROLL_TAG.to_string(),
            damage: Some(damage),
        }
    }

    /// Returns true if the host tagged this roll as a damage roll.
    pub fn is_damage_roll(&self) -> bool {
        self.type_tag == DAMAGE_ROLL_TAG
    }
}

/// "A chat entry was created."
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEntryCreated {
    /// Rolls on the entry, in order.
    #[serde(default)]
    pub rolls: Vec<RollRecord>,
    /// Item the entry originated from.
    #[serde(default)]
    pub source_item: Option<ItemId>,
}

/// The originating message of a chat entry.
#[derive(Debug, Clone, Default)]
pub struct ChatEntry {
    /// Item the attack was made with.
    pub item: Option<Item>,
    /// Actor who attacked.
    pub actor: Option<Actor>,
    /// Outcome flag reported by the host. Absent means not critical.
    pub outcome: Option<DegreeOfSuccess>,
    /// Visibility of the original entry.
    pub visibility: Visibility,
}

/// "A chat entry is about to be displayed."
#[derive(Debug, Clone, Default)]
pub struct ChatEntryRendering {
    /// The message being displayed.
    pub entry: ChatEntry,
    /// Whether the host rendered its own damage action on the entry.
    pub has_damage_action: bool,
}

/// The action offered on a chat entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AltCritAction {
    /// Item the action rolls damage for.
    pub item: ItemId,
    /// Whether the action will roll critical damage.
    pub critical: bool,
    /// Button label.
    pub label: String,
}
