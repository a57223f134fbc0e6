//! Damage components and rich damage structures.
//!
//! A [`RichDamageStructure`] is the detailed form of an attack's damage:
//! base dice, flat modifiers, and extra dice, each carrying a damage type
//! and an optional category. Everything the synthesizer consumes is built
//! from these types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dice::Die;

/// Damage type used when the source names none.
pub const UNTYPED: &str = "untyped";

/// Lowercase `name` into a word that can sit inside a formula's `[tag]`.
///
/// Whitespace runs become `-`, other punctuation is dropped, and the tag
/// starts with a letter or underscore.
fn tag_name(name: &str) -> String {
    let joined = name.split_whitespace().collect::<Vec<_>>().join("-");
    let kept: String = joined
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    kept.trim_start_matches(|c: char| !(c.is_ascii_alphabetic() || c == '_'))
        .to_string()
}

/// A damage type such as `fire` or `piercing`.
///
/// Always lowercase and never empty: a missing or blank type becomes
/// [`UNTYPED`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub struct DamageType(String);

impl DamageType {
    /// Create a damage type, falling back to `untyped` for blank input.
    ///
    /// The name is reduced to a bracket tag: `"Cold Iron"` becomes `cold-iron`.
    pub fn new(name: &str) -> Self {
        let name = tag_name(name);
        if name.is_empty() {
            Self::untyped()
        } else {
            Self(name)
        }
    }

    /// The `untyped` sentinel.
    pub fn untyped() -> Self {
        Self(UNTYPED.to_string())
    }

    /// Returns true for the `untyped` sentinel.
    pub fn is_untyped(&self) -> bool {
        self.0 == UNTYPED
    }

    /// The type name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DamageType {
    fn default() -> Self {
        Self::untyped()
    }
}

impl From<&str> for DamageType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<Option<String>> for DamageType {
    fn from(name: Option<String>) -> Self {
        name.map(|n| Self::new(&n)).unwrap_or_default()
    }
}

impl From<DamageType> for String {
    fn from(damage_type: DamageType) -> Self {
        damage_type.0
    }
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A damage sub-classification, rendered as its own bracketed tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum DamageCategory {
    /// No category. Rendered without a category group.
    #[default]
    None,
    /// Damage that recurs at the end of each turn.
    Persistent,
    /// Damage dealt to creatures adjacent to the target.
    Splash,
    /// Damage from precision effects such as sneak attack.
    Precision,
    /// Any other category the host names.
    Other(String),
}

impl DamageCategory {
    /// Parse a category name. Blank and `none` mean no category.
    pub fn parse(s: &str) -> Self {
        match tag_name(s).as_str() {
            "" | "none" | "null" => Self::None,
            "persistent" => Self::Persistent,
            "splash" => Self::Splash,
            "precision" => Self::Precision,
            other => Self::Other(other.to_string()),
        }
    }

    /// The bracket tag for this category, or `None` when uncategorized.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Persistent => Some("persistent"),
            Self::Splash => Some("splash"),
            Self::Precision => Some("precision"),
            Self::Other(s) => Some(s),
        }
    }

    /// Returns true if this is the uncategorized variant.
    pub fn is_none(&self) -> bool {
        *self == Self::None
    }

    /// Whether critical hits enlarge damage of this category.
    ///
    /// Persistent and splash damage are never increased by a critical.
    pub fn scales_on_critical(&self) -> bool {
        !matches!(self, Self::Persistent | Self::Splash)
    }
}

impl From<Option<String>> for DamageCategory {
    fn from(s: Option<String>) -> Self {
        s.map(|s| Self::parse(&s)).unwrap_or_default()
    }
}

impl From<DamageCategory> for Option<String> {
    fn from(category: DamageCategory) -> Self {
        category.tag().map(str::to_string)
    }
}

impl fmt::Display for DamageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag().unwrap_or("none"))
    }
}

/// One normalized unit of damage: some dice of one size plus a flat value.
///
/// `dice_count > 0` holds exactly when `die_size` is present. A component
/// without dice is a pure flat modifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageComponent {
    /// Number of dice.
    #[serde(default)]
    pub dice_count: u32,
    /// Die size, absent for a pure flat modifier.
    #[serde(default)]
    pub die_size: Option<Die>,
    /// Flat value added to the dice (may be negative).
    #[serde(default)]
    pub flat_modifier: i32,
    /// Damage type.
    #[serde(default)]
    pub damage_type: DamageType,
    /// Damage category.
    #[serde(default)]
    pub category: DamageCategory,
    /// True for damage that only manifests on a critical hit (deadly dice).
    #[serde(default)]
    pub applies_on_critical_only: bool,
}

impl DamageComponent {
    /// `count` dice of one size with no flat modifier.
    pub fn dice(count: u32, die: Die, damage_type: DamageType) -> Self {
        Self {
            dice_count: count,
            die_size: Some(die),
            flat_modifier: 0,
            damage_type,
            category: DamageCategory::None,
            applies_on_critical_only: false,
        }
    }

    /// A pure flat modifier.
    pub fn flat(value: i32, damage_type: DamageType) -> Self {
        Self {
            dice_count: 0,
            die_size: None,
            flat_modifier: value,
            damage_type,
            category: DamageCategory::None,
            applies_on_critical_only: false,
        }
    }

    /// Set the flat modifier.
    pub fn with_modifier(mut self, modifier: i32) -> Self {
        self.flat_modifier = modifier;
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: DamageCategory) -> Self {
        self.category = category;
        self
    }

    /// Mark the component as critical-only.
    pub fn critical_only(mut self) -> Self {
        self.applies_on_critical_only = true;
        self
    }

    /// The die size when the component actually rolls dice.
    pub fn rolled_die(&self) -> Option<Die> {
        self.die_size.filter(|_| self.dice_count > 0)
    }

    /// Returns true if the dice-count/die-size pairing is consistent.
    pub fn is_valid(&self) -> bool {
        (self.dice_count > 0) == self.die_size.is_some()
    }

    /// Returns true if the component contributes nothing.
    pub fn is_empty(&self) -> bool {
        self.rolled_die().is_none() && self.flat_modifier == 0
    }

    /// Highest value the dice alone can roll.
    pub fn max_dice_value(&self) -> i64 {
        self.rolled_die()
            .map(|die| i64::from(self.dice_count) * i64::from(die.sides()))
            .unwrap_or(0)
    }
}

/// A flat modifier entry of a rich damage structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierEntry {
    /// Human-readable source of the modifier.
    #[serde(default)]
    pub label: String,
    /// The modifier value.
    pub value: i32,
    /// Damage category.
    #[serde(default)]
    pub category: DamageCategory,
    /// Damage type; `None` means "same as the base damage".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_type: Option<DamageType>,
    /// False when the ruleset has toggled the modifier off.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// True when the ruleset ignores the modifier (e.g. an unmet condition).
    #[serde(default)]
    pub ignored: bool,
    /// True for modifiers that only apply on a critical hit.
    #[serde(default)]
    pub critical_only: bool,
}

impl ModifierEntry {
    /// An enabled modifier inheriting the base damage type.
    pub fn new(label: impl Into<String>, value: i32) -> Self {
        Self {
            label: label.into(),
            value,
            category: DamageCategory::None,
            damage_type: None,
            enabled: true,
            ignored: false,
            critical_only: false,
        }
    }

    /// Set an explicit damage type.
    pub fn with_type(mut self, damage_type: DamageType) -> Self {
        self.damage_type = Some(damage_type);
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: DamageCategory) -> Self {
        self.category = category;
        self
    }

    /// Returns true if the entry takes part in synthesis.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.ignored
    }
}

/// An extra-dice entry of a rich damage structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraDiceEntry {
    /// Human-readable source of the dice.
    #[serde(default)]
    pub label: String,
    /// The dice themselves.
    #[serde(flatten)]
    pub component: DamageComponent,
    /// True for dice that only apply on a critical hit.
    #[serde(default)]
    pub critical_only: bool,
    /// False when the ruleset has toggled the dice off.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// True when the ruleset ignores the dice.
    #[serde(default)]
    pub ignored: bool,
}

impl ExtraDiceEntry {
    /// Enabled extra dice that apply on every hit.
    pub fn new(label: impl Into<String>, component: DamageComponent) -> Self {
        Self {
            label: label.into(),
            component,
            critical_only: false,
            enabled: true,
            ignored: false,
        }
    }

    /// Enabled extra dice that only apply on a critical hit.
    pub fn critical(label: impl Into<String>, component: DamageComponent) -> Self {
        let mut entry = Self::new(label, component.critical_only());
        entry.critical_only = true;
        entry
    }

    /// Returns true if the entry takes part in synthesis.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.ignored
    }
}

fn enabled_by_default() -> bool {
    true
}

/// The detailed, multi-component damage of one attack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichDamageStructure {
    /// Base dice of the weapon or spell, in order.
    #[serde(default)]
    pub base: Vec<DamageComponent>,
    /// Flat modifiers, in order.
    #[serde(default)]
    pub modifiers: Vec<ModifierEntry>,
    /// Extra dice, in order.
    #[serde(default)]
    pub extra_dice: Vec<ExtraDiceEntry>,
}

impl RichDamageStructure {
    /// Returns true if the structure has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.modifiers.is_empty() && self.extra_dice.is_empty()
    }

    /// The damage type of the first base component, or `untyped`.
    pub fn primary_damage_type(&self) -> DamageType {
        self.base
            .first()
            .map(|c| c.damage_type.clone())
            .unwrap_or_default()
    }

    /// Returns true if any base component rolls dice.
    pub fn has_base_dice(&self) -> bool {
        self.base.iter().any(|c| c.rolled_die().is_some())
    }
}
