//! Data-driven lookups for bonus damage stored in scattered item fields.
//!
//! The host attaches flat damage bonuses in different places depending on
//! the weapon sub-type. Each [`BonusRule`] names one path; [`bonus_total`]
//! folds over a rule list and sums every numeric value found. A missing
//! path contributes zero.

use serde_json::Value;

/// One step of a bonus source path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Descend into an object field.
    Key(&'static str),
    /// Descend into every element of an array.
    Each,
}

/// A named path to an optional numeric bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BonusRule {
    /// Name used in diagnostics.
    pub name: &'static str,
    /// Path from the item's system data.
    pub path: &'static [Segment],
}

use Segment::{Each, Key};

/// Every location a weapon's flat damage bonus is read from, in order.
pub const BONUS_SOURCES: &[BonusRule] = &[
    BonusRule {
        name: "damage modifier",
        path: &[Key("damage"), Key("modifier")],
    },
    BonusRule {
        name: "top-level modifier",
        path: &[Key("modifier")],
    },
    BonusRule {
        name: "bonus damage block",
        path: &[Key("bonusDamage"), Key("value")],
    },
    BonusRule {
        name: "flat damage bonus",
        path: &[Key("flatDamageBonus")],
    },
    BonusRule {
        name: "bonus",
        path: &[Key("bonus")],
    },
    BonusRule {
        name: "bonus value",
        path: &[Key("bonus"), Key("value")],
    },
    BonusRule {
        name: "damage bonus",
        path: &[Key("damage"), Key("bonus")],
    },
    BonusRule {
        name: "property bonus",
        path: &[Key("properties"), Each, Key("bonus")],
    },
];

/// Sum every numeric value the rules find in `system`.
pub fn bonus_total(system: &Value, rules: &[BonusRule]) -> i32 {
    rules
        .iter()
        .map(|rule| {
            let found: i64 = collect(system, rule.path)
                .into_iter()
                .filter_map(as_bonus)
                .sum();
            if found != 0 {
                tracing::debug!(source = rule.name, bonus = found, "bonus source matched");
            }
            found
        })
        .sum::<i64>()
        .clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

fn collect<'a>(value: &'a Value, path: &[Segment]) -> Vec<&'a Value> {
    let Some((first, rest)) = path.split_first() else {
        return vec![value];
    };
    match first {
        Key(key) => value
            .get(*key)
            .map(|next| collect(next, rest))
            .unwrap_or_default(),
        Each => value
            .as_array()
            .map(|items| items.iter().flat_map(|item| collect(item, rest)).collect())
            .unwrap_or_default(),
    }
}

/// Read a bonus from a number or a numeric string.
pub(crate) fn as_bonus(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
