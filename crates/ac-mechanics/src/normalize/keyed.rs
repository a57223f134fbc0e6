//! Decoder for keyed multi-instance damage.
//!
//! Area effects and multi-type spells store damage as a map of independent
//! instances, each an expression string plus a damage type:
//!
//! ```text
//! { "0": { "formula": "2d6+3", "type": "fire" },
//!   "1": { "value": "1d4", "type": { "value": "fire", "subtype": "persistent" } } }
//! ```

use std::cmp::Ordering;

use serde_json::{Map, Value};

use crate::damage::{DamageCategory, DamageComponent, DamageType, RichDamageStructure};
use crate::dice::{Decomposed, Die, decompose};

const EXPRESSION_KEYS: [&str; 3] = ["formula", "damage", "value"];

/// Returns true if `value` looks like one keyed damage instance.
pub(crate) fn is_entry(value: &Value) -> bool {
    expression(value).is_some()
}

fn expression(entry: &Value) -> Option<String> {
    EXPRESSION_KEYS.iter().find_map(|key| match entry.get(*key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn damage_type(entry: &Value) -> DamageType {
    let ty = &entry["type"];
    ty.as_str()
        .or_else(|| entry["damageType"].as_str())
        .or_else(|| ty["value"].as_str())
        .map(DamageType::new)
        .unwrap_or_default()
}

fn category(entry: &Value) -> DamageCategory {
    entry["category"]
        .as_str()
        .or_else(|| entry["type"]["subtype"].as_str())
        .map(DamageCategory::parse)
        .unwrap_or_default()
}

/// Integer keys in numeric order, then any other keys alphabetically.
fn instance_order(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Decode every instance in key order into base components.
///
/// An expression that cannot be decomposed falls back to a single `1d4` of
/// the instance's damage type.
pub(crate) fn decode(map: &Map<String, Value>) -> RichDamageStructure {
    let mut base = Vec::new();
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| instance_order(a.0, b.0));

    for (key, entry) in entries {
        let Some(source) = expression(entry) else {
            continue;
        };
        let damage_type = damage_type(entry);
        let category = category(entry);

        let decomposed = decompose(&source).unwrap_or_else(|err| {
            tracing::warn!(key = %key, %err, "falling back to 1d4");
            Decomposed {
                dice: vec![(1, Die::D4)],
                flat: 0,
            }
        });

        let start = base.len();
        base.extend(decomposed.dice.iter().map(|&(count, die)| {
            DamageComponent::dice(count, die, damage_type.clone()).with_category(category.clone())
        }));
        match base.get_mut(start) {
            Some(first) => first.flat_modifier = decomposed.flat,
            None if decomposed.flat != 0 => base.push(
                DamageComponent::flat(decomposed.flat, damage_type).with_category(category),
            ),
            None => {}
        }
    }

    RichDamageStructure {
        base,
        ..Default::default()
    }
}
