//! Decoder for the rich damage shape.
//!
//! Accepts the host's field names (`diceNumber`, `modifier`,
//! `damageCategory`, `critical`, `slug`, `dice`) as well as the names
//! [`RichDamageStructure`] serializes to, so a normalized structure decodes
//! back to itself.

use serde::Deserialize;
use serde_json::Value;

use crate::damage::{
    DamageCategory, DamageComponent, DamageType, ExtraDiceEntry, ModifierEntry,
    RichDamageStructure,
};
use crate::dice::Die;
use crate::error::MechResult;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRich {
    #[serde(default)]
    base: Vec<RawBase>,
    #[serde(default)]
    modifiers: Vec<RawModifier>,
    #[serde(default, alias = "extraDice")]
    dice: Vec<RawDice>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBase {
    #[serde(default, alias = "diceCount")]
    dice_number: Option<u32>,
    #[serde(default)]
    die_size: Option<Die>,
    #[serde(default, alias = "flatModifier")]
    modifier: Option<i32>,
    #[serde(default)]
    damage_type: Option<String>,
    #[serde(default)]
    category: DamageCategory,
    #[serde(default)]
    applies_on_critical_only: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawModifier {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    slug: Option<String>,
    #[serde(alias = "value")]
    modifier: i32,
    #[serde(default)]
    damage_type: Option<String>,
    #[serde(default)]
    damage_category: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    enabled: Option<bool>,
    #[serde(default)]
    ignored: Option<bool>,
    #[serde(default, alias = "criticalOnly")]
    critical: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDice {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default, alias = "diceCount")]
    dice_number: Option<u32>,
    #[serde(default)]
    die_size: Option<Die>,
    #[serde(default, alias = "flatModifier")]
    modifier: Option<i32>,
    #[serde(default)]
    damage_type: Option<String>,
    #[serde(default)]
    category: DamageCategory,
    #[serde(default, alias = "criticalOnly")]
    critical: Option<bool>,
    #[serde(default)]
    applies_on_critical_only: Option<bool>,
    #[serde(default)]
    enabled: Option<bool>,
    #[serde(default)]
    ignored: Option<bool>,
}

fn label_of(label: Option<String>, slug: Option<String>) -> String {
    label.or(slug).unwrap_or_default()
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

/// Decode a rich damage object into a structure. The result still needs
/// [`super::normalize_structure`].
pub(crate) fn decode(value: &Value) -> MechResult<RichDamageStructure> {
    let raw = RawRich::deserialize(value)?;

    let base: Vec<DamageComponent> = raw
        .base
        .into_iter()
        .map(|b| DamageComponent {
            dice_count: b.dice_number.unwrap_or(0),
            die_size: b.die_size,
            flat_modifier: b.modifier.unwrap_or(0),
            damage_type: DamageType::from(b.damage_type),
            category: b.category,
            applies_on_critical_only: b.applies_on_critical_only.unwrap_or(false),
        })
        .collect();
    let primary = base
        .first()
        .map(|c| c.damage_type.clone())
        .unwrap_or_default();

    let modifiers = raw
        .modifiers
        .into_iter()
        .map(|m| ModifierEntry {
            label: label_of(m.label, m.slug),
            value: m.modifier,
            category: DamageCategory::from(m.damage_category.or(m.category)),
            damage_type: non_blank(m.damage_type).map(|t| DamageType::new(&t)),
            enabled: m.enabled.unwrap_or(true),
            ignored: m.ignored.unwrap_or(false),
            critical_only: m.critical.unwrap_or(false),
        })
        .collect();

    let extra_dice = raw
        .dice
        .into_iter()
        .map(|d| {
            let critical_only =
                d.critical.unwrap_or(false) || d.applies_on_critical_only.unwrap_or(false);
            let damage_type = non_blank(d.damage_type)
                .map(|t| DamageType::new(&t))
                .unwrap_or_else(|| primary.clone());
            ExtraDiceEntry {
                label: label_of(d.label, d.slug),
                component: DamageComponent {
                    dice_count: d.dice_number.unwrap_or(0),
                    die_size: d.die_size,
                    flat_modifier: d.modifier.unwrap_or(0),
                    damage_type,
                    category: d.category,
                    applies_on_critical_only: critical_only,
                },
                critical_only,
                enabled: d.enabled.unwrap_or(true),
                ignored: d.ignored.unwrap_or(false),
            }
        })
        .collect();

    Ok(RichDamageStructure {
        base,
        modifiers,
        extra_dice,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_host_field_names() {
        let value = json!({
            "base": [{"diceNumber": 2, "dieSize": "d6", "modifier": 0, "damageType": "slashing"}],
            "modifiers": [
                {"slug": "str", "label": "Strength", "modifier": 4, "damageType": null,
                 "damageCategory": null, "enabled": true, "ignored": false},
                {"slug": "rage", "modifier": 2, "enabled": false}
            ],
            "dice": [
                {"slug": "deadly-d10", "diceNumber": 1, "dieSize": "d10", "critical": true},
                {"slug": "sneak", "diceNumber": 1, "dieSize": 6, "category": "precision"}
            ]
        });
        let s = decode(&value).unwrap();
        assert_eq!(s.base[0].dice_count, 2);
        assert_eq!(s.base[0].die_size, Some(Die::D6));
        assert_eq!(s.modifiers[0].label, "Strength");
        assert_eq!(s.modifiers[0].damage_type, None);
        assert!(!s.modifiers[1].enabled);
        assert!(s.extra_dice[0].critical_only);
        assert!(s.extra_dice[0].component.applies_on_critical_only);
        assert_eq!(s.extra_dice[0].component.damage_type.as_str(), "slashing");
        assert_eq!(s.extra_dice[1].component.category, DamageCategory::Precision);
        assert_eq!(s.extra_dice[1].component.die_size, Some(Die::D6));
    }

    #[test]
    fn decode_rejects_malformed_entries() {
        let value = json!({"base": [{"diceNumber": -1, "dieSize": "d6"}]});
        assert!(decode(&value).is_err());
    }

    #[test]
    fn decode_serialized_structure() {
        let structure = RichDamageStructure {
            base: vec![DamageComponent::dice(1, Die::D8, "piercing".into()).with_modifier(2)],
            modifiers: vec![ModifierEntry::new("bless", 1).with_type("good".into())],
            extra_dice: vec![ExtraDiceEntry::critical(
                "deadly-d8",
                DamageComponent::dice(1, Die::D8, "piercing".into()),
            )],
        };
        let value = serde_json::to_value(&structure).unwrap();
        assert_eq!(decode(&value).unwrap(), structure);
    }
}
