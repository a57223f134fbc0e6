//! Decoder for the flat `{ dice, die, damageType }` weapon shape.

use ac_core::item::trait_tokens;
use serde_json::Value;

use super::CRITICAL_DICE_TRAITS;
use super::sources::{BONUS_SOURCES, as_bonus, bonus_total};
use crate::damage::{DamageComponent, DamageType, ExtraDiceEntry, ModifierEntry, RichDamageStructure};
use crate::dice::Die;
use crate::error::{MechError, MechResult};

/// Highest striking rune grade.
const MAX_STRIKING: u32 = 3;

/// Decode a flat damage object. Striking dice are folded into the base dice
/// count; every bonus source is summed into one synthetic modifier.
pub(crate) fn decode(damage: &Value, system: &Value) -> MechResult<RichDamageStructure> {
    let die = read_die(&damage["die"]);
    let listed = read_count(&damage["dice"]).unwrap_or(u32::from(die.is_some()));
    let striking = striking_dice(system);
    let dice_count = if die.is_some() { listed.saturating_add(striking) } else { 0 };

    let damage_type = ["damageType", "type"]
        .iter()
        .find_map(|key| damage[*key].as_str())
        .map(DamageType::new)
        .unwrap_or_default();

    let modifier = bonus_total(system, BONUS_SOURCES);
    if dice_count == 0 && modifier == 0 {
        return Err(MechError::NoDamageFound);
    }
    if striking > 0 {
        tracing::debug!(striking, dice_count, "striking dice folded into base dice");
    }

    let mut base = DamageComponent::flat(0, damage_type.clone());
    if let Some(die) = die.filter(|_| dice_count > 0) {
        base = DamageComponent::dice(dice_count, die, damage_type.clone());
    }

    Ok(RichDamageStructure {
        base: vec![base],
        modifiers: vec![ModifierEntry::new("modifier", modifier)],
        extra_dice: critical_trait_dice(&trait_tokens(system), &damage_type),
    })
}

/// One critical-only extra-dice entry per `deadly-<dice>` style trait token.
///
/// The suffix is a die (`d8`) or a count and a die (`2d10`). Tokens with an
/// unreadable suffix are skipped.
pub fn critical_trait_dice(traits: &[String], damage_type: &DamageType) -> Vec<ExtraDiceEntry> {
    traits
        .iter()
        .filter_map(|token| {
            let (name, suffix) = token.split_once('-')?;
            if !CRITICAL_DICE_TRAITS.contains(&name) {
                return None;
            }
            let (count, die) = match suffix.split_once('d') {
                Some(("", sides)) => (1, Die::from_str_tag(sides)?),
                Some((count, sides)) => (count.parse().ok()?, Die::from_str_tag(sides)?),
                None => (1, Die::from_str_tag(suffix)?),
            };
            let component = DamageComponent::dice(count, die, damage_type.clone());
            Some(ExtraDiceEntry::critical(token.clone(), component))
        })
        .collect()
}

/// Extra base dice granted by a striking rune.
fn striking_dice(system: &Value) -> u32 {
    let from_runes = read_count(&system["runes"]["striking"]);
    let from_value = system["strikingRune"]["value"].as_str().map(|grade| {
        match grade.trim().to_ascii_lowercase().as_str() {
            "striking" => 1,
            "greaterstriking" => 2,
            "majorstriking" => 3,
            _ => 0,
        }
    });
    from_runes.or(from_value).unwrap_or(0).min(MAX_STRIKING)
}

fn read_die(value: &Value) -> Option<Die> {
    match value {
        Value::String(tag) => Die::from_str_tag(tag),
        Value::Number(n) => n.as_u64().and_then(|n| Die::from_sides(u32::try_from(n).ok()?)),
        _ => None,
    }
}

fn read_count(value: &Value) -> Option<u32> {
    as_bonus(value).and_then(|n| u32::try_from(n.max(0)).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn basic_weapon() {
        let system = json!({"damage": {"dice": 1, "die": "d8", "damageType": "slashing"}});
        let s = decode(&system["damage"], &system).unwrap();
        assert_eq!(s.base, vec![DamageComponent::dice(1, Die::D8, "slashing".into())]);
        assert_eq!(s.modifiers, vec![ModifierEntry::new("modifier", 0)]);
        assert!(s.extra_dice.is_empty());
    }

    #[test]
    fn striking_runes_fold_into_base_count() {
        let system = json!({
            "damage": {"dice": 1, "die": "d8", "damageType": "slashing"},
            "runes": {"striking": 2}
        });
        let s = decode(&system["damage"], &system).unwrap();
        assert_eq!(s.base.len(), 1);
        assert_eq!(s.base[0].dice_count, 3);

        let legacy = json!({
            "damage": {"dice": 1, "die": "d6"},
            "strikingRune": {"value": "majorStriking"}
        });
        let s = decode(&legacy["damage"], &legacy).unwrap();
        assert_eq!(s.base[0].dice_count, 4);
    }

    #[test]
    fn striking_is_capped() {
        let system = json!({"damage": {"dice": 1, "die": "d4"}, "runes": {"striking": 9}});
        let s = decode(&system["damage"], &system).unwrap();
        assert_eq!(s.base[0].dice_count, 4);
    }

    #[test]
    fn huge_dice_count_saturates_with_striking() {
        let system = json!({"damage": {"dice": 4294967295u64, "die": "d4"}, "runes": {"striking": 1}});
        let s = decode(&system["damage"], &system).unwrap();
        assert_eq!(s.base[0].dice_count, u32::MAX);
    }

    #[test]
    fn bonus_sources_feed_the_modifier() {
        let system = json!({
            "damage": {"dice": 1, "die": "d6", "damageType": "piercing", "modifier": 1},
            "bonusDamage": {"value": 2},
            "properties": [{"bonus": 1}]
        });
        let s = decode(&system["damage"], &system).unwrap();
        assert_eq!(s.modifiers[0].value, 4);
    }

    #[test]
    fn deadly_trait_adds_critical_dice() {
        let system = json!({
            "damage": {"dice": 1, "die": "d6", "damageType": "piercing"},
            "traits": {"value": ["agile", "deadly-d10", "finesse"]}
        });
        let s = decode(&system["damage"], &system).unwrap();
        assert_eq!(s.extra_dice.len(), 1);
        let deadly = &s.extra_dice[0];
        assert!(deadly.critical_only);
        assert_eq!(deadly.label, "deadly-d10");
        assert_eq!(deadly.component.dice_count, 1);
        assert_eq!(deadly.component.die_size, Some(Die::D10));
        assert_eq!(deadly.component.damage_type.as_str(), "piercing");
    }

    #[test]
    fn trait_dice_parsing() {
        let traits: Vec<String> = ["deadly-2d10", "deadly-x", "fatal-d12", "deadly", "reach-10"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let dice = critical_trait_dice(&traits, &DamageType::untyped());
        assert_eq!(dice.len(), 1);
        assert_eq!(dice[0].component.dice_count, 2);
        assert_eq!(dice[0].component.die_size, Some(Die::D10));
    }

    #[test]
    fn numeric_strings_and_bare_sides() {
        let system = json!({"dice": "2", "die": 6, "damageType": "bludgeoning"});
        let s = decode(&system, &system).unwrap();
        assert_eq!(s.base[0].dice_count, 2);
        assert_eq!(s.base[0].die_size, Some(Die::D6));
    }

    #[test]
    fn no_dice_and_no_modifier_is_no_damage() {
        let system = json!({"damage": {"dice": 0, "die": "d6"}});
        assert!(matches!(
            decode(&system["damage"], &system),
            Err(MechError::NoDamageFound)
        ));
    }

    #[test]
    fn modifier_without_dice_is_kept() {
        let system = json!({"damage": {"dice": 0, "die": null}, "bonus": 3});
        let s = decode(&system["damage"], &system).unwrap();
        assert!(s.base[0].is_empty());
        assert_eq!(s.modifiers[0].value, 3);
    }
}
