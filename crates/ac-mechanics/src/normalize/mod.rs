//! Damage-structure normalization.
//!
//! Item damage arrives in one of three shapes. [`classify`] picks the shape
//! from the raw data, a per-shape decoder builds a [`RichDamageStructure`],
//! and [`normalize_structure`] brings it to canonical form: inactive entries
//! removed, every component valid, empty base components dropped.
//!
//! ```text
//! rich   { base: [..], modifiers: [..], dice: [..] }
//! flat   { damage: { dice, die, damageType }, runes, traits, .. }
//! keyed  { damage: { "0": { formula: "2d6+3", type: "fire" }, .. } }
//! ```

pub(crate) mod flat;
mod keyed;
pub mod sources;
mod rich;

pub use flat::critical_trait_dice;
pub use sources::{BONUS_SOURCES, BonusRule, Segment, bonus_total};

use ac_core::Item;
use serde_json::{Map, Value};

use crate::damage::{DamageComponent, RichDamageStructure};
use crate::error::{MechError, MechResult};

/// Trait names whose `<name>-<dice>` tokens add critical-only dice.
pub const CRITICAL_DICE_TRAITS: &[&str] = &["deadly"];

/// The shape a raw damage description arrived in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageShape<'a> {
    /// Already a base/modifiers/dice structure.
    Rich(&'a Value),
    /// A single dice/die pair. `system` is the surrounding item data that
    /// runes, bonus fields, and traits are read from.
    Flat {
        /// The object holding `dice` and `die`.
        damage: &'a Value,
        /// The item's system data.
        system: &'a Value,
    },
    /// A map of independent damage instances carrying expression strings.
    Keyed(&'a Map<String, Value>),
}

impl DamageShape<'_> {
    /// Short name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rich(_) => "rich",
            Self::Flat { .. } => "flat",
            Self::Keyed(_) => "keyed",
        }
    }
}

/// Work out which shape `value` carries, if any.
///
/// `value` may be an item's system data or a bare damage object. Shapes are
/// tried rich, then flat, then keyed.
pub fn classify(value: &Value) -> Option<DamageShape<'_>> {
    let damage = &value["damage"];

    if value["base"].is_array() {
        return Some(DamageShape::Rich(value));
    }
    if damage["base"].is_array() {
        return Some(DamageShape::Rich(damage));
    }
    if has_dice_fields(damage) {
        return Some(DamageShape::Flat {
            damage,
            system: value,
        });
    }
    if has_dice_fields(value) {
        return Some(DamageShape::Flat {
            damage: value,
            system: value,
        });
    }
    [damage, &value["damageRolls"], value]
        .into_iter()
        .find_map(as_keyed_map)
        .map(DamageShape::Keyed)
}

fn has_dice_fields(value: &Value) -> bool {
    value.get("die").is_some_and(|d| !d.is_null()) || value.get("dice").is_some_and(Value::is_number)
}

fn as_keyed_map(value: &Value) -> Option<&Map<String, Value>> {
    value
        .as_object()
        .filter(|map| !map.is_empty() && map.values().all(keyed::is_entry))
}

/// Normalize a raw damage description.
pub fn normalize(value: &Value) -> MechResult<RichDamageStructure> {
    let shape = classify(value).ok_or(MechError::NoDamageFound)?;
    tracing::debug!(shape = shape.name(), "classified damage description");

    let structure = match shape {
        DamageShape::Rich(rich) => rich::decode(rich)?,
        DamageShape::Flat { damage, system } => flat::decode(damage, system)?,
        DamageShape::Keyed(map) => keyed::decode(map),
    };

    let structure = normalize_structure(structure);
    if structure.is_empty() {
        return Err(MechError::NoDamageFound);
    }
    Ok(structure)
}

/// Normalize the damage description stored on an item.
pub fn normalize_item(item: &Item) -> MechResult<RichDamageStructure> {
    normalize(&item.system)
}

/// Bring a structure to canonical form.
///
/// Applying this to its own output returns the output unchanged.
pub fn normalize_structure(structure: RichDamageStructure) -> RichDamageStructure {
    let base = structure
        .base
        .into_iter()
        .map(sanitize)
        .filter(|c| !c.is_empty())
        .collect();

    let modifiers = structure
        .modifiers
        .into_iter()
        .filter(|m| m.is_active())
        .collect();

    let extra_dice = structure
        .extra_dice
        .into_iter()
        .filter(|e| e.is_active())
        .map(|mut entry| {
            entry.component = sanitize(entry.component);
            let critical_only = entry.critical_only || entry.component.applies_on_critical_only;
            entry.critical_only = critical_only;
            entry.component.applies_on_critical_only = critical_only;
            entry
        })
        .filter(|e| !e.component.is_empty())
        .collect();

    RichDamageStructure {
        base,
        modifiers,
        extra_dice,
    }
}

/// Repair the dice-count/die-size pairing so the component is valid.
fn sanitize(mut component: DamageComponent) -> DamageComponent {
    match (component.dice_count, component.die_size) {
        (0, Some(_)) => component.die_size = None,
        (n, None) if n > 0 => {
            tracing::warn!(dice_count = n, "dice without a die size, keeping flat value only");
            component.dice_count = 0;
        }
        _ => {}
    }
    component
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::damage::{DamageCategory, DamageType, ExtraDiceEntry, ModifierEntry};
    use crate::dice::Die;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn classify_picks_each_shape() {
        let rich = json!({"damage": {"base": [], "modifiers": []}});
        assert_eq!(classify(&rich).map(|s| s.name()), Some("rich"));

        let flat = json!({"damage": {"dice": 1, "die": "d8", "damageType": "slashing"}});
        assert_eq!(classify(&flat).map(|s| s.name()), Some("flat"));

        let bare = json!({"dice": 2, "die": "d6"});
        assert_eq!(classify(&bare).map(|s| s.name()), Some("flat"));

        let keyed = json!({"damage": {"0": {"formula": "2d6", "type": "fire"}}});
        assert_eq!(classify(&keyed).map(|s| s.name()), Some("keyed"));

        let rolls = json!({"damageRolls": {"abc": {"damage": "1d4", "damageType": "acid"}}});
        assert_eq!(classify(&rolls).map(|s| s.name()), Some("keyed"));

        assert_eq!(classify(&json!({"name": "rock"})), None);
        assert_eq!(classify(&json!({"damage": {}})), None);
    }

    #[test]
    fn unrecognized_data_is_no_damage_found() {
        let err = normalize(&json!({"description": "a pretty rock"})).unwrap_err();
        assert!(matches!(err, MechError::NoDamageFound));
    }

    #[test]
    fn rich_shape_filters_inactive_entries() {
        let value = json!({
            "base": [{"diceNumber": 1, "dieSize": "d8", "damageType": "piercing"}],
            "modifiers": [
                {"label": "strength", "modifier": 3},
                {"label": "off", "modifier": 9, "enabled": false},
                {"label": "ignored", "modifier": 9, "ignored": true}
            ],
            "dice": [{"label": "off", "diceNumber": 1, "dieSize": "d6", "enabled": false}]
        });
        let s = normalize(&value).unwrap();
        assert_eq!(s.modifiers.len(), 1);
        assert_eq!(s.modifiers[0].value, 3);
        assert!(s.extra_dice.is_empty());
    }

    #[test]
    fn empty_rich_shape_is_no_damage_found() {
        let value = json!({"base": [{"diceNumber": 0, "dieSize": "d8"}]});
        assert!(matches!(normalize(&value), Err(MechError::NoDamageFound)));
    }

    #[test]
    fn sanitize_repairs_invalid_components() {
        let mut zero_dice = DamageComponent::dice(0, Die::D6, "fire".into()).with_modifier(2);
        zero_dice = sanitize(zero_dice);
        assert!(zero_dice.is_valid());
        assert_eq!(zero_dice.die_size, None);
        assert_eq!(zero_dice.flat_modifier, 2);

        let mut no_die = DamageComponent::flat(1, "fire".into());
        no_die.dice_count = 3;
        let no_die = sanitize(no_die);
        assert!(no_die.is_valid());
        assert_eq!(no_die.dice_count, 0);
    }

    #[test]
    fn critical_flags_are_synchronized() {
        let mut entry = ExtraDiceEntry::new("deadly", DamageComponent::dice(1, Die::D8, "piercing".into()));
        entry.critical_only = true;
        let s = normalize_structure(RichDamageStructure {
            base: vec![DamageComponent::dice(1, Die::D6, "piercing".into())],
            extra_dice: vec![entry],
            ..Default::default()
        });
        assert!(s.extra_dice[0].component.applies_on_critical_only);
    }

    #[test]
    fn normalize_item_reads_system_data() {
        let item = Item::from_json(
            r#"{"_id": "abc", "name": "Dagger", "type": "weapon",
                "system": {"damage": {"dice": 1, "die": "d4", "damageType": "piercing"}}}"#,
        )
        .unwrap();
        let s = normalize_item(&item).unwrap();
        assert_eq!(s.base[0].die_size, Some(Die::D4));
    }

    fn any_component() -> impl Strategy<Value = DamageComponent> {
        (
            0u32..5,
            prop::option::of(prop_oneof![Just(Die::D4), Just(Die::D6), Just(Die::D12)]),
            -5i32..10,
            prop_oneof![Just("fire"), Just("piercing"), Just("")],
            prop_oneof![
                Just(DamageCategory::None),
                Just(DamageCategory::Persistent),
                Just(DamageCategory::Precision)
            ],
            any::<bool>(),
        )
            .prop_map(|(dice_count, die_size, flat_modifier, ty, category, crit)| {
                DamageComponent {
                    dice_count,
                    die_size,
                    flat_modifier,
                    damage_type: DamageType::new(ty),
                    category,
                    applies_on_critical_only: crit,
                }
            })
    }

    fn any_structure() -> impl Strategy<Value = RichDamageStructure> {
        (
            prop::collection::vec(any_component(), 0..4),
            prop::collection::vec((-5i32..6, any::<bool>(), any::<bool>()), 0..4),
            prop::collection::vec((any_component(), any::<bool>(), any::<bool>()), 0..3),
        )
            .prop_map(|(base, modifiers, extra)| RichDamageStructure {
                base,
                modifiers: modifiers
                    .into_iter()
                    .map(|(value, enabled, ignored)| {
                        let mut m = ModifierEntry::new("m", value);
                        m.enabled = enabled;
                        m.ignored = ignored;
                        m
                    })
                    .collect(),
                extra_dice: extra
                    .into_iter()
                    .map(|(component, critical_only, enabled)| {
                        let mut e = ExtraDiceEntry::new("x", component);
                        e.critical_only = critical_only;
                        e.enabled = enabled;
                        e
                    })
                    .collect(),
            })
    }

    proptest! {
        #[test]
        fn normalization_is_a_fixed_point(structure in any_structure()) {
            let once = normalize_structure(structure);
            let twice = normalize_structure(once.clone());
            prop_assert_eq!(&once, &twice);
            prop_assert!(once.base.iter().all(DamageComponent::is_valid));
            prop_assert!(once.extra_dice.iter().all(|e| e.component.is_valid()));
        }

        #[test]
        fn serialized_structure_normalizes_to_itself(structure in any_structure()) {
            let once = normalize_structure(structure);
            prop_assume!(!once.is_empty());
            let value = serde_json::to_value(&once).unwrap();
            prop_assert_eq!(normalize(&value).unwrap(), once);
        }
    }
}
