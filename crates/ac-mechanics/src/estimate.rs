//! Direct calculation: a best-effort damage structure from static item data.
//!
//! Used when no captured roll is available. Only the weapon's own dice, its
//! bonus fields, the owner's strength, and critical-dice traits are known
//! here. Class features and situational bonuses are not, so an estimate is
//! always lossy.

use ac_core::{Ability, Actor, Item};

use crate::damage::{ModifierEntry, RichDamageStructure};
use crate::error::{MechError, MechResult};
use crate::normalize::{DamageShape, classify, flat, normalize_structure};

/// Build a damage structure from the item's flat damage fields plus the
/// actor's strength.
///
/// Fails with [`MechError::NoBaseDice`] when the item carries no base dice
/// in the flat shape.
pub fn estimate(item: &Item, actor: Option<&Actor>) -> MechResult<RichDamageStructure> {
    let Some(DamageShape::Flat { damage, system }) = classify(&item.system) else {
        return Err(MechError::NoBaseDice);
    };
    let mut structure = flat::decode(damage, system).map_err(|_| MechError::NoBaseDice)?;
    if !structure.has_base_dice() {
        return Err(MechError::NoBaseDice);
    }

    let strength = actor.map_or(0, |a| strength_bonus(item, a));
    if strength > 0 {
        structure
            .modifiers
            .push(ModifierEntry::new("strength", strength));
    }
    tracing::debug!(item = %item.id, strength, "estimated damage from item data");

    Ok(normalize_structure(structure))
}

/// The strength modifier a weapon adds to its damage.
///
/// Full strength for melee and thrown weapons, half (rounded down) for
/// propulsive ones, none for other ranged weapons or unarmed attacks. A
/// negative modifier is never applied.
pub fn strength_bonus(item: &Item, actor: &Actor) -> i32 {
    let strength = actor.modifier(Ability::Strength);
    if strength <= 0 || !item.kind.is_weapon() || item.is_unarmed() {
        return 0;
    }
    let thrown = item
        .traits()
        .iter()
        .any(|t| t == "thrown" || t.starts_with("thrown-"));
    if thrown || !item.is_ranged() {
        strength
    } else if item.has_trait("propulsive") {
        strength / 2
    } else {
        0
    }
}
