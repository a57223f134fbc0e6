//! Formula assembly: a whole damage structure to a set of damage expressions.

use serde::Serialize;

use crate::damage::{DamageCategory, DamageComponent, DamageType, RichDamageStructure};
use crate::synth::{SynthOptions, synthesize};

/// Where a formula part came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PartKind {
    /// A base damage component, with any dice-attached modifiers folded in.
    Base,
    /// Standalone modifiers summed per damage type and category.
    Modifier,
    /// An extra-dice entry.
    ExtraDice,
}

impl std::fmt::Display for PartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Base => write!(f, "base"),
            Self::Modifier => write!(f, "modifier"),
            Self::ExtraDice => write!(f, "extra dice"),
        }
    }
}

/// One independently rollable expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormulaPart {
    /// The damage expression.
    pub expression: String,
    /// Damage type of the expression.
    pub damage_type: DamageType,
    /// Damage category of the expression.
    pub category: DamageCategory,
    /// Source of the part.
    pub kind: PartKind,
}

/// The ordered expressions that together make up an alternative critical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlternativeCriticalFormula {
    /// Parts in synthesis order.
    pub parts: Vec<FormulaPart>,
}

impl AlternativeCriticalFormula {
    /// Returns true if nothing was synthesized.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// The part expressions in order.
    pub fn expressions(&self) -> Vec<&str> {
        self.parts.iter().map(|p| p.expression.as_str()).collect()
    }

    /// All parts grouped into one `{a,b,...}` expression set.
    pub fn combined(&self) -> String {
        format!("{{{}}}", self.expressions().join(","))
    }

    fn push(&mut self, component: &DamageComponent, kind: PartKind, options: &SynthOptions) {
        self.parts.push(FormulaPart {
            expression: synthesize(component, options),
            damage_type: component.damage_type.clone(),
            category: component.category.clone(),
            kind,
        });
    }
}

/// Build the formula set for a normalized structure.
///
/// Active uncategorized modifiers whose type is absent or matches an
/// uncategorized base component are folded into that component's flat term.
/// Every other active modifier is summed per `(type, category)` and emitted
/// as its own dice-less part. Extra dice follow as separate parts;
/// critical-only entries and critical-only modifiers are dropped on a
/// normal hit.
pub fn assemble(structure: &RichDamageStructure, options: &SynthOptions) -> AlternativeCriticalFormula {
    let applies = |critical_only: bool| !critical_only || options.critical;
    let primary = structure.primary_damage_type();

    let mut base: Vec<DamageComponent> = structure
        .base
        .iter()
        .filter(|c| applies(c.applies_on_critical_only))
        .cloned()
        .collect();
    let mut standalone: Vec<(DamageType, DamageCategory, i32)> = Vec::new();

    for modifier in structure
        .modifiers
        .iter()
        .filter(|m| m.is_active() && applies(m.critical_only))
    {
        if modifier.category.is_none() {
            let target = base.iter_mut().find(|c| {
                c.category.is_none()
                    && modifier
                        .damage_type
                        .as_ref()
                        .is_none_or(|t| *t == c.damage_type)
            });
            if let Some(component) = target {
                component.flat_modifier = component.flat_modifier.saturating_add(modifier.value);
                continue;
            }
        }

        let damage_type = modifier.damage_type.clone().unwrap_or_else(|| primary.clone());
        match standalone
            .iter_mut()
            .find(|(t, c, _)| *t == damage_type && *c == modifier.category)
        {
            Some((_, _, total)) => *total = total.saturating_add(modifier.value),
            None => standalone.push((damage_type, modifier.category.clone(), modifier.value)),
        }
    }

    let mut formula = AlternativeCriticalFormula::default();
    for component in &base {
        formula.push(component, PartKind::Base, options);
    }
    for (damage_type, category, total) in standalone {
        if total == 0 {
            continue;
        }
        let component = DamageComponent::flat(total, damage_type).with_category(category);
        formula.push(&component, PartKind::Modifier, options);
    }
    for entry in structure
        .extra_dice
        .iter()
        .filter(|e| e.is_active() && applies(e.critical_only))
    {
        formula.push(&entry.component, PartKind::ExtraDice, options);
    }
    formula
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::damage::{ExtraDiceEntry, ModifierEntry};
    use crate::dice::Die;

    fn longsword() -> RichDamageStructure {
        RichDamageStructure {
            base: vec![DamageComponent::dice(2, Die::D6, "piercing".into())],
            modifiers: vec![
                ModifierEntry::new("strength", 1),
                ModifierEntry::new("precision", 3).with_type(DamageType::untyped()),
            ],
            extra_dice: Vec::new(),
        }
    }

    #[test]
    fn oversized_modifiers_saturate() {
        let structure = RichDamageStructure {
            base: vec![DamageComponent::dice(1, Die::D6, "piercing".into())],
            modifiers: vec![
                ModifierEntry::new("rune", i32::MAX),
                ModifierEntry::new("str", 1),
                ModifierEntry::new("burn", i32::MAX)
                    .with_type("fire".into())
                    .with_category(DamageCategory::Persistent),
                ModifierEntry::new("burn", 5)
                    .with_type("fire".into())
                    .with_category(DamageCategory::Persistent),
            ],
            extra_dice: Vec::new(),
        };
        let formula = assemble(&structure, &SynthOptions::critical());
        assert_eq!(
            formula.expressions(),
            vec![
                "(1d6+6+2147483647)[piercing]",
                "((2147483647)[persistent])[fire]",
            ]
        );
    }

    #[test]
    fn strength_folds_and_precision_doubles() {
        let options = SynthOptions::critical().with_double_static(true);
        let formula = assemble(&longsword(), &options);
        assert_eq!(formula.expressions(), vec!["(2d6+12+1)[piercing]", "6[untyped]"]);
        assert_eq!(formula.parts[0].kind, PartKind::Base);
        assert_eq!(formula.parts[1].kind, PartKind::Modifier);
        assert_eq!(formula.combined(), "{(2d6+12+1)[piercing],6[untyped]}");
    }

    #[test]
    fn normal_hit_keeps_modifiers_undoubled() {
        let options = SynthOptions::normal().with_double_static(true);
        let formula = assemble(&longsword(), &options);
        assert_eq!(formula.expressions(), vec!["(2d6+1)[piercing]", "3[untyped]"]);
    }

    #[test]
    fn deadly_dice_only_on_critical_and_never_maximized() {
        let mut structure = RichDamageStructure {
            base: vec![DamageComponent::dice(1, Die::D6, "slashing".into())],
            ..Default::default()
        };
        structure.extra_dice.push(ExtraDiceEntry::critical(
            "deadly-d8",
            DamageComponent::dice(1, Die::D8, "slashing".into()),
        ));

        let crit = assemble(&structure, &SynthOptions::critical());
        assert_eq!(crit.expressions(), vec!["(1d6+6+0)[slashing]", "(1d8+0)[slashing]"]);
        assert_eq!(crit.parts[1].kind, PartKind::ExtraDice);

        let normal = assemble(&structure, &SynthOptions::normal());
        assert_eq!(normal.expressions(), vec!["(1d6+0)[slashing]"]);
    }

    #[test]
    fn inactive_entries_are_excluded() {
        let mut structure = longsword();
        structure.modifiers[0].enabled = false;
        structure.modifiers[1].ignored = true;
        let mut sneak = ExtraDiceEntry::new(
            "sneak attack",
            DamageComponent::dice(1, Die::D6, "piercing".into()),
        );
        sneak.enabled = false;
        structure.extra_dice.push(sneak);

        let formula = assemble(&structure, &SynthOptions::critical());
        assert_eq!(formula.expressions(), vec!["(2d6+12+0)[piercing]"]);
    }

    #[test]
    fn categorized_modifiers_stay_separate_and_group() {
        let structure = RichDamageStructure {
            base: vec![DamageComponent::dice(1, Die::D8, "slashing".into())],
            modifiers: vec![
                ModifierEntry::new("bleed", 2).with_category(DamageCategory::Persistent),
                ModifierEntry::new("more bleed", 1).with_category(DamageCategory::Persistent),
            ],
            extra_dice: Vec::new(),
        };
        let formula = assemble(&structure, &SynthOptions::critical().with_double_static(true));
        assert_eq!(
            formula.expressions(),
            vec!["(1d8+8+0)[slashing]", "((3)[persistent])[slashing]"]
        );
    }

    #[test]
    fn typed_modifier_folds_into_matching_base() {
        let structure = RichDamageStructure {
            base: vec![
                DamageComponent::dice(2, Die::D6, "fire".into()),
                DamageComponent::dice(1, Die::D6, "cold".into()),
            ],
            modifiers: vec![ModifierEntry::new("frost", 2).with_type("cold".into())],
            extra_dice: Vec::new(),
        };
        let formula = assemble(&structure, &SynthOptions::normal());
        assert_eq!(formula.expressions(), vec!["(2d6+0)[fire]", "(1d6+2)[cold]"]);
    }

    #[test]
    fn critical_only_modifier_skipped_on_normal_hit() {
        let mut structure = longsword();
        structure.modifiers[1].critical_only = true;
        let normal = assemble(&structure, &SynthOptions::normal());
        assert_eq!(normal.len(), 1);
        let crit = assemble(&structure, &SynthOptions::critical());
        assert_eq!(crit.len(), 2);
    }

    #[test]
    fn modifiers_without_base_become_flat_parts() {
        let structure = RichDamageStructure {
            modifiers: vec![ModifierEntry::new("bonus", 4).with_type("force".into())],
            ..Default::default()
        };
        let formula = assemble(&structure, &SynthOptions::critical().with_double_static(true));
        assert_eq!(formula.expressions(), vec!["8[force]"]);
    }

    #[test]
    fn empty_structure_yields_empty_formula() {
        let formula = assemble(&RichDamageStructure::default(), &SynthOptions::critical());
        assert!(formula.is_empty());
        assert_eq!(formula.combined(), "{}");
    }
}
