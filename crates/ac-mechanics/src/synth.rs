//! Formula synthesis: one damage component to one damage expression.
//!
//! On a critical hit the dice are rolled once and their maximum value is
//! added as a flat bonus. The rendered shape is fixed:
//!
//! - dice: `(2d6+12+1)[piercing]` on a critical, `(2d6+1)[piercing]` otherwise
//! - flat: `6[untyped]`
//! - categorized: `((1d6+0)[persistent])[fire]`, `((3)[persistent])[fire]`
//!
//! Output is byte-identical for identical inputs.

use serde::{Deserialize, Serialize};

use crate::damage::DamageComponent;

/// Which flat values the "double static modifiers" setting doubles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DoublingScope {
    /// Only dice-less components (standalone modifier parts) are doubled.
    #[default]
    FlatParts,
    /// Flat values attached to dice are doubled as well.
    AllStatic,
}

/// Inputs to synthesis beyond the component itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SynthOptions {
    /// Whether the attack was a critical hit.
    pub critical: bool,
    /// Whether static modifiers are doubled on a critical hit.
    pub double_static: bool,
    /// Which static modifiers doubling reaches.
    pub scope: DoublingScope,
}

impl SynthOptions {
    /// Options for a critical hit.
    pub fn critical() -> Self {
        Self {
            critical: true,
            ..Self::default()
        }
    }

    /// Options for a normal hit.
    pub fn normal() -> Self {
        Self::default()
    }

    /// Enable or disable static-modifier doubling.
    pub fn with_double_static(mut self, double_static: bool) -> Self {
        self.double_static = double_static;
        self
    }

    /// Set the doubling scope.
    pub fn with_scope(mut self, scope: DoublingScope) -> Self {
        self.scope = scope;
        self
    }
}

/// Render one component as a damage expression.
pub fn synthesize(component: &DamageComponent, options: &SynthOptions) -> String {
    let scales = options.critical && component.category.scales_on_critical();
    let doubles = scales && options.double_static;

    let body = match component.rolled_die() {
        Some(die) => {
            let count = component.dice_count;
            let mut modifier = i64::from(component.flat_modifier);
            if doubles && options.scope == DoublingScope::AllStatic {
                modifier *= 2;
            }
            if scales && !component.applies_on_critical_only {
                let bonus = component.max_dice_value();
                format!("({count}{die}+{bonus}{})", signed(modifier))
            } else {
                format!("({count}{die}{})", signed(modifier))
            }
        }
        None => {
            let mut value = i64::from(component.flat_modifier);
            if doubles {
                value *= 2;
            }
            value.to_string()
        }
    };

    let typed = component.damage_type.as_str();
    match component.category.tag() {
        Some(category) => {
            let grouped = if body.starts_with('(') {
                body
            } else {
                format!("({body})")
            };
            format!("({grouped}[{category}])[{typed}]")
        }
        None => format!("{body}[{typed}]"),
    }
}

fn signed(value: i64) -> String {
    if value < 0 {
        format!("-{}", value.unsigned_abs())
    } else {
        format!("+{value}")
    }
}
