//! Damage engine for alternative critical hits.
//!
//! An alternative critical rolls the damage dice once and adds their maximum
//! value as a flat bonus, instead of doubling the dice. This crate turns the
//! host's loosely-typed damage data into that formula:
//!
//! 1. [`normalize`] classifies and decodes item damage into a
//!    [`RichDamageStructure`];
//! 2. [`estimate`] builds a lossy structure from static item data when no
//!    captured roll is available;
//! 3. [`assemble`] synthesizes one expression per damage part;
//! 4. [`CaptureCache`] remembers recently observed structures.

pub mod assemble;
pub mod capture;
pub mod damage;
pub mod dice;
pub mod error;
pub mod estimate;
pub mod normalize;
pub mod synth;

pub use assemble::{AlternativeCriticalFormula, FormulaPart, PartKind, assemble};
pub use capture::{CaptureCache, CaptureEntry, DEFAULT_TTL_MS};
pub use damage::{
    DamageCategory, DamageComponent, DamageType, ExtraDiceEntry, ModifierEntry,
    RichDamageStructure,
};
pub use dice::{Die, DieRoll, Formula, RolledDice};
pub use error::{MechError, MechResult};
pub use estimate::{estimate, strength_bonus};
pub use normalize::{DamageShape, classify, normalize, normalize_item, normalize_structure};
pub use synth::{DoublingScope, SynthOptions, synthesize};
