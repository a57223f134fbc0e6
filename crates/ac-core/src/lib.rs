//! Core types for altcrit: items, actors, and attack outcomes.
//!
//! This crate models the read-only view of the host's data that the damage
//! engine consumes. Item system data is kept as loosely-typed JSON because
//! the host attaches damage information in several shapes; classifying
//! those shapes is the job of `ac-mechanics`.

/// Actors and their ability modifiers.
pub mod actor;
/// Error types used throughout the crate.
pub mod error;
/// Items, item identities, and item kinds.
pub mod item;
/// Degree of success reported by the host for an attack.
pub mod outcome;

/// Re-export actor types.
pub use actor::{Ability, Actor};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export item types.
pub use item::{Item, ItemId, ItemKind};
/// Re-export outcome types.
pub use outcome::DegreeOfSuccess;
