//! Die sizes, damage expression decomposition, and the formula grammar.
//!
//! Host data names a die size either as a tag (`"d8"`) or as a bare side
//! count (`8`); both map onto the same [`Die`]. Synthesized formulas are read
//! back by [`Formula`] for bounds and rolling.

pub mod expr;
pub mod formula;
pub mod lexer;
pub mod roll;

pub use expr::{Decomposed, decompose};
pub use formula::Formula;
pub use roll::{DieRoll, RolledDice};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Size of a damage die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "DieRepr", into = "String")]
pub enum Die {
    /// d4
    D4,
    /// d6
    D6,
    /// d8
    D8,
    /// d10
    D10,
    /// d12
    D12,
    /// d20
    D20,
    /// d100
    D100,
    /// Any other size with at least two faces.
    Custom(u32),
}

const STANDARD: [Die; 7] = [Die::D4, Die::D6, Die::D8, Die::D10, Die::D12, Die::D20, Die::D100];

impl Die {
    /// Highest face of the die, which is also the value a maximized die adds.
    pub fn sides(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
            Self::D100 => 100,
            Self::Custom(n) => n,
        }
    }

    /// The die with `sides` faces. Fewer than two faces is not a die.
    pub fn from_sides(sides: u32) -> Option<Self> {
        if sides < 2 {
            return None;
        }
        let standard = STANDARD.into_iter().find(|d| d.sides() == sides);
        Some(standard.unwrap_or(Self::Custom(sides)))
    }

    /// Read a host die tag: `"d8"`, `"D8"` or `"8"`.
    pub fn from_str_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        let digits = tag.strip_prefix(['d', 'D']).unwrap_or(tag);
        digits.parse().ok().and_then(Self::from_sides)
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

impl From<Die> for String {
    fn from(die: Die) -> Self {
        die.to_string()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DieRepr {
    Tag(String),
    Sides(u32),
}

impl TryFrom<DieRepr> for Die {
    type Error = String;

    fn try_from(repr: DieRepr) -> Result<Self, Self::Error> {
        let die = match &repr {
            DieRepr::Tag(tag) => Die::from_str_tag(tag),
            DieRepr::Sides(n) => Die::from_sides(*n),
        };
        die.ok_or_else(|| match repr {
            DieRepr::Tag(tag) => format!("invalid die size: {tag}"),
            DieRepr::Sides(n) => format!("invalid die size: {n}"),
        })
    }
}
