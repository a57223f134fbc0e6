//! Individual die rolls collected while a formula is rolled.

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::Die;

/// One die and the face it landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieRoll {
    /// The die that was rolled.
    pub die: Die,
    /// Face shown, between 1 and the die's side count.
    pub value: u32,
}

impl DieRoll {
    /// Whether the die landed on its highest face.
    pub fn is_max(&self) -> bool {
        self.value == self.die.sides()
    }
}

/// Every die rolled for one formula, in the order the terms were rolled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolledDice {
    /// The rolls, left to right.
    pub rolls: Vec<DieRoll>,
}

impl RolledDice {
    /// Roll `count` dice of one size, append them, and return their sum.
    pub fn roll_group(&mut self, rng: &mut StdRng, count: u32, die: Die) -> u32 {
        let start = self.rolls.len();
        self.rolls.extend((0..count).map(|_| DieRoll {
            die,
            value: rng.random_range(1..=die.sides()),
        }));
        self.rolls[start..].iter().map(|r| r.value).sum()
    }

    /// Sum of the faces.
    pub fn sum(&self) -> u32 {
        self.rolls.iter().map(|r| r.value).sum()
    }

    /// How many dice landed on their highest face.
    pub fn maxed(&self) -> usize {
        self.rolls.iter().filter(|r| r.is_max()).count()
    }

    /// Whether nothing was rolled (a purely flat formula).
    pub fn is_empty(&self) -> bool {
        self.rolls.is_empty()
    }
}

impl std::fmt::Display for RolledDice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let faces: Vec<String> = self
            .rolls
            .iter()
            .map(|r| format!("{}:{}", r.die, r.value))
            .collect();
        write!(f, "{}", faces.join(" "))
    }
}
