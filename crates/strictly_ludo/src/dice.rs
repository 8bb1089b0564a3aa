//! Six-sided dice.

use derive_more::{Display, Error};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, instrument};

/// Face of a single die, always within `1..=6`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct DieRoll(u8);

impl DieRoll {
    /// Lowest face.
    pub const MIN: u8 = 1;
    /// Highest face.
    pub const MAX: u8 = 6;

    /// Creates a roll, or `None` outside `1..=6`.
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(DieRoll(value))
    }

    /// Returns the face value.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Returns true for a six.
    pub fn is_six(self) -> bool {
        self.0 == Self::MAX
    }
}

/// A face value outside `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Die face {} is outside 1..=6", value)]
pub struct InvalidDieRoll {
    /// The rejected value.
    pub value: u8,
}

impl TryFrom<u8> for DieRoll {
    type Error = InvalidDieRoll;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        DieRoll::new(value).ok_or(InvalidDieRoll { value })
    }
}

impl From<DieRoll> for u8 {
    fn from(roll: DieRoll) -> Self {
        roll.0
    }
}

/// Source of die rolls.
pub trait Dice: std::fmt::Debug + Send {
    /// Rolls once.
    fn roll(&mut self) -> DieRoll;
}

/// Fair die backed by a seedable RNG.
#[derive(Debug, Clone)]
pub struct RandomDice {
    rng: StdRng,
}

impl RandomDice {
    /// Creates a die seeded from the operating system.
    #[instrument]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a die that replays the same sequence for the same seed.
    #[instrument]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomDice {
    fn default() -> Self {
        Self::new()
    }
}

impl Dice for RandomDice {
    fn roll(&mut self) -> DieRoll {
        DieRoll(self.rng.gen_range(DieRoll::MIN..=DieRoll::MAX))
    }
}

/// Die that returns a fixed script of faces, then falls back to a fair die.
///
/// Used for puzzles, replays and tests.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    faces: VecDeque<DieRoll>,
    fallback: RandomDice,
}

impl ScriptedDice {
    /// Creates a die from already validated faces.
    pub fn new(faces: impl IntoIterator<Item = DieRoll>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
            fallback: RandomDice::new(),
        }
    }

    /// Creates a die from raw face values.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDieRoll`] for the first value outside `1..=6`.
    pub fn from_values(values: impl IntoIterator<Item = u8>) -> Result<Self, InvalidDieRoll> {
        let faces = values
            .into_iter()
            .map(DieRoll::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(faces))
    }

    /// Number of scripted faces not yet rolled.
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self) -> DieRoll {
        match self.faces.pop_front() {
            Some(roll) => roll,
            None => {
                debug!("Script exhausted, rolling fair die");
                self.fallback.roll()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_die_roll_bounds() {
        assert!(DieRoll::new(0).is_none());
        assert!(DieRoll::new(7).is_none());
        assert_eq!(DieRoll::new(6).map(DieRoll::is_six), Some(true));
        assert!(DieRoll::try_from(9).is_err());
    }

    #[test]
    fn test_random_dice_stays_in_range() {
        let mut dice = RandomDice::seeded(7);
        let mut seen = [false; 6];
        for _ in 0..600 {
            let face = dice.roll().value();
            assert!((1..=6).contains(&face));
            seen[face as usize - 1] = true;
        }
        assert!(seen.iter().all(|s| *s), "every face should appear");
    }

    #[test]
    fn test_seeded_dice_repeat() {
        let mut a = RandomDice::seeded(42);
        let mut b = RandomDice::seeded(42);
        let left: Vec<_> = (0..20).map(|_| a.roll()).collect();
        let right: Vec<_> = (0..20).map(|_| b.roll()).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_scripted_dice_replays_then_falls_back() {
        let mut dice = ScriptedDice::from_values([6, 1, 4]).unwrap();
        assert_eq!(dice.roll().value(), 6);
        assert_eq!(dice.roll().value(), 1);
        assert_eq!(dice.remaining(), 1);
        assert_eq!(dice.roll().value(), 4);
        let face = dice.roll().value();
        assert!((1..=6).contains(&face));
    }

    #[test]
    fn test_die_roll_schema_is_the_wire_integer() {
        let schema = serde_json::to_value(schemars::schema_for!(DieRoll)).unwrap();
        assert_eq!(schema["type"], "integer");
    }

    #[test]
    fn test_scripted_dice_rejects_bad_face() {
        let err = ScriptedDice::from_values([3, 0]).unwrap_err();
        assert_eq!(err.value, 0);
    }
}
