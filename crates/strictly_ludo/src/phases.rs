//! Match phases.
//!
//! `Idle` → `AwaitingRoll` ⇄ `AwaitingMove` → `Won`. The winner travels
//! inside `Won`, so a finished match always names its winner.

use super::types::SeatIndex;
use derive_more::Display;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Phase of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Phase {
    /// No match started yet.
    #[display("idle")]
    Idle,
    /// The current seat must roll.
    #[display("awaiting a roll")]
    AwaitingRoll,
    /// The current seat rolled and must pick one of its legal tokens.
    #[display("awaiting a move")]
    AwaitingMove,
    /// Terminal: the named seat brought all four tokens home.
    #[display("won by seat {winner}")]
    Won {
        /// Seat that finished first.
        winner: SeatIndex,
    },
}

impl Phase {
    /// Returns the winner once the match is over.
    pub fn winner(self) -> Option<SeatIndex> {
        match self {
            Phase::Won { winner } => Some(winner),
            _ => None,
        }
    }

    /// Returns true for `Won`.
    pub fn is_over(self) -> bool {
        matches!(self, Phase::Won { .. })
    }

    /// Returns true while seats are taking turns.
    pub fn is_in_progress(self) -> bool {
        matches!(self, Phase::AwaitingRoll | Phase::AwaitingMove)
    }
}
