//! What a successful roll or move did.

use super::dice::DieRoll;
use super::types::{SeatIndex, TokenId};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Result of a roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RollOutcome {
    /// Seat that rolled.
    pub seat: SeatIndex,
    /// Face rolled.
    pub roll: DieRoll,
    /// Tokens the seat may now move.
    pub legal: Vec<TokenId>,
    /// Seat the turn passed to when nothing could move.
    pub passed_to: Option<SeatIndex>,
}

/// A token sent back to its yard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Capture {
    /// Seat that lost the token.
    pub seat: SeatIndex,
    /// Captured token.
    pub token: TokenId,
    /// Its progress before the capture.
    pub steps_before: i8,
}

/// Result of a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MoveOutcome {
    /// Seat that moved.
    pub seat: SeatIndex,
    /// Token moved.
    pub token: TokenId,
    /// Roll played.
    pub roll: DieRoll,
    /// Progress before the move.
    pub from: i8,
    /// Progress after the move.
    pub to: i8,
    /// Global ring cell landed on, if still on the ring.
    pub cell: Option<u8>,
    /// Opposing tokens sent home.
    pub captures: Vec<Capture>,
    /// True if the mover keeps the turn.
    pub extra_turn: bool,
    /// Set when this move won the match.
    pub winner: Option<SeatIndex>,
    /// Seat to act next (the mover again on an extra turn).
    pub next_turn: SeatIndex,
}

impl MoveOutcome {
    /// Returns true if the moved token arrived home.
    pub fn reached_home(&self) -> bool {
        self.to == super::board::HOME
    }
}
