//! Messages sent from the orchestrator to renderers.

use serde::Serialize;
use strictly_ludo::{MatchSnapshot, MoveOutcome, Phase, RollOutcome, SeatIndex, TokenId};

/// Something the console should show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A match began, fresh or after a restart.
    Started {
        /// State right after the start.
        snapshot: MatchSnapshot,
    },
    /// A seat rolled.
    Rolled {
        /// Display name of the roller.
        name: String,
        /// What the roll did.
        outcome: RollOutcome,
        /// State after the roll.
        snapshot: MatchSnapshot,
    },
    /// A seat moved a token.
    Moved {
        /// Display name of the mover.
        name: String,
        /// What the move did.
        outcome: MoveOutcome,
        /// State after the move.
        snapshot: MatchSnapshot,
    },
    /// The match waits for a person at the console.
    Prompt {
        /// Seat expected to act.
        seat: SeatIndex,
        /// Its display name.
        name: String,
        /// Whether a roll or a move is expected.
        phase: Phase,
        /// Tokens that may move, when a move is expected.
        legal: Vec<TokenId>,
    },
    /// A request was refused; the match is unchanged.
    Rejected {
        /// Human-readable reason.
        reason: String,
    },
    /// A seat brought all its tokens home.
    Won {
        /// Winning seat.
        winner: SeatIndex,
        /// Its display name.
        name: String,
    },
    /// The session ended without a winner.
    Abandoned,
}
