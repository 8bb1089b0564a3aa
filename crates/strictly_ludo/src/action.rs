//! First-class actions and the errors they can be rejected with.
//!
//! Actions are the only way anything outside the engine changes a match.
//! They can be validated before they are applied, logged and replayed.

use super::dice::DieRoll;
use super::phases::Phase;
use super::types::{SeatIndex, TokenId};
use derive_more::{Display, Error};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A seat's intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Roll the die.
    #[display("seat {seat} rolls")]
    Roll {
        /// Acting seat.
        seat: SeatIndex,
    },
    /// Move one token by the current roll.
    #[display("seat {seat} moves token {token}")]
    Move {
        /// Acting seat.
        seat: SeatIndex,
        /// Token to move.
        token: TokenId,
    },
}

impl Action {
    /// Returns the acting seat.
    pub fn seat(&self) -> SeatIndex {
        match self {
            Action::Roll { seat } | Action::Move { seat, .. } => *seat,
        }
    }

    /// Returns which kind of action this is.
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Roll { .. } => ActionKind::Roll,
            Action::Move { .. } => ActionKind::Move,
        }
    }
}

/// Kind of action, without its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Rolling the die.
    #[display("roll")]
    Roll,
    /// Moving a token.
    #[display("move")]
    Move,
}

/// Why a roll or move request was rejected. The match is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum LudoError {
    /// Wrong seat, or a phase that does not accept this action.
    #[display("Seat {seat} cannot {action} while the match is {phase} (seat {current} to act)")]
    IllegalAction {
        /// Seat that attempted the action.
        seat: SeatIndex,
        /// What it attempted.
        action: ActionKind,
        /// Phase at the time.
        phase: Phase,
        /// Seat whose turn it is.
        current: SeatIndex,
    },
    /// A token outside the current legal set.
    #[display("Token {token} of seat {seat} cannot move {roll} steps")]
    IllegalMove {
        /// Seat that attempted the move.
        seat: SeatIndex,
        /// Token named.
        token: TokenId,
        /// The roll being played.
        roll: DieRoll,
    },
}

/// Why an arranged position could not be turned into a match.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SetupError {
    /// Fewer than two seats would take turns.
    #[display("A match needs at least two active seats, found {}", _0)]
    TooFewActiveSeats(#[error(not(source))] usize),
    /// A placement outside `[-1, 57]`.
    #[display("Token {token} of seat {seat} cannot be placed at step {steps}")]
    StepsOutOfRange {
        /// Seat owning the token.
        seat: SeatIndex,
        /// Token placed.
        token: TokenId,
        /// Requested progress.
        steps: i8,
    },
    /// A token of an inactive seat placed outside its yard.
    #[display("Seat {} is inactive; its tokens stay in the yard", _0)]
    InactiveSeatToken(#[error(not(source))] SeatIndex),
    /// The first seat to act does not take turns.
    #[display("Seat {} is inactive and cannot start", _0)]
    InactiveStartingSeat(#[error(not(source))] SeatIndex),
    /// A seat already has all tokens home.
    #[display("Seat {} has already finished", _0)]
    AlreadyFinished(#[error(not(source))] SeatIndex),
}
