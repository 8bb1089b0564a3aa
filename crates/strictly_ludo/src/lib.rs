//! Strictly Ludo - a four-seat Ludo rules engine
//!
//! The engine owns all game state and validates every request against the
//! seat to act and the current phase. It never sleeps, prints or reads
//! input; front ends drive it through [`Match::request_roll`] and
//! [`Match::request_move`] and observe it through [`MatchSnapshot`].
//!
//! # Architecture
//!
//! - **Board**: ring geometry, entry offsets and safe cells
//! - **Rules**: pure legality, capture, extra-turn and win functions
//! - **Match**: the aggregate, the only mutable state
//! - **Contracts / Invariants**: preconditions and post-transition checks
//! - **Policy**: move selection for computer seats
//!
//! # Example
//!
//! ```
//! use strictly_ludo::{GameMode, Match, Phase, ScriptedDice, SeatIndex};
//!
//! let mut game = Match::with_dice(ScriptedDice::from_values([6, 3]).unwrap());
//! game.start(GameMode::TwoPlayerHuman);
//!
//! let red = SeatIndex::new(0).unwrap();
//! let rolled = game.request_roll(red).unwrap();
//! assert_eq!(game.phase(), Phase::AwaitingMove);
//!
//! let moved = game.request_move(red, rolled.legal[0]).unwrap();
//! assert!(moved.extra_turn);
//! assert_eq!(game.current_turn(), red);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod action;
mod dice;
mod game;
mod outcome;
mod phases;
mod policy;
mod snapshot;
mod types;

// Public modules
pub mod board;
pub mod contracts;
pub mod invariants;
pub mod rules;

// Crate-level exports - Match aggregate
pub use game::{Match, MatchBuilder, SeatNames};

// Crate-level exports - Domain types
pub use types::{
    Color, GameMode, IndexOutOfRange, Seat, SeatIndex, SeatKind, Token, TokenId, TokenZone,
};

// Crate-level exports - Actions, phases and errors
pub use action::{Action, ActionKind, LudoError, SetupError};
pub use phases::Phase;

// Crate-level exports - Dice
pub use dice::{Dice, DieRoll, InvalidDieRoll, RandomDice, ScriptedDice};

// Crate-level exports - Results and views
pub use outcome::{Capture, MoveOutcome, RollOutcome};
pub use snapshot::{MatchSnapshot, SeatView, TokenView};

// Crate-level exports - Computer seats
pub use policy::{HeuristicPolicy, MovePolicy, PolicyKind, RandomPolicy};
