//! Ludo rules as pure functions.
//!
//! Nothing here mutates a match; the executor in [`crate::Match`] applies
//! what these functions decide.

pub mod capture;
pub mod legal;
pub mod turn;
pub mod win;

pub use capture::victims;
pub use legal::{is_legal, legal_moves};
pub use turn::{grants_extra_turn, next_active_seat};
pub use win::is_finished;
