//! Turn order and extra turns.

use super::super::board::SEAT_COUNT;
use super::super::dice::DieRoll;
use super::super::types::{SeatIndex, SeatKind};
use tracing::instrument;

/// Next seat clockwise from `current` that takes turns.
///
/// Returns `current` itself when no other seat is active; a startable match
/// always has at least two.
#[instrument(level = "trace", skip(kinds))]
pub fn next_active_seat(current: SeatIndex, kinds: &[SeatKind; SEAT_COUNT]) -> SeatIndex {
    let mut next = current.next();
    for _ in 0..SEAT_COUNT {
        if kinds[next.index()].is_active() {
            return next;
        }
        next = next.next();
    }
    current
}

/// Whether the mover keeps the turn: a six, a capture, or a token arriving home.
#[instrument(level = "trace")]
pub fn grants_extra_turn(roll: DieRoll, captured: bool, reached_home: bool) -> bool {
    roll.is_six() || captured || reached_home
}
