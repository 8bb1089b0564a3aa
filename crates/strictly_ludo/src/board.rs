//! Board geometry constants.
//!
//! Only the facts legality, capture and safety depend on live here: the
//! shared ring, where each color enters it, and which ring cells are safe.
//! Pixel placement of cells is a presentation concern.

use super::types::Color;
use tracing::instrument;

/// Number of cells on the shared ring.
pub const RING_CELLS: u8 = 52;

/// Number of seats at the table, active or not.
pub const SEAT_COUNT: usize = 4;

/// Number of tokens each seat owns.
pub const TOKENS_PER_SEAT: usize = 4;

/// `steps_moved` of a token waiting in its yard.
pub const YARD: i8 = -1;

/// Last `steps_moved` value on the shared ring.
pub const LAST_RING_STEP: i8 = 50;

/// `steps_moved` of a token that has arrived home.
pub const HOME: i8 = 57;

/// The only roll that releases a token from the yard.
pub const EXIT_ROLL: u8 = 6;

/// Ring offset where each color's tokens enter, in seat order.
pub const ENTRY_OFFSETS: [u8; SEAT_COUNT] = [0, 13, 26, 39];

/// Ring cells on which no capture can occur.
///
/// Each color's entry cell plus the four star cells eight steps past it.
pub const SAFE_CELLS: [u8; 8] = [0, 8, 13, 21, 26, 34, 39, 47];

/// Returns true if the ring cell is one of the safe cells.
#[instrument(level = "trace")]
pub fn is_safe_cell(cell: u8) -> bool {
    SAFE_CELLS.contains(&cell)
}

/// Returns true while `steps_moved` is on the shared ring.
#[instrument(level = "trace")]
pub fn is_ring_step(steps_moved: i8) -> bool {
    (0..=LAST_RING_STEP).contains(&steps_moved)
}

/// Maps a token's progress to its global ring cell.
///
/// Returns `None` unless the token is on the shared ring: yard, home
/// stretch and home tokens have no ring cell.
#[instrument(level = "trace")]
pub fn global_cell(color: Color, steps_moved: i8) -> Option<u8> {
    if !is_ring_step(steps_moved) {
        return None;
    }
    let relative = steps_moved as u8 % RING_CELLS;
    Some((color.entry_offset() + relative) % RING_CELLS)
}

/// Returns true if a token of `color` at `steps_moved` is immune to capture.
///
/// Yard tokens are reported safe; so is every token past the ring.
#[instrument(level = "trace")]
pub fn is_safe_position(color: Color, steps_moved: i8) -> bool {
    match global_cell(color, steps_moved) {
        Some(cell) => is_safe_cell(cell),
        None => true,
    }
}
