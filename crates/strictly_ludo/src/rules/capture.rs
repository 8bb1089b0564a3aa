//! Capture resolution.

use super::super::board;
use super::super::types::{Seat, Token};
use tracing::{debug, instrument};

/// Opposing tokens the mover captures where it now stands.
///
/// Nothing is captured unless the mover is on the shared ring and its cell
/// is not a safe cell. Victims are every token of another active seat on
/// the same ring cell; several can fall at once. Returned tokens still hold
/// their pre-capture progress.
#[instrument(
    level = "trace",
    skip(seats, tokens),
    fields(seat = %mover.seat(), token = %mover.id())
)]
pub fn victims(mover: &Token, seats: &[Seat], tokens: &[Token]) -> Vec<Token> {
    let Some(cell) = mover.global_cell() else {
        return Vec::new();
    };
    if board::is_safe_cell(cell) {
        debug!(cell, "Landed on safe cell");
        return Vec::new();
    }

    tokens
        .iter()
        .filter(|other| other.seat() != mover.seat())
        .filter(|other| {
            seats
                .get(other.seat().index())
                .is_some_and(|seat| seat.is_active())
        })
        .filter(|other| other.global_cell() == Some(cell))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SeatIndex, SeatKind, TokenId};

    fn seats(kinds: [SeatKind; 4]) -> Vec<Seat> {
        SeatIndex::ALL
            .into_iter()
            .zip(kinds)
            .map(|(index, kind)| Seat::new(index, kind, String::new()))
            .collect()
    }

    fn token(seat: usize, id: usize, steps: i8) -> Token {
        let mut token = Token::in_yard(SeatIndex::new(seat).unwrap(), TokenId::new(id).unwrap());
        token.place(steps);
        token
    }

    #[test]
    fn test_captures_opponent_on_same_cell() {
        let seats = seats([SeatKind::Human; 4]);
        // Red 30 -> cell 30. Yellow 4 -> cell 30.
        let mover = token(0, 0, 30);
        let tokens = vec![mover, token(2, 1, 4), token(2, 2, 5)];
        let captured = victims(&mover, &seats, &tokens);
        assert_eq!(captured, vec![token(2, 1, 4)]);
    }

    #[test]
    fn test_captures_several_at_once() {
        let seats = seats([SeatKind::Human; 4]);
        // Red 30 -> cell 30; Green 17 -> cell 30; Yellow 4 -> cell 30.
        let mover = token(0, 0, 30);
        let tokens = vec![mover, token(1, 0, 17), token(2, 3, 4)];
        assert_eq!(victims(&mover, &seats, &tokens).len(), 2);
    }

    #[test]
    fn test_never_captures_own_tokens() {
        let seats = seats([SeatKind::Human; 4]);
        let mover = token(0, 0, 30);
        let tokens = vec![mover, token(0, 1, 30)];
        assert!(victims(&mover, &seats, &tokens).is_empty());
    }

    #[test]
    fn test_safe_cell_blocks_capture() {
        let seats = seats([SeatKind::Human; 4]);
        // Red 21 -> cell 21 (star). Green 8 -> cell 21.
        let mover = token(0, 0, 21);
        let tokens = vec![mover, token(1, 0, 8)];
        assert!(victims(&mover, &seats, &tokens).is_empty());
    }

    #[test]
    fn test_home_stretch_never_captures() {
        let seats = seats([SeatKind::Human; 4]);
        let mover = token(0, 0, 53);
        let tokens = vec![mover, token(1, 0, 40)];
        assert!(victims(&mover, &seats, &tokens).is_empty());
    }

    #[test]
    fn test_home_stretch_token_is_not_a_victim() {
        let seats = seats([SeatKind::Human; 4]);
        // Green at 51 is off the ring even though 13 + 51 wraps to cell 12.
        let mover = token(0, 0, 12);
        let tokens = vec![mover, token(1, 0, 51)];
        assert!(victims(&mover, &seats, &tokens).is_empty());
    }
}
