//! Turn invariants.

use super::super::game::Match;
use super::super::phases::Phase;
use super::Invariant;

/// Invariant: once started, the seat to act is an active seat.
pub struct ActiveTurn;

impl Invariant<Match> for ActiveTurn {
    fn holds(game: &Match) -> bool {
        if game.phase() == Phase::Idle {
            return true;
        }
        game.seat(game.current_turn()).is_active()
    }

    fn description() -> &'static str {
        "The current seat is never inactive"
    }
}

/// Invariant: a started match has at least two active seats.
pub struct EnoughActiveSeats;

impl Invariant<Match> for EnoughActiveSeats {
    fn holds(game: &Match) -> bool {
        if game.phase() == Phase::Idle {
            return true;
        }
        game.seats().iter().filter(|seat| seat.is_active()).count() >= 2
    }

    fn description() -> &'static str {
        "At least two seats take turns"
    }
}
