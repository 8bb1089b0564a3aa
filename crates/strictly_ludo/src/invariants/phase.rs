//! Phase invariants.

use super::super::game::Match;
use super::super::phases::Phase;
use super::Invariant;

/// Invariant: `Won` exactly when the named winner has every token home.
///
/// While in progress no seat may be finished, since the finishing move ends
/// the match.
pub struct WinnerFinished;

impl Invariant<Match> for WinnerFinished {
    fn holds(game: &Match) -> bool {
        match game.phase() {
            Phase::Won { winner } => game.is_finished(winner),
            Phase::Idle => true,
            Phase::AwaitingRoll | Phase::AwaitingMove => game
                .seats()
                .iter()
                .all(|seat| !game.is_finished(*seat.index())),
        }
    }

    fn description() -> &'static str {
        "A match is won exactly when its winner has all tokens home"
    }
}

/// Invariant: `AwaitingMove` holds a roll with at least one legal token.
pub struct PendingMoveHasRoll;

impl Invariant<Match> for PendingMoveHasRoll {
    fn holds(game: &Match) -> bool {
        if game.phase() != Phase::AwaitingMove {
            return true;
        }
        match game.current_roll() {
            Some(roll) => !game
                .legal_moves(game.current_turn(), roll.value())
                .is_empty(),
            None => false,
        }
    }

    fn description() -> &'static str {
        "Awaiting a move implies a current roll with a legal token"
    }
}
