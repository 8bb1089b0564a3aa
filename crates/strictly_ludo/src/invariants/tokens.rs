//! Token invariants.

use super::super::board::{HOME, YARD};
use super::super::game::Match;
use super::Invariant;

/// Invariant: every token's progress stays within `[-1, 57]`.
pub struct StepsInRange;

impl Invariant<Match> for StepsInRange {
    fn holds(game: &Match) -> bool {
        game.tokens()
            .iter()
            .all(|token| (YARD..=HOME).contains(&token.steps_moved()))
    }

    fn description() -> &'static str {
        "Every token's steps_moved is within [-1, 57]"
    }
}

/// Invariant: tokens of inactive seats never leave the yard.
pub struct InactiveSeatsStayHome;

impl Invariant<Match> for InactiveSeatsStayHome {
    fn holds(game: &Match) -> bool {
        game.seats()
            .iter()
            .filter(|seat| !seat.is_active())
            .all(|seat| {
                game.tokens_of(*seat.index())
                    .iter()
                    .all(|token| token.is_in_yard())
            })
    }

    fn description() -> &'static str {
        "Inactive seats keep all tokens in the yard"
    }
}
