//! Contract-based validation for Ludo actions.
//!
//! Every request is checked against its preconditions before anything is
//! mutated, so a rejected request leaves the match exactly as it was.
//! Postconditions compare a snapshot taken before the request with the
//! match after it.

use super::action::{Action, ActionKind, LudoError};
use super::board::YARD;
use super::dice::DieRoll;
use super::game::Match;
use super::invariants::{InvariantSet, InvariantViolation, MatchInvariants};
use super::phases::Phase;
use super::snapshot::MatchSnapshot;
use super::types::{SeatIndex, TokenId};
use tracing::{instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// Preconditions and postconditions of a state transition.
///
/// - Precondition: {P(state, action)} must hold before applying the action
/// - Postcondition: {Q(before, after)} must hold after applying it
pub trait Contract<S, A> {
    /// What is kept of the state before the action for [`Contract::post`].
    type Before;

    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), LudoError>;

    /// Checks postconditions after applying the action.
    fn post(before: &Self::Before, after: &S) -> Result<(), Vec<InvariantViolation>>;
}

// ─────────────────────────────────────────────────────────────
//  Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the acting seat is the current seat.
pub struct SeatsTurn;

impl SeatsTurn {
    /// Rejects actions from any seat but the current one.
    #[instrument(skip(game))]
    pub fn check(action: &Action, game: &Match) -> Result<(), LudoError> {
        if action.seat() != game.current_turn() {
            warn!(current = %game.current_turn(), "Seat acted out of turn");
            return Err(illegal_action(action, game));
        }
        Ok(())
    }
}

/// Precondition: the phase accepts this kind of action.
pub struct PhaseAccepts;

impl PhaseAccepts {
    /// Rolls need `AwaitingRoll`, moves need `AwaitingMove`.
    #[instrument(skip(game))]
    pub fn check(action: &Action, game: &Match) -> Result<(), LudoError> {
        let accepted = matches!(
            (action.kind(), game.phase()),
            (ActionKind::Roll, Phase::AwaitingRoll) | (ActionKind::Move, Phase::AwaitingMove)
        );
        if !accepted {
            warn!(phase = %game.phase(), "Phase does not accept action");
            return Err(illegal_action(action, game));
        }
        Ok(())
    }
}

/// Precondition: the named token is in the legal set for the pending roll.
pub struct TokenIsLegal;

impl TokenIsLegal {
    /// Checks a move against the roll the seat is playing.
    #[instrument(skip(game))]
    pub fn check(
        seat: SeatIndex,
        token: TokenId,
        roll: DieRoll,
        game: &Match,
    ) -> Result<(), LudoError> {
        if !game.legal_moves(seat, roll.value()).contains(&token) {
            warn!("Token is not a legal move");
            return Err(LudoError::IllegalMove { seat, token, roll });
        }
        Ok(())
    }
}

fn illegal_action(action: &Action, game: &Match) -> LudoError {
    LudoError::IllegalAction {
        seat: action.seat(),
        action: action.kind(),
        phase: game.phase(),
        current: game.current_turn(),
    }
}

// ─────────────────────────────────────────────────────────────
//  Action Contract
// ─────────────────────────────────────────────────────────────

/// Contract for roll and move requests.
///
/// Preconditions:
/// - Acting seat is the current seat
/// - Phase accepts the action
/// - For moves: the token is legal for the pending roll
///
/// Postconditions:
/// - The epoch is unchanged
/// - At most one token moved, forward, and it belongs to the acting seat
/// - Any other token that changed went back to its yard
/// - All match invariants still hold
pub struct ActionContract;

impl Contract<Match, Action> for ActionContract {
    type Before = MatchSnapshot;

    fn pre(game: &Match, action: &Action) -> Result<(), LudoError> {
        SeatsTurn::check(action, game)?;
        PhaseAccepts::check(action, game)?;
        if let Action::Move { seat, token } = *action {
            // AwaitingMove always carries a roll; checked by PendingMoveHasRoll.
            let Some(roll) = game.current_roll() else {
                return Err(illegal_action(action, game));
            };
            TokenIsLegal::check(seat, token, roll, game)?;
        }
        Ok(())
    }

    #[instrument(skip_all)]
    fn post(before: &MatchSnapshot, after: &Match) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = MatchInvariants::check_all(after).err().unwrap_or_default();
        if *before.epoch() != after.epoch() {
            violations.push(InvariantViolation::new("A request never replaces the match"));
        }

        let mover = *before.current_turn();
        let mut advanced = 0;
        for seat in before.seats() {
            for view in seat.tokens() {
                let was = *view.steps_moved();
                let now = after.token(*seat.index(), *view.id()).steps_moved();
                if now == was {
                    continue;
                }
                if *seat.index() == mover && now > was {
                    advanced += 1;
                } else if now != YARD {
                    violations.push(InvariantViolation::new(
                        "Only the actor's token advances; others only return to the yard",
                    ));
                }
            }
        }
        if advanced > 1 {
            violations.push(InvariantViolation::new("At most one token moves per request"));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Asserts a request's postconditions (panics on violation in debug builds).
#[instrument(skip_all)]
pub fn assert_transition(before: &MatchSnapshot, after: &Match) {
    if let Err(violations) = ActionContract::post(before, after) {
        let descriptions = violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        debug_assert!(false, "Postcondition failed: {}", descriptions);
        warn!(%descriptions, "Postcondition failed");
    }
}

/// Asserts that all match invariants hold (panics on violation in debug builds).
#[instrument(skip(game))]
pub fn assert_invariants(game: &Match) {
    if let Err(violations) = MatchInvariants::check_all(game) {
        let descriptions = violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        debug_assert!(false, "Match invariants violated: {}", descriptions);
        warn!(%descriptions, "Match invariants violated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameMode, MatchBuilder, ScriptedDice};

    fn seat(i: usize) -> SeatIndex {
        SeatIndex::new(i).unwrap()
    }

    #[test]
    fn test_roll_precondition_holds_for_current_seat() {
        let mut game = Match::new();
        game.start(GameMode::FourPlayerHuman);
        let action = Action::Roll { seat: seat(0) };
        assert!(ActionContract::pre(&game, &action).is_ok());
    }

    #[test]
    fn test_wrong_seat_rejected() {
        let mut game = Match::new();
        game.start(GameMode::FourPlayerHuman);
        let action = Action::Roll { seat: seat(1) };
        assert!(matches!(
            ActionContract::pre(&game, &action),
            Err(LudoError::IllegalAction { seat: s, .. }) if s == seat(1)
        ));
    }

    #[test]
    fn test_move_while_awaiting_roll_rejected() {
        let mut game = Match::new();
        game.start(GameMode::FourPlayerHuman);
        let action = Action::Move {
            seat: seat(0),
            token: TokenId::new(0).unwrap(),
        };
        assert!(matches!(
            ActionContract::pre(&game, &action),
            Err(LudoError::IllegalAction {
                action: ActionKind::Move,
                phase: Phase::AwaitingRoll,
                ..
            })
        ));
    }

    #[test]
    fn test_idle_match_rejects_everything() {
        let game = Match::new();
        let action = Action::Roll { seat: seat(0) };
        assert!(ActionContract::pre(&game, &action).is_err());
    }

    #[test]
    fn test_postcondition_holds_after_capture() {
        let mut game = MatchBuilder::new(GameMode::TwoPlayerHuman)
            .place(seat(0), TokenId::new(0).unwrap(), 27)
            .place(seat(2), TokenId::new(0).unwrap(), 4)
            .dice(ScriptedDice::from_values([3]).unwrap())
            .build()
            .unwrap();
        game.request_roll(seat(0)).unwrap();
        let before = game.snapshot();
        let outcome = game.request_move(seat(0), TokenId::new(0).unwrap()).unwrap();
        assert_eq!(outcome.captures.len(), 1);
        assert!(ActionContract::post(&before, &game).is_ok());
    }

    #[test]
    fn test_postcondition_detects_foreign_token_moving() {
        let mut game = Match::new();
        game.start(GameMode::TwoPlayerHuman);
        let before = game.snapshot();
        // Yellow's token jumps forward while Red is to act.
        game.corrupt_for_test(seat(2), 12);

        let violations = ActionContract::post(&before, &game).unwrap_err();
        assert!(violations[0].description.starts_with("Only the actor's token"));
    }

    #[test]
    fn test_postcondition_detects_replaced_match() {
        let mut game = Match::new();
        game.start(GameMode::FourPlayerHuman);
        let before = game.snapshot();
        game.start(GameMode::FourPlayerHuman);
        assert!(ActionContract::post(&before, &game).is_err());
    }

    #[test]
    fn test_illegal_token_rejected() {
        let mut game = MatchBuilder::new(GameMode::TwoPlayerHuman)
            .place(seat(0), TokenId::new(0).unwrap(), 10)
            .dice(ScriptedDice::from_values([3]).unwrap())
            .build()
            .unwrap();
        game.request_roll(seat(0)).unwrap();
        // Token 1 is still in the yard and a 3 cannot release it.
        let action = Action::Move {
            seat: seat(0),
            token: TokenId::new(1).unwrap(),
        };
        assert!(matches!(
            ActionContract::pre(&game, &action),
            Err(LudoError::IllegalMove { .. })
        ));
    }
}
