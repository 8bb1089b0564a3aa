//! The match aggregate: seats, token arena, turn and phase.
//!
//! A single owned `Match` is the only mutable game state. Tokens live in one
//! arena indexed by `seat * 4 + token`, so capture can reset an opponent's
//! token while the mover's token is being updated without aliasing.

use super::action::{Action, ActionKind, LudoError, SetupError};
use super::board::{HOME, SEAT_COUNT, TOKENS_PER_SEAT, YARD};
use super::contracts::{ActionContract, Contract, assert_invariants, assert_transition};
use super::dice::{Dice, DieRoll, RandomDice};
use super::outcome::{Capture, MoveOutcome, RollOutcome};
use super::phases::Phase;
use super::rules;
use super::snapshot::MatchSnapshot;
use super::types::{GameMode, Seat, SeatIndex, SeatKind, Token, TokenId, default_seat_name};
use tracing::{debug, info, instrument, warn};

const ARENA_SIZE: usize = SEAT_COUNT * TOKENS_PER_SEAT;

fn arena_index(seat: SeatIndex, token: TokenId) -> usize {
    seat.index() * TOKENS_PER_SEAT + token.index()
}

fn fresh_tokens() -> [Token; ARENA_SIZE] {
    std::array::from_fn(|i| {
        let seat = SeatIndex::ALL[i / TOKENS_PER_SEAT];
        let id = TokenId::ALL[i % TOKENS_PER_SEAT];
        Token::in_yard(seat, id)
    })
}

fn seats_for(kinds: [SeatKind; SEAT_COUNT], names: [String; SEAT_COUNT]) -> [Seat; SEAT_COUNT] {
    let mut names = names.into_iter();
    std::array::from_fn(|i| {
        let index = SeatIndex::ALL[i];
        Seat::new(index, kinds[i], names.next().unwrap_or_default())
    })
}

/// Display names to use instead of a mode's defaults, in seat order.
pub type SeatNames = [Option<String>; SEAT_COUNT];

/// A Ludo match.
#[derive(Debug)]
pub struct Match {
    epoch: u64,
    mode: Option<GameMode>,
    seats: [Seat; SEAT_COUNT],
    tokens: [Token; ARENA_SIZE],
    current_turn: SeatIndex,
    current_roll: Option<DieRoll>,
    phase: Phase,
    dice: Box<dyn Dice>,
}

impl Match {
    /// Creates an idle match rolling a fair die.
    #[instrument]
    pub fn new() -> Self {
        Self::with_dice(RandomDice::new())
    }

    /// Creates an idle match rolling the given dice.
    #[instrument(skip(dice))]
    pub fn with_dice(dice: impl Dice + 'static) -> Self {
        Self::idle(Box::new(dice), 0)
    }

    fn idle(dice: Box<dyn Dice>, epoch: u64) -> Self {
        Self {
            epoch,
            mode: None,
            seats: seats_for(
                [SeatKind::Inactive; SEAT_COUNT],
                std::array::from_fn(|_| "-".to_string()),
            ),
            tokens: fresh_tokens(),
            current_turn: SeatIndex::ALL[0],
            current_roll: None,
            phase: Phase::Idle,
            dice,
        }
    }

    /// Starts a new match with the mode's default names.
    ///
    /// See [`Match::start_named`].
    #[instrument(skip(self))]
    pub fn start(&mut self, mode: GameMode) {
        self.start_named(mode, &Default::default());
    }

    /// Starts a new match, discarding every trace of the previous one.
    ///
    /// Allowed in any phase. Seats, tokens, turn, roll and phase are replaced
    /// in a single assignment; only the dice carry over. The epoch advances
    /// so work scheduled against the old match can recognise itself as stale.
    #[instrument(skip(self, names), fields(epoch = self.epoch + 1))]
    pub fn start_named(&mut self, mode: GameMode, names: &SeatNames) {
        let kinds = mode.seat_kinds();
        let names = std::array::from_fn(|i| {
            names[i]
                .clone()
                .unwrap_or_else(|| default_seat_name(SeatIndex::ALL[i], kinds[i], mode))
        });
        let dice = std::mem::replace(&mut self.dice, Box::new(RandomDice::new()));
        *self = Self {
            epoch: self.epoch + 1,
            mode: Some(mode),
            seats: seats_for(kinds, names),
            tokens: fresh_tokens(),
            current_turn: SeatIndex::ALL[0],
            current_roll: None,
            phase: Phase::AwaitingRoll,
            dice,
        };
        info!(%mode, "Match started");
        assert_invariants(self);
    }

    // ─────────────────────────────────────────────────────────
    //  Read access
    // ─────────────────────────────────────────────────────────

    /// Number of matches started on this instance.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Mode of the current match, `None` while idle.
    pub fn mode(&self) -> Option<GameMode> {
        self.mode
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Seat allowed to act.
    pub fn current_turn(&self) -> SeatIndex {
        self.current_turn
    }

    /// Latest roll of the current seat, `None` until it rolls.
    pub fn current_roll(&self) -> Option<DieRoll> {
        self.current_roll
    }

    /// Winner once the match is over.
    pub fn winner(&self) -> Option<SeatIndex> {
        self.phase.winner()
    }

    /// All four seats in turn order.
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// One seat.
    pub fn seat(&self, seat: SeatIndex) -> &Seat {
        &self.seats[seat.index()]
    }

    /// The whole token arena, in seat order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The four tokens of one seat.
    pub fn tokens_of(&self, seat: SeatIndex) -> &[Token] {
        let start = seat.index() * TOKENS_PER_SEAT;
        &self.tokens[start..start + TOKENS_PER_SEAT]
    }

    /// One token.
    pub fn token(&self, seat: SeatIndex, token: TokenId) -> &Token {
        &self.tokens[arena_index(seat, token)]
    }

    /// Returns true if every token of the seat is home.
    pub fn is_finished(&self, seat: SeatIndex) -> bool {
        rules::is_finished(self.tokens_of(seat))
    }

    /// Tokens `seat` could move with `roll`, whatever the phase.
    #[instrument(level = "trace", skip(self))]
    pub fn legal_moves(&self, seat: SeatIndex, roll: u8) -> Vec<TokenId> {
        rules::legal_moves(*self.seat(seat).kind(), self.tokens_of(seat), roll)
    }

    /// Tokens the current seat may move right now; empty unless awaiting a move.
    pub fn pending_moves(&self) -> Vec<TokenId> {
        match (self.phase, self.current_roll) {
            (Phase::AwaitingMove, Some(roll)) => self.legal_moves(self.current_turn, roll.value()),
            _ => Vec::new(),
        }
    }

    /// Read-only view for renderers and move policies.
    #[instrument(level = "trace", skip(self))]
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot::of(self)
    }

    // ─────────────────────────────────────────────────────────
    //  Requests
    // ─────────────────────────────────────────────────────────

    /// Rolls for `seat`.
    ///
    /// With at least one legal token the match waits for a move. Otherwise
    /// the turn passes immediately, even on a six.
    ///
    /// # Errors
    ///
    /// [`LudoError::IllegalAction`] unless `seat` is current and the match is
    /// awaiting a roll.
    #[instrument(skip(self), fields(epoch = self.epoch))]
    pub fn request_roll(&mut self, seat: SeatIndex) -> Result<RollOutcome, LudoError> {
        ActionContract::pre(self, &Action::Roll { seat })?;
        let before = self.snapshot();

        let roll = self.dice.roll();
        self.current_roll = Some(roll);
        let legal = self.legal_moves(seat, roll.value());
        info!(%roll, legal = ?legal, "Rolled");

        let passed_to = if legal.is_empty() {
            self.advance_turn();
            info!(next = %self.current_turn, "No legal moves, turn passes");
            Some(self.current_turn)
        } else {
            self.phase = Phase::AwaitingMove;
            None
        };

        assert_transition(&before, self);
        Ok(RollOutcome {
            seat,
            roll,
            legal,
            passed_to,
        })
    }

    /// Moves `token` of `seat` by the pending roll.
    ///
    /// # Errors
    ///
    /// [`LudoError::IllegalAction`] for the wrong seat or phase,
    /// [`LudoError::IllegalMove`] for a token outside the legal set. The
    /// match is unchanged on error.
    #[instrument(skip(self), fields(epoch = self.epoch))]
    pub fn request_move(
        &mut self,
        seat: SeatIndex,
        token: TokenId,
    ) -> Result<MoveOutcome, LudoError> {
        ActionContract::pre(self, &Action::Move { seat, token })?;
        let Some(roll) = self.current_roll else {
            warn!("Awaiting a move without a roll");
            return Err(LudoError::IllegalAction {
                seat,
                action: ActionKind::Move,
                phase: self.phase,
                current: self.current_turn,
            });
        };

        let before = self.snapshot();
        let outcome = self.apply_move(seat, token, roll);
        assert_transition(&before, self);
        Ok(outcome)
    }

    /// Applies a validated move.
    fn apply_move(&mut self, seat: SeatIndex, token: TokenId, roll: DieRoll) -> MoveOutcome {
        let idx = arena_index(seat, token);
        let from = self.tokens[idx].steps_moved();
        if from == YARD {
            self.tokens[idx].enter_ring();
        } else {
            self.tokens[idx].advance(roll.value());
        }
        let moved = self.tokens[idx];
        debug!(from, to = moved.steps_moved(), cell = ?moved.global_cell(), "Token moved");

        let captures: Vec<Capture> = rules::victims(&moved, &self.seats, &self.tokens)
            .into_iter()
            .map(|victim| {
                self.tokens[arena_index(victim.seat(), victim.id())].send_to_yard();
                info!(victim_seat = %victim.seat(), victim_token = %victim.id(), "Captured");
                Capture {
                    seat: victim.seat(),
                    token: victim.id(),
                    steps_before: victim.steps_moved(),
                }
            })
            .collect();

        let reached_home = moved.steps_moved() == HOME;
        let mut outcome = MoveOutcome {
            seat,
            token,
            roll,
            from,
            to: moved.steps_moved(),
            cell: moved.global_cell(),
            captures,
            extra_turn: false,
            winner: None,
            next_turn: seat,
        };

        if reached_home && self.is_finished(seat) {
            self.phase = Phase::Won { winner: seat };
            outcome.winner = Some(seat);
            info!(winner = %seat, "Match won");
            return outcome;
        }

        outcome.extra_turn =
            rules::grants_extra_turn(roll, !outcome.captures.is_empty(), reached_home);
        if outcome.extra_turn {
            self.phase = Phase::AwaitingRoll;
            debug!("Extra turn");
        } else {
            self.advance_turn();
        }
        outcome.next_turn = self.current_turn;
        outcome
    }

    /// Hands the turn to the next active seat and clears the roll.
    fn advance_turn(&mut self) {
        let kinds = self.seats.each_ref().map(|seat| *seat.kind());
        self.current_turn = rules::next_active_seat(self.current_turn, &kinds);
        self.current_roll = None;
        self.phase = Phase::AwaitingRoll;
        debug!(next = %self.current_turn, "Turn advanced");
    }

    #[cfg(test)]
    pub(crate) fn corrupt_for_test(&mut self, seat: SeatIndex, steps: i8) {
        self.tokens[arena_index(seat, TokenId::ALL[0])].place(steps);
    }
}

impl Default for Match {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────
//  Builder for arranged positions
// ─────────────────────────────────────────────────────────────

/// Builds a match from an arranged position instead of a fresh start.
///
/// Used for puzzles, replays and tests. The arrangement is validated on
/// [`MatchBuilder::build`]; the result awaits a roll from the chosen seat.
#[derive(Debug)]
pub struct MatchBuilder {
    mode: GameMode,
    kinds: [SeatKind; SEAT_COUNT],
    names: SeatNames,
    placements: Vec<(SeatIndex, TokenId, i8)>,
    turn: SeatIndex,
    dice: Option<Box<dyn Dice>>,
}

impl MatchBuilder {
    /// Starts from `mode`'s seat layout with every token in its yard.
    #[instrument]
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            kinds: mode.seat_kinds(),
            names: Default::default(),
            placements: Vec::new(),
            turn: SeatIndex::ALL[0],
            dice: None,
        }
    }

    /// Overrides who sits in one seat.
    pub fn seat_kind(mut self, seat: SeatIndex, kind: SeatKind) -> Self {
        self.kinds[seat.index()] = kind;
        self
    }

    /// Overrides a seat's display name.
    pub fn name(mut self, seat: SeatIndex, name: impl Into<String>) -> Self {
        self.names[seat.index()] = Some(name.into());
        self
    }

    /// Puts a token at `steps_moved`. Later placements of the same token win.
    pub fn place(mut self, seat: SeatIndex, token: TokenId, steps_moved: i8) -> Self {
        self.placements.push((seat, token, steps_moved));
        self
    }

    /// Chooses the seat that rolls first.
    pub fn turn(mut self, seat: SeatIndex) -> Self {
        self.turn = seat;
        self
    }

    /// Uses the given dice instead of a fair die.
    pub fn dice(mut self, dice: impl Dice + 'static) -> Self {
        self.dice = Some(Box::new(dice));
        self
    }

    /// Validates the arrangement and produces a match awaiting a roll.
    ///
    /// # Errors
    ///
    /// Returns a [`SetupError`] for fewer than two active seats, progress
    /// outside `[-1, 57]`, tokens of inactive seats outside their yard, an
    /// inactive first seat, or a seat that has already finished.
    #[instrument(skip(self), fields(mode = %self.mode, placements = self.placements.len()))]
    pub fn build(self) -> Result<Match, SetupError> {
        let active = self.kinds.iter().filter(|kind| kind.is_active()).count();
        if active < 2 {
            warn!(active, "Too few active seats");
            return Err(SetupError::TooFewActiveSeats(active));
        }
        if !self.kinds[self.turn.index()].is_active() {
            return Err(SetupError::InactiveStartingSeat(self.turn));
        }

        let mut tokens = fresh_tokens();
        for (seat, token, steps) in self.placements {
            if !(YARD..=HOME).contains(&steps) {
                return Err(SetupError::StepsOutOfRange { seat, token, steps });
            }
            if !self.kinds[seat.index()].is_active() && steps != YARD {
                return Err(SetupError::InactiveSeatToken(seat));
            }
            tokens[arena_index(seat, token)].place(steps);
        }

        for seat in SeatIndex::ALL {
            let start = seat.index() * TOKENS_PER_SEAT;
            if rules::is_finished(&tokens[start..start + TOKENS_PER_SEAT]) {
                return Err(SetupError::AlreadyFinished(seat));
            }
        }

        let mode = self.mode;
        let kinds = self.kinds;
        let names = std::array::from_fn(|i| {
            self.names[i]
                .clone()
                .unwrap_or_else(|| default_seat_name(SeatIndex::ALL[i], kinds[i], mode))
        });

        let game = Match {
            epoch: 1,
            mode: Some(mode),
            seats: seats_for(kinds, names),
            tokens,
            current_turn: self.turn,
            current_roll: None,
            phase: Phase::AwaitingRoll,
            dice: self.dice.unwrap_or_else(|| Box::new(RandomDice::new())),
        };
        info!(turn = %game.current_turn, "Arranged match built");
        assert_invariants(&game);
        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedDice;

    fn seat(i: usize) -> SeatIndex {
        SeatIndex::new(i).unwrap()
    }

    fn id(i: usize) -> TokenId {
        TokenId::new(i).unwrap()
    }

    fn scripted(values: &[u8]) -> ScriptedDice {
        ScriptedDice::from_values(values.iter().copied()).unwrap()
    }

    #[test]
    fn test_new_match_is_idle() {
        let game = Match::new();
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.epoch(), 0);
        assert!(game.mode().is_none());
        assert!(game.tokens().iter().all(Token::is_in_yard));
    }

    #[test]
    fn test_start_sets_up_seats() {
        let mut game = Match::new();
        game.start(GameMode::VsComputer);
        assert_eq!(game.phase(), Phase::AwaitingRoll);
        assert_eq!(game.current_turn(), seat(0));
        assert_eq!(game.seat(seat(0)).name(), "You");
        assert_eq!(*game.seat(seat(1)).kind(), SeatKind::Computer);
        assert_eq!(game.seat(seat(3)).name(), "CPU Blue");
    }

    #[test]
    fn test_start_named_overrides_defaults() {
        let mut game = Match::new();
        game.start_named(
            GameMode::TwoPlayerHuman,
            &[Some("Ada".into()), None, Some("Grace".into()), None],
        );
        assert_eq!(game.seat(seat(0)).name(), "Ada");
        assert_eq!(game.seat(seat(1)).name(), "-");
        assert_eq!(game.seat(seat(2)).name(), "Grace");
    }

    #[test]
    fn test_restart_discards_previous_state() {
        let mut game = Match::with_dice(scripted(&[6, 5]));
        game.start(GameMode::FourPlayerHuman);
        let outcome = game.request_roll(seat(0)).unwrap();
        game.request_move(seat(0), outcome.legal[0]).unwrap();
        game.request_roll(seat(0)).unwrap();
        assert_eq!(game.phase(), Phase::AwaitingMove);

        game.start(GameMode::TwoPlayerHuman);
        assert_eq!(game.epoch(), 2);
        assert_eq!(game.phase(), Phase::AwaitingRoll);
        assert_eq!(game.current_roll(), None);
        assert_eq!(game.current_turn(), seat(0));
        assert!(game.tokens().iter().all(Token::is_in_yard));
        assert_eq!(game.mode(), Some(GameMode::TwoPlayerHuman));
    }

    #[test]
    fn test_advance_turn_resets_roll() {
        let mut game = Match::with_dice(scripted(&[4]));
        game.start(GameMode::VsComputer);
        let outcome = game.request_roll(seat(0)).unwrap();
        assert_eq!(outcome.passed_to, Some(seat(1)));
        assert_eq!(game.current_roll(), None);
        assert_eq!(game.phase(), Phase::AwaitingRoll);
    }

    #[test]
    fn test_six_without_moves_gives_no_bonus_roll() {
        // Every Red token is deep in the home stretch; a six overshoots all of them.
        let mut builder = MatchBuilder::new(GameMode::TwoPlayerHuman).dice(scripted(&[6]));
        for token in TokenId::ALL {
            builder = builder.place(seat(0), token, 55);
        }
        let mut game = builder.build().unwrap();
        let outcome = game.request_roll(seat(0)).unwrap();
        assert!(outcome.legal.is_empty());
        assert_eq!(outcome.passed_to, Some(seat(2)));
        assert_eq!(game.current_turn(), seat(2));
    }

    #[test]
    fn test_moving_twice_is_rejected() {
        let mut game = MatchBuilder::new(GameMode::TwoPlayerHuman)
            .place(seat(0), id(0), 10)
            .dice(scripted(&[3]))
            .build()
            .unwrap();
        game.request_roll(seat(0)).unwrap();
        game.request_move(seat(0), id(0)).unwrap();
        let err = game.request_move(seat(0), id(0)).unwrap_err();
        assert!(matches!(err, LudoError::IllegalAction { .. }));
    }

    #[test]
    fn test_rejected_move_leaves_state_unchanged() {
        let mut game = MatchBuilder::new(GameMode::TwoPlayerHuman)
            .place(seat(0), id(0), 10)
            .dice(scripted(&[3]))
            .build()
            .unwrap();
        game.request_roll(seat(0)).unwrap();
        let before = game.snapshot();
        let err = game.request_move(seat(0), id(2)).unwrap_err();
        assert!(matches!(err, LudoError::IllegalMove { .. }));
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_pending_moves_only_while_awaiting_move() {
        let mut game = MatchBuilder::new(GameMode::TwoPlayerHuman)
            .place(seat(0), id(0), 10)
            .dice(scripted(&[3]))
            .build()
            .unwrap();
        assert!(game.pending_moves().is_empty());
        game.request_roll(seat(0)).unwrap();
        assert_eq!(game.pending_moves(), vec![id(0)]);
    }

    #[test]
    fn test_builder_rejects_single_active_seat() {
        let err = MatchBuilder::new(GameMode::TwoPlayerHuman)
            .seat_kind(seat(2), SeatKind::Inactive)
            .build()
            .unwrap_err();
        assert_eq!(err, SetupError::TooFewActiveSeats(1));
    }

    #[test]
    fn test_builder_rejects_bad_placements() {
        let err = MatchBuilder::new(GameMode::FourPlayerHuman)
            .place(seat(1), id(2), 58)
            .build()
            .unwrap_err();
        assert!(matches!(err, SetupError::StepsOutOfRange { steps: 58, .. }));

        let err = MatchBuilder::new(GameMode::TwoPlayerHuman)
            .place(seat(1), id(0), 5)
            .build()
            .unwrap_err();
        assert_eq!(err, SetupError::InactiveSeatToken(seat(1)));

        let err = MatchBuilder::new(GameMode::TwoPlayerHuman)
            .turn(seat(3))
            .build()
            .unwrap_err();
        assert_eq!(err, SetupError::InactiveStartingSeat(seat(3)));
    }

    #[test]
    fn test_builder_rejects_finished_seat() {
        let mut builder = MatchBuilder::new(GameMode::FourPlayerHuman);
        for token in TokenId::ALL {
            builder = builder.place(seat(2), token, 57);
        }
        assert_eq!(
            builder.build().unwrap_err(),
            SetupError::AlreadyFinished(seat(2))
        );
    }
}
