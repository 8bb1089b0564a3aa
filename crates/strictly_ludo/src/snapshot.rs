//! Serializable read model of a match.
//!
//! Renderers and move policies only ever see a `MatchSnapshot`; they never
//! hold a reference into the live match.

use super::board::{self, HOME};
use super::dice::DieRoll;
use super::game::Match;
use super::phases::Phase;
use super::types::{Color, GameMode, SeatIndex, SeatKind, TokenId, TokenZone};
use derive_getters::Getters;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One token as seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Getters)]
pub struct TokenView {
    /// Id within the seat.
    id: TokenId,
    /// Progress: -1 yard, 0-50 ring, 51-56 home stretch, 57 home.
    steps_moved: i8,
    /// Zone derived from `steps_moved`.
    zone: TokenZone,
    /// Immune to capture where it stands.
    safe: bool,
    /// Global ring cell while on the ring.
    global_cell: Option<u8>,
}

/// One seat as seen from outside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Getters)]
pub struct SeatView {
    /// Position in turn order.
    index: SeatIndex,
    /// Seat color.
    color: Color,
    /// Who plays the seat.
    kind: SeatKind,
    /// Display name.
    name: String,
    /// All tokens home.
    finished: bool,
    /// The seat's four tokens.
    tokens: Vec<TokenView>,
}

/// Complete read-only state of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Getters)]
pub struct MatchSnapshot {
    /// Match counter on the owning instance.
    epoch: u64,
    /// Mode, absent while idle.
    mode: Option<GameMode>,
    /// All four seats in turn order.
    seats: Vec<SeatView>,
    /// Seat allowed to act.
    current_turn: SeatIndex,
    /// Roll being played.
    current_roll: Option<DieRoll>,
    /// Current phase.
    phase: Phase,
    /// Winner once over.
    winner: Option<SeatIndex>,
    /// Tokens the current seat may move now.
    legal_moves: Vec<TokenId>,
}

impl MatchSnapshot {
    pub(crate) fn of(game: &Match) -> Self {
        let seats = game
            .seats()
            .iter()
            .map(|seat| {
                let index = *seat.index();
                SeatView {
                    index,
                    color: seat.color(),
                    kind: *seat.kind(),
                    name: seat.name().clone(),
                    finished: game.is_finished(index),
                    tokens: game
                        .tokens_of(index)
                        .iter()
                        .map(|token| TokenView {
                            id: token.id(),
                            steps_moved: token.steps_moved(),
                            zone: token.zone(),
                            safe: token.is_safe(),
                            global_cell: token.global_cell(),
                        })
                        .collect(),
                }
            })
            .collect();

        Self {
            epoch: game.epoch(),
            mode: game.mode(),
            seats,
            current_turn: game.current_turn(),
            current_roll: game.current_roll(),
            phase: game.phase(),
            winner: game.winner(),
            legal_moves: game.pending_moves(),
        }
    }

    /// One seat.
    pub fn seat(&self, seat: SeatIndex) -> Option<&SeatView> {
        self.seats.get(seat.index())
    }

    /// One token.
    pub fn token(&self, seat: SeatIndex, token: TokenId) -> Option<&TokenView> {
        self.seat(seat)?.tokens.get(token.index())
    }

    /// Where `token` of `seat` would end up after moving `roll` steps.
    ///
    /// Returns `None` if the move would be illegal.
    pub fn landing(&self, seat: SeatIndex, token: TokenId, roll: u8) -> Option<i8> {
        let view = self.token(seat, token)?;
        match view.zone {
            TokenZone::Yard if roll == board::EXIT_ROLL => Some(0),
            TokenZone::Yard | TokenZone::Home => None,
            TokenZone::Ring | TokenZone::HomeStretch => {
                let target = view.steps_moved as i16 + roll as i16;
                (target <= HOME as i16).then_some(target as i8)
            }
        }
    }

    /// Opposing tokens a move of `seat` to `steps_moved` would capture.
    pub fn would_capture(&self, seat: SeatIndex, steps_moved: i8) -> Vec<(SeatIndex, TokenId)> {
        let Some(cell) = board::global_cell(seat.color(), steps_moved) else {
            return Vec::new();
        };
        if board::is_safe_cell(cell) {
            return Vec::new();
        }
        self.seats
            .iter()
            .filter(|other| other.index != seat && other.kind.is_active())
            .flat_map(|other| {
                other
                    .tokens
                    .iter()
                    .filter(move |token| token.global_cell == Some(cell))
                    .map(move |token| (other.index, token.id))
            })
            .collect()
    }
}
