//! Move legality.

use super::super::board::{EXIT_ROLL, HOME};
use super::super::types::{SeatKind, Token, TokenId};
use tracing::instrument;

/// Returns true if `token` may move by `roll`.
///
/// A yard token needs exactly a six; anything else must not overshoot home.
#[instrument(level = "trace")]
pub fn is_legal(token: &Token, roll: u8) -> bool {
    if token.is_in_yard() {
        return roll == EXIT_ROLL;
    }
    if token.is_home() {
        return false;
    }
    token.steps_moved() as i16 + roll as i16 <= HOME as i16
}

/// Legal token ids for a seat of `kind` owning `tokens`, given `roll`.
///
/// Takes a raw integer so callers can ask about hypothetical rolls. Inactive
/// seats never have legal moves.
#[instrument(level = "trace", skip(tokens))]
pub fn legal_moves(kind: SeatKind, tokens: &[Token], roll: u8) -> Vec<TokenId> {
    if !kind.is_active() {
        return Vec::new();
    }
    tokens
        .iter()
        .filter(|token| is_legal(token, roll))
        .map(|token| token.id())
        .collect()
}
