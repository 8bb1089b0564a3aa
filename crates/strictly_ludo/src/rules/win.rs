//! Win detection.

use super::super::board::TOKENS_PER_SEAT;
use super::super::types::Token;
use tracing::instrument;

/// Returns true if a seat owning `tokens` has brought every token home.
#[instrument(level = "trace", skip(tokens))]
pub fn is_finished(tokens: &[Token]) -> bool {
    tokens.len() == TOKENS_PER_SEAT && tokens.iter().all(Token::is_home)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SeatIndex, TokenId};

    fn tokens(steps: [i8; 4]) -> Vec<Token> {
        TokenId::ALL
            .into_iter()
            .zip(steps)
            .map(|(id, s)| {
                let mut token = Token::in_yard(SeatIndex::new(1).unwrap(), id);
                token.place(s);
                token
            })
            .collect()
    }

    #[test]
    fn test_not_finished_at_start() {
        assert!(!is_finished(&tokens([-1; 4])));
    }

    #[test]
    fn test_three_home_is_not_enough() {
        assert!(!is_finished(&tokens([57, 57, 57, 56])));
    }

    #[test]
    fn test_all_home_is_finished() {
        assert!(is_finished(&tokens([57; 4])));
    }
}
