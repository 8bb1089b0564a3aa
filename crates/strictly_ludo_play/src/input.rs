//! Console input for human seats.

use derive_more::{Display, Error};
use strictly_ludo::TokenId;
use std::io::BufRead;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// What a person at the console asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Intent {
    /// Roll for the current seat.
    #[display("roll")]
    Roll,
    /// Move one of the current seat's tokens.
    #[display("move token {}", _0)]
    Move(TokenId),
    /// Throw the match away and start again.
    #[display("new match")]
    NewMatch,
    /// Abandon the session.
    #[display("quit")]
    Quit,
}

/// A line that is not a command.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Unrecognised input '{}' (r = roll, 1-4 = move token, n = new match, q = quit)", input)]
pub struct InputError {
    /// The offending line, trimmed.
    #[error(not(source))]
    pub input: String,
}

/// Parses one line of console input.
#[instrument]
pub fn parse_intent(line: &str) -> Result<Intent, InputError> {
    let trimmed = line.trim();
    let intent = match trimmed.to_ascii_lowercase().as_str() {
        "r" | "roll" => Intent::Roll,
        "n" | "new" => Intent::NewMatch,
        "q" | "quit" | "exit" => Intent::Quit,
        other => other
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(TokenId::new)
            .map(Intent::Move)
            .ok_or_else(|| InputError {
                input: trimmed.to_string(),
            })?,
    };
    Ok(intent)
}

/// Forwards parsed lines from `reader` until it ends or the receiver goes away.
///
/// Blocks the calling thread, so run it on a dedicated thread: a plain
/// thread does not keep the process alive waiting for a last line.
/// Unparseable lines are reported through `errors` and otherwise skipped.
#[instrument(skip_all)]
pub fn forward_lines<R: BufRead>(
    reader: R,
    intents: mpsc::UnboundedSender<Intent>,
    errors: mpsc::UnboundedSender<InputError>,
) -> std::io::Result<()> {
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let delivered = match parse_intent(&line) {
            Ok(intent) => {
                debug!(%intent, "Console intent");
                intents.send(intent).is_ok()
            }
            Err(e) => {
                warn!(error = %e, "Ignoring console input");
                errors.send(e).is_ok()
            }
        };
        if !delivered {
            break;
        }
    }
    info!("Console input closed");
    Ok(())
}
