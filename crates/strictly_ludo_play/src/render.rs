//! Console renderers.
//!
//! Renderers only read snapshots and outcomes; they never touch the match.

use crate::events::GameEvent;
use anyhow::Result;
use std::fmt::Write as _;
use strictly_ludo::{MatchSnapshot, Phase, SeatView, TokenView, TokenZone};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, instrument};

/// Something that shows game events to a person or a pipe.
#[async_trait::async_trait]
pub trait Renderer: Send {
    /// Shows one event.
    async fn render(&mut self, event: &GameEvent) -> Result<()>;
}

/// Plain-text board and narration.
#[derive(Debug)]
pub struct ConsoleRenderer<W> {
    out: W,
}

impl<W> ConsoleRenderer<W> {
    /// Renders to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Gives back the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[async_trait::async_trait]
impl<W: AsyncWrite + Unpin + Send> Renderer for ConsoleRenderer<W> {
    async fn render(&mut self, event: &GameEvent) -> Result<()> {
        let text = event_text(event);
        self.out.write_all(text.as_bytes()).await?;
        self.out.flush().await?;
        Ok(())
    }
}

/// One JSON object per line, for piping into other tools.
#[derive(Debug)]
pub struct JsonRenderer<W> {
    out: W,
}

impl<W> JsonRenderer<W> {
    /// Renders to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Gives back the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[async_trait::async_trait]
impl<W: AsyncWrite + Unpin + Send> Renderer for JsonRenderer<W> {
    async fn render(&mut self, event: &GameEvent) -> Result<()> {
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');
        self.out.write_all(&line).await?;
        self.out.flush().await?;
        Ok(())
    }
}

/// Renders events until the channel closes.
#[instrument(skip_all)]
pub async fn drain(
    mut events: mpsc::UnboundedReceiver<GameEvent>,
    renderer: &mut dyn Renderer,
) -> Result<()> {
    while let Some(event) = events.recv().await {
        renderer.render(&event).await?;
    }
    debug!("Event stream closed");
    Ok(())
}

fn token_text(token: &TokenView) -> String {
    let id = token.id().index() + 1;
    match token.zone() {
        TokenZone::Yard => format!("{id}:yard"),
        TokenZone::Home => format!("{id}:home"),
        TokenZone::HomeStretch => format!("{id}:stretch {}", token.steps_moved() - 50),
        TokenZone::Ring => {
            let cell = token.global_cell().map(|c| c.to_string()).unwrap_or_default();
            let star = if *token.safe() { "*" } else { "" };
            format!("{id}:@{cell}{star}")
        }
    }
}

fn seat_line(seat: &SeatView, current: bool) -> String {
    let marker = if current { ">" } else { " " };
    let tokens: Vec<String> = seat.tokens().iter().map(token_text).collect();
    let finished = if *seat.finished() { "  (finished)" } else { "" };
    format!(
        "{marker} {:<6} {:<10} {}{finished}",
        seat.color().label(),
        seat.name(),
        tokens.join("  ")
    )
}

/// Text board: one line per active seat, current seat marked.
///
/// Ring tokens show their global cell; `*` marks a safe cell.
pub fn board_text(snapshot: &MatchSnapshot) -> String {
    let mut out = String::new();
    for seat in snapshot.seats().iter().filter(|s| s.kind().is_active()) {
        let current =
            *seat.index() == *snapshot.current_turn() && snapshot.phase().is_in_progress();
        let _ = writeln!(out, "{}", seat_line(seat, current));
    }
    out
}

/// Narration for one event, ending in a newline.
pub fn event_text(event: &GameEvent) -> String {
    match event {
        GameEvent::Started { snapshot } => {
            let mode = snapshot.mode().map(|m| m.to_string()).unwrap_or_default();
            format!("New match ({mode})\n{}", board_text(snapshot))
        }
        GameEvent::Rolled { name, outcome, .. } => match outcome.passed_to {
            Some(_) => format!("{name} rolled {} - no legal moves, turn passes\n", outcome.roll),
            None => format!("{name} rolled {}\n", outcome.roll),
        },
        GameEvent::Moved {
            name,
            outcome,
            snapshot,
        } => {
            let mut text = format!("{name} moved token {}", outcome.token.index() + 1);
            for capture in &outcome.captures {
                let victim = snapshot
                    .seat(capture.seat)
                    .map(|s| s.name().clone())
                    .unwrap_or_default();
                let _ = write!(text, ", captured {victim}'s token {}", capture.token.index() + 1);
            }
            if outcome.reached_home() {
                text.push_str(", reached home");
            }
            if outcome.extra_turn {
                text.push_str(" - extra turn");
            } else if outcome.winner.is_none() {
                let next = snapshot
                    .seat(outcome.next_turn)
                    .map(|s| s.name().clone())
                    .unwrap_or_default();
                let _ = write!(text, " - {next} to roll");
            }
            text.push('\n');
            text.push_str(&board_text(snapshot));
            text
        }
        GameEvent::Prompt {
            name, phase, legal, ..
        } => match phase {
            Phase::AwaitingMove => {
                let choices: Vec<String> =
                    legal.iter().map(|t| (t.index() + 1).to_string()).collect();
                format!("{name}, move a token [{}]: \n", choices.join("/"))
            }
            _ => format!("{name}, press r to roll: \n"),
        },
        GameEvent::Rejected { reason } => format!("! {reason}\n"),
        GameEvent::Won { name, .. } => format!("{name} wins! (n = new match, q = quit)\n"),
        GameEvent::Abandoned => "Match abandoned\n".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strictly_ludo::{GameMode, MatchBuilder, ScriptedDice, SeatIndex, TokenId};

    fn seat(i: usize) -> SeatIndex {
        SeatIndex::new(i).unwrap()
    }

    #[test]
    fn test_board_lists_only_active_seats() {
        let game = MatchBuilder::new(GameMode::TwoPlayerHuman)
            .place(seat(0), TokenId::new(0).unwrap(), 8)
            .place(seat(2), TokenId::new(1).unwrap(), 53)
            .build()
            .unwrap();
        let board = board_text(&game.snapshot());
        let lines: Vec<&str> = board.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("> Red"));
        assert!(lines[0].contains("1:@8*"));
        assert!(lines[1].contains("2:stretch 3"));
        assert!(!board.contains("Green"));
    }

    #[test]
    fn test_capture_narration_names_victim() {
        let mut game = MatchBuilder::new(GameMode::TwoPlayerHuman)
            .place(seat(0), TokenId::new(0).unwrap(), 27)
            .place(seat(2), TokenId::new(0).unwrap(), 4)
            .dice(ScriptedDice::from_values([3]).unwrap())
            .build()
            .unwrap();
        game.request_roll(seat(0)).unwrap();
        let outcome = game.request_move(seat(0), TokenId::new(0).unwrap()).unwrap();
        let text = event_text(&GameEvent::Moved {
            name: "Player 1".into(),
            outcome,
            snapshot: game.snapshot(),
        });
        assert!(
            text.starts_with("Player 1 moved token 1, captured Player 3's token 1 - extra turn\n")
        );
    }

    #[test]
    fn test_plain_move_names_next_seat() {
        let mut game = MatchBuilder::new(GameMode::TwoPlayerHuman)
            .place(seat(0), TokenId::new(0).unwrap(), 20)
            .dice(ScriptedDice::from_values([3]).unwrap())
            .build()
            .unwrap();
        game.request_roll(seat(0)).unwrap();
        let outcome = game.request_move(seat(0), TokenId::new(0).unwrap()).unwrap();
        assert_eq!(outcome.next_turn, seat(2));
        let text = event_text(&GameEvent::Moved {
            name: "Player 1".into(),
            outcome,
            snapshot: game.snapshot(),
        });
        assert!(text.starts_with("Player 1 moved token 1 - Player 3 to roll\n"));
    }

    #[tokio::test]
    async fn test_json_renderer_writes_one_line_per_event() {
        let mut renderer = JsonRenderer::new(Vec::new());
        renderer.render(&GameEvent::Abandoned).await.unwrap();
        renderer
            .render(&GameEvent::Rejected {
                reason: "nope".into(),
            })
            .await
            .unwrap();
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                r#"{"event":"abandoned"}"#,
                r#"{"event":"rejected","reason":"nope"}"#
            ]
        );
    }
}
