//! Batches of fully automated matches.

use crate::config::PlayConfig;
use crate::orchestrator::Orchestrator;
use anyhow::{Context, Result};
use derive_getters::Getters;
use serde::Serialize;
use std::fmt;
use strictly_ludo::{Color, Match, RandomDice, board::SEAT_COUNT};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

/// Wins per color over a batch of matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize)]
pub struct Tally {
    /// Matches played.
    games: usize,
    /// Wins in seat order.
    wins: [usize; SEAT_COUNT],
}

impl Tally {
    /// Wins for one color.
    pub fn wins_for(&self, color: Color) -> usize {
        self.wins[color.seat().index()]
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} games", self.games)?;
        for color in Color::ALL {
            let wins = self.wins_for(color);
            let share = if self.games == 0 {
                0.0
            } else {
                wins as f64 * 100.0 / self.games as f64
            };
            writeln!(f, "  {:<6} {:>6}  {:>5.1}%", color.label(), wins, share)?;
        }
        Ok(())
    }
}

/// Plays `games` matches with every seat on autopilot and no pacing.
///
/// Match `i` rolls with seed `seed + i` when the config has a seed.
#[instrument(skip(config), fields(mode = %config.mode(), policy = %config.policy()))]
pub async fn simulate(config: &PlayConfig, games: usize) -> Result<Tally> {
    let mut tally = Tally::default();
    for i in 0..games {
        let seed = config.seed().map(|s| s.wrapping_add(i as u64));
        let dice = seed.map(RandomDice::seeded).unwrap_or_default();
        let mut game_config = config
            .clone()
            .with_autoplay(true)
            .with_roll_delay_ms(0)
            .with_think_delay_ms(0);
        if let Some(seed) = seed {
            game_config = game_config.with_seed(seed);
        }

        let mut orchestrator = Orchestrator::new(Match::with_dice(dice), game_config);
        let (_input_tx, input_rx) = mpsc::unbounded_channel();
        let winner = orchestrator
            .run(input_rx)
            .await?
            .with_context(|| format!("Match {} ended without a winner", i + 1))?;

        debug!(game = i + 1, %winner, "Simulated match finished");
        tally.games += 1;
        tally.wins[winner.index()] += 1;
    }
    info!(games = tally.games, "Simulation complete");
    Ok(tally)
}
