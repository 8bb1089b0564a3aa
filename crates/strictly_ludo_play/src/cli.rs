//! Command-line interface for strictly_ludo.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use strictly_ludo::{GameMode, PolicyKind};

/// Strictly Ludo - four-seat Ludo in the terminal
#[derive(Parser, Debug)]
#[command(name = "strictly_ludo")]
#[command(about = "Four-seat Ludo with scheduled computer opponents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a match in the console
    Play {
        /// Seat layout: vs-computer, two-player-human or four-player-human
        #[arg(short, long)]
        mode: Option<GameMode>,

        /// Path to a TOML config file
        #[arg(short, long, default_value = "strictly_ludo.toml")]
        config: PathBuf,

        /// Seed for dice and computer choices
        #[arg(long)]
        seed: Option<u64>,

        /// Policy for computer seats: random or heuristic
        #[arg(long)]
        policy: Option<PolicyKind>,

        /// Let the policy play every seat
        #[arg(long)]
        autoplay: bool,

        /// Print events as JSON lines instead of a text board
        #[arg(long)]
        json: bool,
    },

    /// Autoplay many matches and print win counts
    Simulate {
        /// Number of matches
        #[arg(short, long, default_value = "100")]
        games: usize,

        /// Seat layout: vs-computer, two-player-human or four-player-human
        #[arg(short, long, default_value = "four-player-human")]
        mode: GameMode,

        /// Seed of the first match; later matches count up from it
        #[arg(long)]
        seed: Option<u64>,

        /// Policy for every seat: random or heuristic
        #[arg(long, default_value = "random")]
        policy: PolicyKind,
    },
}
