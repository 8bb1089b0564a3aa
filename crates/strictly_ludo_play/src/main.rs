//! Strictly Ludo - console entry point.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::path::Path;
use strictly_ludo::{GameMode, Match, PolicyKind, RandomDice};
use strictly_ludo_play::{
    ConsoleRenderer, GameEvent, JsonRenderer, Orchestrator, PlayConfig, Renderer, drain,
    forward_lines, simulate,
};
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            mode,
            config,
            seed,
            policy,
            autoplay,
            json,
        } => {
            init_tracing("warn");
            run_play(&config, mode, seed, policy, autoplay, json).await
        }
        Command::Simulate {
            games,
            mode,
            seed,
            policy,
        } => {
            init_tracing("warn,strictly_ludo=info");
            run_simulate(games, mode, seed, policy).await
        }
    }
}

/// Logs to stderr so the board on stdout stays readable.
fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Play an interactive console match
#[instrument(skip_all, fields(config_path = %config_path.display()))]
async fn run_play(
    config_path: &Path,
    mode: Option<GameMode>,
    seed: Option<u64>,
    policy: Option<PolicyKind>,
    autoplay: bool,
    json: bool,
) -> Result<()> {
    let mut config = PlayConfig::load_or_default(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    if let Some(mode) = mode {
        config = config.with_mode(mode);
    }
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    if let Some(policy) = policy {
        config = config.with_policy(policy);
    }
    if autoplay {
        config = config.with_autoplay(true);
    }

    let dice = config.seed().map(RandomDice::seeded).unwrap_or_default();
    info!(mode = %config.mode(), seed = ?config.seed(), "Starting console session");

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (intent_tx, intent_rx) = mpsc::unbounded_channel();
    let (error_tx, mut error_rx) = mpsc::unbounded_channel();

    let mut renderer: Box<dyn Renderer> = if json {
        Box::new(JsonRenderer::new(tokio::io::stdout()))
    } else {
        Box::new(ConsoleRenderer::new(tokio::io::stdout()))
    };
    let render_task = tokio::spawn(async move { drain(event_rx, renderer.as_mut()).await });

    std::thread::spawn(move || {
        if let Err(e) = forward_lines(std::io::stdin().lock(), intent_tx, error_tx) {
            warn!(error = %e, "Console input failed");
        }
    });
    let hint_tx = event_tx.clone();
    let hint_task = tokio::spawn(async move {
        while let Some(e) = error_rx.recv().await {
            let _ = hint_tx.send(GameEvent::Rejected {
                reason: e.to_string(),
            });
        }
    });

    let mut orchestrator = Orchestrator::new(Match::with_dice(dice), config).with_events(event_tx);
    let winner = orchestrator.run(intent_rx).await?;
    match winner {
        Some(winner) => info!(%winner, "Session finished"),
        None => info!("Session abandoned"),
    }

    // Closing the event stream lets the renderer flush and exit.
    drop(orchestrator);
    hint_task.abort();
    if let Err(e) = render_task.await.context("Renderer task panicked")? {
        warn!(error = %e, "Renderer failed");
    }
    Ok(())
}

/// Autoplay a batch of matches and print the tally
#[instrument]
async fn run_simulate(
    games: usize,
    mode: GameMode,
    seed: Option<u64>,
    policy: PolicyKind,
) -> Result<()> {
    let mut config = PlayConfig::default().with_mode(mode).with_policy(policy);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    let tally = simulate(&config, games).await?;
    print!("{tally}");
    Ok(())
}
