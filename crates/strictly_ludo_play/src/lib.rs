//! Strictly Ludo console front end
//!
//! Drives a [`strictly_ludo::Match`] from the terminal. Human seats type
//! commands; computer seats (and every seat under autoplay) are played by a
//! move policy whose requests are scheduled as cancellable, epoch-tagged
//! commands so a restart never races a pending computer action.
//!
//! # Architecture
//!
//! - **Config**: TOML session settings with CLI overrides
//! - **Input**: console lines parsed into intents
//! - **Autopilot / Scheduler**: planned, delayed, cancellable engine requests
//! - **Orchestrator**: sole owner of the match, applies one request at a time
//! - **Render**: text board or JSON lines from snapshots
//! - **Simulate**: batches of automated matches

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod autopilot;
mod config;
mod events;
mod input;
mod orchestrator;
mod render;
mod scheduler;
mod simulate;

// Crate-level exports - Configuration
pub use config::{ConfigError, NameOverrides, PlayConfig};

// Crate-level exports - Input
pub use input::{InputError, Intent, forward_lines, parse_intent};

// Crate-level exports - Orchestration
pub use autopilot::Autopilot;
pub use events::GameEvent;
pub use orchestrator::Orchestrator;
pub use scheduler::{Command, CommandScheduler, Fired};

// Crate-level exports - Rendering
pub use render::{ConsoleRenderer, JsonRenderer, Renderer, board_text, drain, event_text};

// Crate-level exports - Simulation
pub use simulate::{Tally, simulate};
