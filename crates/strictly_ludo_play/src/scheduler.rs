//! Delayed, cancellable engine commands for automated seats.
//!
//! A command is decided up front and delivered after its delay as a single
//! message, so the engine only ever sees whole requests. Cancelling aborts
//! the sleeping task; a command that already fired still carries the epoch
//! it was planned against, which the receiver checks before applying it.

use derive_new::new;
use serde::Serialize;
use std::time::Duration;
use strictly_ludo::Action;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

/// An engine request planned against one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, new)]
pub struct Command {
    /// Epoch of the match the command was planned for.
    pub epoch: u64,
    /// The request to make.
    pub action: Action,
}

/// A command as delivered, with the ticket it was scheduled under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    /// Ticket returned by [`CommandScheduler::schedule`].
    pub ticket: u64,
    /// The command itself.
    pub command: Command,
}

/// Schedules at most one pending command at a time.
#[derive(Debug)]
pub struct CommandScheduler {
    tx: mpsc::UnboundedSender<Fired>,
    pending: Option<(u64, JoinHandle<()>)>,
    next_ticket: u64,
}

impl CommandScheduler {
    /// Creates a scheduler and the receiver fired commands arrive on.
    #[instrument]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Fired>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            tx,
            pending: None,
            next_ticket: 0,
        };
        (scheduler, rx)
    }

    /// Delivers `command` after `delay`, replacing anything still pending.
    #[instrument(skip(self), fields(epoch = command.epoch))]
    pub fn schedule(&mut self, command: Command, delay: Duration) -> u64 {
        self.cancel();
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(Fired { ticket, command }).is_err() {
                debug!(ticket, "Receiver gone, command dropped");
            }
        });
        debug!(ticket, ?delay, "Command scheduled");
        self.pending = Some((ticket, handle));
        ticket
    }

    /// Aborts the pending command, if any. Returns true if one was pending.
    #[instrument(skip(self))]
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some((ticket, handle)) => {
                handle.abort();
                debug!(ticket, "Pending command cancelled");
                true
            }
            None => false,
        }
    }

    /// Marks `ticket` as delivered. Tickets of cancelled commands are ignored.
    pub fn settle(&mut self, ticket: u64) {
        if self.pending.as_ref().is_some_and(|(pending, _)| *pending == ticket) {
            self.pending = None;
        }
    }

    /// Returns true while a scheduled command has not been settled.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for CommandScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
