//! Decides what an automated seat does next.

use crate::scheduler::Command;
use std::time::Duration;
use strictly_ludo::{Action, Match, MovePolicy, Phase};
use tracing::{debug, instrument};

/// Plays seats through a move policy, with pacing delays.
#[derive(Debug)]
pub struct Autopilot {
    policy: Box<dyn MovePolicy>,
    roll_delay: Duration,
    think_delay: Duration,
}

impl Autopilot {
    /// Creates an autopilot.
    pub fn new(policy: Box<dyn MovePolicy>, roll_delay: Duration, think_delay: Duration) -> Self {
        Self {
            policy,
            roll_delay,
            think_delay,
        }
    }

    /// Name of the policy in use.
    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Plans the current seat's next request and how long to wait before it.
    ///
    /// The move is chosen now, against the state it will be applied to.
    /// Returns `None` unless the match is waiting on the current seat.
    #[instrument(skip(self, game), fields(epoch = game.epoch(), seat = %game.current_turn()))]
    pub fn plan(&mut self, game: &Match) -> Option<(Command, Duration)> {
        let seat = game.current_turn();
        let action = match game.phase() {
            Phase::AwaitingRoll => {
                return Some((
                    Command::new(game.epoch(), Action::Roll { seat }),
                    self.roll_delay,
                ));
            }
            Phase::AwaitingMove => {
                let roll = game.current_roll()?;
                let legal = game.pending_moves();
                if legal.is_empty() {
                    return None;
                }
                let token = self.policy.choose(seat, &legal, roll, &game.snapshot());
                debug!(policy = self.policy_name(), %token, "Token chosen");
                Action::Move { seat, token }
            }
            Phase::Idle | Phase::Won { .. } => return None,
        };
        Some((Command::new(game.epoch(), action), self.think_delay))
    }
}
