//! Move policies for computer seats.
//!
//! A policy only picks among tokens the engine already declared legal; the
//! engine stays the single judge of legality.

use super::board::HOME;
use super::dice::DieRoll;
use super::snapshot::MatchSnapshot;
use super::types::{SeatIndex, TokenId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Chooses which legal token a computer seat moves.
pub trait MovePolicy: std::fmt::Debug + Send {
    /// Picks one of `legal`, which is never empty.
    fn choose(
        &mut self,
        seat: SeatIndex,
        legal: &[TokenId],
        roll: DieRoll,
        snapshot: &MatchSnapshot,
    ) -> TokenId;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Picks uniformly at random among the legal tokens.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    /// Seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible choices.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl MovePolicy for RandomPolicy {
    #[instrument(skip(self, _snapshot), fields(policy = "random"))]
    fn choose(
        &mut self,
        seat: SeatIndex,
        legal: &[TokenId],
        roll: DieRoll,
        _snapshot: &MatchSnapshot,
    ) -> TokenId {
        debug_assert!(!legal.is_empty());
        let pick = legal[self.rng.gen_range(0..legal.len())];
        debug!(%pick, "Random pick");
        pick
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Prefers finishing a token, then capturing, then leaving the yard, then
/// advancing the token furthest along. Ties go to the lowest id.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicPolicy;

impl HeuristicPolicy {
    fn score(seat: SeatIndex, token: TokenId, roll: DieRoll, snapshot: &MatchSnapshot) -> (u8, i8) {
        let Some(view) = snapshot.token(seat, token) else {
            return (0, i8::MIN);
        };
        let from = *view.steps_moved();
        let Some(to) = snapshot.landing(seat, token, roll.value()) else {
            return (0, i8::MIN);
        };
        let tier = if to == HOME {
            4
        } else if !snapshot.would_capture(seat, to).is_empty() {
            3
        } else if from < 0 {
            2
        } else {
            1
        };
        (tier, from)
    }
}

impl MovePolicy for HeuristicPolicy {
    #[instrument(skip(self, snapshot), fields(policy = "heuristic"))]
    fn choose(
        &mut self,
        seat: SeatIndex,
        legal: &[TokenId],
        roll: DieRoll,
        snapshot: &MatchSnapshot,
    ) -> TokenId {
        debug_assert!(!legal.is_empty());
        let mut best = legal[0];
        let mut best_score = Self::score(seat, best, roll, snapshot);
        for &token in &legal[1..] {
            let score = Self::score(seat, token, roll, snapshot);
            if score > best_score {
                best = token;
                best_score = score;
            }
        }
        debug!(pick = %best, tier = best_score.0, "Heuristic pick");
        best
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}

/// Which policy computer seats use.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::EnumIter,
    strum::EnumString,
    strum::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PolicyKind {
    /// Uniform random choice.
    #[default]
    Random,
    /// Finish, capture, leave the yard, advance the leader.
    Heuristic,
}

impl PolicyKind {
    /// Builds the policy, seeding it when a seed is given.
    #[instrument]
    pub fn build(self, seed: Option<u64>) -> Box<dyn MovePolicy> {
        match self {
            PolicyKind::Random => Box::new(
                seed.map(RandomPolicy::seeded)
                    .unwrap_or_else(RandomPolicy::new),
            ),
            PolicyKind::Heuristic => Box::new(HeuristicPolicy),
        }
    }
}
