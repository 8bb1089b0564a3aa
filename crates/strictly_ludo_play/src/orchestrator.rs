//! Game orchestration between console input and automated seats.
//!
//! The orchestrator is the only owner of the [`Match`]. Console intents and
//! fired commands both funnel into it and are applied one at a time, so no
//! two actors can ever mutate the match concurrently.

use crate::autopilot::Autopilot;
use crate::config::PlayConfig;
use crate::events::GameEvent;
use crate::input::Intent;
use crate::scheduler::{CommandScheduler, Fired};
use anyhow::Result;
use strictly_ludo::{Action, Match, Phase, SeatIndex, SeatKind};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Runs one session: a match, restarts of it, and its automated seats.
#[derive(Debug)]
pub struct Orchestrator {
    game: Match,
    config: PlayConfig,
    autopilot: Autopilot,
    scheduler: CommandScheduler,
    fired: mpsc::UnboundedReceiver<Fired>,
    events: Option<mpsc::UnboundedSender<GameEvent>>,
    prompted: bool,
}

impl Orchestrator {
    /// Creates an orchestrator around `game`, which is (re)started by [`Orchestrator::run`].
    #[instrument(skip(game, config), fields(mode = %config.mode(), policy = %config.policy()))]
    pub fn new(game: Match, config: PlayConfig) -> Self {
        let policy = config.policy().build(config.policy_seed());
        let autopilot = Autopilot::new(policy, config.roll_delay(), config.think_delay());
        let (scheduler, fired) = CommandScheduler::new();
        Self {
            game,
            config,
            autopilot,
            scheduler,
            fired,
            events: None,
            prompted: false,
        }
    }

    /// Sends [`GameEvent`]s to `events` from now on.
    pub fn with_events(mut self, events: mpsc::UnboundedSender<GameEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// The match being played.
    pub fn game(&self) -> &Match {
        &self.game
    }

    /// Returns true if `seat` is played by the autopilot.
    pub fn is_automated(&self, seat: SeatIndex) -> bool {
        *self.config.autoplay() || *self.game.seat(seat).kind() == SeatKind::Computer
    }

    /// Starts the match and plays until it is won or abandoned.
    ///
    /// Returns the winner, or `None` if the session was abandoned. With
    /// autoplay, or once `input` has closed, the session ends at the first
    /// win; otherwise a person may start another match or quit.
    #[instrument(skip_all, fields(autoplay = *self.config.autoplay()))]
    pub async fn run(
        &mut self,
        mut input: mpsc::UnboundedReceiver<Intent>,
    ) -> Result<Option<SeatIndex>> {
        info!(policy = self.autopilot.policy_name(), "Starting game orchestration");
        self.start_match();
        let mut input_open = true;

        loop {
            if let Some(winner) = self.game.winner() {
                if *self.config.autoplay() || !input_open {
                    return Ok(Some(winner));
                }
                match input.recv().await {
                    Some(Intent::NewMatch) => self.start_match(),
                    Some(Intent::Quit) | None => return Ok(Some(winner)),
                    Some(_) => self.reject("The match is over".to_string()),
                }
                continue;
            }

            self.plan_next();
            if !self.scheduler.is_pending() {
                if !input_open {
                    info!("Input closed while a person was to act");
                    self.emit(GameEvent::Abandoned);
                    return Ok(None);
                }
                self.prompt();
            }

            tokio::select! {
                Some(fired) = self.fired.recv() => self.handle_fired(fired),
                intent = input.recv(), if input_open => match intent {
                    Some(Intent::Quit) => {
                        self.scheduler.cancel();
                        info!("Session abandoned");
                        self.emit(GameEvent::Abandoned);
                        return Ok(None);
                    }
                    Some(intent) => self.handle_intent(intent),
                    None => input_open = false,
                },
            }
        }
    }

    /// Replaces the match with a fresh one, dropping any pending command.
    #[instrument(skip(self))]
    pub(crate) fn start_match(&mut self) {
        self.scheduler.cancel();
        let names = self.config.names().seat_names();
        self.game.start_named(*self.config.mode(), &names);
        self.prompted = false;
        info!(epoch = self.game.epoch(), "Match started");
        self.emit(GameEvent::Started {
            snapshot: self.game.snapshot(),
        });
    }

    /// Schedules the current seat's next request if it is automated.
    fn plan_next(&mut self) {
        if self.scheduler.is_pending() || !self.game.phase().is_in_progress() {
            return;
        }
        if !self.is_automated(self.game.current_turn()) {
            return;
        }
        if let Some((command, delay)) = self.autopilot.plan(&self.game) {
            self.scheduler.schedule(command, delay);
        }
    }

    /// Tells the console whose input is awaited, once per state.
    fn prompt(&mut self) {
        if self.prompted || !self.game.phase().is_in_progress() {
            return;
        }
        let seat = self.game.current_turn();
        self.prompted = true;
        self.emit(GameEvent::Prompt {
            seat,
            name: self.game.seat(seat).name().clone(),
            phase: self.game.phase(),
            legal: self.game.pending_moves(),
        });
    }

    #[instrument(skip(self), fields(epoch = self.game.epoch()))]
    pub(crate) fn handle_fired(&mut self, fired: Fired) {
        self.scheduler.settle(fired.ticket);
        if fired.command.epoch != self.game.epoch() {
            debug!(stale_epoch = fired.command.epoch, "Dropping command from an earlier match");
            return;
        }
        self.apply(fired.command.action);
    }

    #[instrument(skip(self))]
    pub(crate) fn handle_intent(&mut self, intent: Intent) {
        let seat = self.game.current_turn();
        match intent {
            Intent::NewMatch => self.start_match(),
            Intent::Quit => {}
            Intent::Roll | Intent::Move(_) if self.game.phase() == Phase::Idle => {
                self.reject("No match in progress".to_string());
            }
            Intent::Roll | Intent::Move(_) if self.is_automated(seat) => {
                let name = self.game.seat(seat).name().clone();
                self.reject(format!("It is {name}'s turn"));
            }
            Intent::Roll => self.apply(Action::Roll { seat }),
            Intent::Move(token) => self.apply(Action::Move { seat, token }),
        }
    }

    /// Makes one engine request and reports what happened.
    fn apply(&mut self, action: Action) {
        let seat = action.seat();
        let name = self.game.seat(seat).name().clone();
        let result = match action {
            Action::Roll { seat } => self.game.request_roll(seat).map(|outcome| {
                GameEvent::Rolled {
                    name: name.clone(),
                    outcome,
                    snapshot: self.game.snapshot(),
                }
            }),
            Action::Move { seat, token } => self.game.request_move(seat, token).map(|outcome| {
                GameEvent::Moved {
                    name: name.clone(),
                    outcome,
                    snapshot: self.game.snapshot(),
                }
            }),
        };

        match result {
            Ok(event) => {
                self.prompted = false;
                self.emit(event);
                if let Some(winner) = self.game.winner() {
                    info!(%winner, name = %name, "Match won");
                    self.emit(GameEvent::Won { winner, name });
                }
            }
            Err(e) => {
                warn!(error = %e, "Request refused");
                self.reject(e.to_string());
            }
        }
    }

    fn reject(&mut self, reason: String) {
        self.prompted = false;
        self.emit(GameEvent::Rejected { reason });
    }

    fn emit(&self, event: GameEvent) {
        if let Some(events) = &self.events {
            if events.send(event).is_err() {
                debug!("Renderer gone, event dropped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Command;
    use std::time::Duration;
    use strictly_ludo::{GameMode, RandomDice, ScriptedDice, TokenId};

    fn seat(i: usize) -> SeatIndex {
        SeatIndex::new(i).unwrap()
    }

    fn id(i: usize) -> TokenId {
        TokenId::new(i).unwrap()
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<GameEvent>) -> Vec<GameEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test(start_paused = true)]
    async fn test_autoplay_runs_to_a_winner() {
        let config = PlayConfig::default()
            .with_mode(GameMode::FourPlayerHuman)
            .with_seed(3)
            .with_autoplay(true);
        let mut orchestrator = Orchestrator::new(Match::with_dice(RandomDice::seeded(3)), config);
        let (_input_tx, input_rx) = mpsc::unbounded_channel();

        let winner = orchestrator.run(input_rx).await.unwrap().unwrap();
        assert!(orchestrator.game().is_finished(winner));
        assert_eq!(orchestrator.game().phase(), Phase::Won { winner });
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_command_is_dropped() {
        let mut orchestrator = Orchestrator::new(Match::new(), PlayConfig::default());
        orchestrator.start_match();
        orchestrator.start_match();
        assert_eq!(orchestrator.game().epoch(), 2);
        let before = orchestrator.game().snapshot();

        orchestrator.handle_fired(Fired {
            ticket: 42,
            command: Command::new(1, Action::Roll { seat: seat(0) }),
        });
        assert_eq!(orchestrator.game().snapshot(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_cancels_pending_command() {
        let config = PlayConfig::default().with_autoplay(true);
        let mut orchestrator = Orchestrator::new(Match::new(), config);
        orchestrator.start_match();
        orchestrator.plan_next();
        assert!(orchestrator.scheduler.is_pending());

        orchestrator.handle_intent(Intent::NewMatch);
        assert!(!orchestrator.scheduler.is_pending());
        assert_eq!(orchestrator.game().epoch(), 2);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(orchestrator.fired.try_recv().is_err());
        assert_eq!(orchestrator.game().phase(), Phase::AwaitingRoll);
        assert_eq!(orchestrator.game().current_roll(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_person_cannot_act_for_computer_seat() {
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let game = Match::with_dice(ScriptedDice::from_values([3]).unwrap());
        let mut orchestrator =
            Orchestrator::new(game, PlayConfig::default()).with_events(events_tx);
        orchestrator.start_match();

        // Nothing can leave the yard on a three, so the turn passes to Green.
        orchestrator.handle_intent(Intent::Roll);
        assert_eq!(orchestrator.game().current_turn(), seat(1));

        let before = orchestrator.game().snapshot();
        orchestrator.handle_intent(Intent::Roll);
        assert_eq!(orchestrator.game().snapshot(), before);

        let events = drain(&mut events_rx);
        assert!(matches!(
            events.last(),
            Some(GameEvent::Rejected { reason }) if reason == "It is CPU Green's turn"
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_console_session_until_quit() {
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let game = Match::with_dice(ScriptedDice::from_values([6, 3]).unwrap());
        let config = PlayConfig::default().with_mode(GameMode::FourPlayerHuman);
        let mut orchestrator = Orchestrator::new(game, config).with_events(events_tx);

        for intent in [
            Intent::Move(id(2)),
            Intent::Roll,
            Intent::Move(id(0)),
            Intent::Roll,
            Intent::Quit,
        ] {
            input_tx.send(intent).unwrap();
        }
        let result = orchestrator.run(input_rx).await.unwrap();
        assert_eq!(result, None);

        let game = orchestrator.game();
        assert_eq!(game.token(seat(0), id(0)).steps_moved(), 0);
        assert_eq!(game.phase(), Phase::AwaitingMove);
        assert_eq!(game.current_turn(), seat(0));

        let events = drain(&mut events_rx);
        assert!(matches!(events.first(), Some(GameEvent::Started { .. })));
        assert!(events.iter().any(|e| matches!(e, GameEvent::Rejected { .. })));
        assert_eq!(
            events.iter().filter(|e| matches!(e, GameEvent::Rolled { .. })).count(),
            2
        );
        assert!(events.iter().any(|e| matches!(e, GameEvent::Moved { .. })));
        assert!(matches!(events.last(), Some(GameEvent::Abandoned)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_input_abandons_when_a_person_must_act() {
        let (input_tx, input_rx) = mpsc::unbounded_channel::<Intent>();
        drop(input_tx);
        let mut orchestrator = Orchestrator::new(Match::new(), PlayConfig::default());
        assert_eq!(orchestrator.run(input_rx).await.unwrap(), None);
        assert_eq!(orchestrator.game().phase(), Phase::AwaitingRoll);
    }
}
