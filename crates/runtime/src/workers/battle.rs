//! Battle worker that owns the authoritative [`Encounter`].
//!
//! Receives commands from [`crate::RuntimeHandle`], drives the encounter state
//! machine one turn at a time, and forwards every outcome to the
//! [`Presenter`] before publishing it as a [`RuntimeEvent`]. The agility meter
//! lives here too, so sampling and turn resolution never race.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, trace};

use battle_core::{
    AgilityMeter, BattleEvent, Encounter, PlayerAction, PlayerIntent, ProgressSnapshot,
    RandomSource, Step,
};

use crate::api::{ActOutcome, AgilityView, BattleSnapshot, Presenter};
use crate::events::{EventBus, RuntimeEvent};

/// Commands that can be sent to the battle worker
pub enum Command {
    /// Play one player turn. `reply` is `None` for fire-and-forget submits.
    Act {
        action: PlayerAction,
        reply: Option<oneshot::Sender<ActOutcome>>,
    },
    /// Advance the agility meter manually.
    AdvanceMeter { ticks: u64 },
    /// Query the current session (read-only).
    QuerySnapshot { reply: oneshot::Sender<BattleSnapshot> },
}

/// Background task that processes battle commands.
pub struct BattleWorker<R: RandomSource> {
    encounter: Encounter<R>,
    meter: AgilityMeter,
    input_enabled: bool,
    tick_period: Option<Duration>,
    presenter: Arc<dyn Presenter>,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    agility_tx: watch::Sender<AgilityView>,
}

impl<R: RandomSource + Send + Sync + 'static> BattleWorker<R> {
    /// Creates a new battle worker.
    pub fn new(
        encounter: Encounter<R>,
        meter: AgilityMeter,
        tick_period: Option<Duration>,
        presenter: Arc<dyn Presenter>,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        agility_tx: watch::Sender<AgilityView>,
    ) -> Self {
        Self {
            encounter,
            meter,
            input_enabled: false,
            tick_period,
            presenter,
            command_rx,
            event_bus,
            agility_tx,
        }
    }

    /// Main worker loop. Exits once every command sender is dropped.
    pub async fn run(mut self) {
        let mut ticker = self.tick_period.map(|period| {
            let mut interval = tokio::time::interval(period);
            // Ticks missed during a turn are not replayed once the meter resumes.
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });

        self.present_session_start().await;

        loop {
            tokio::select! {
                _ = next_tick(&mut ticker) => {
                    self.meter.tick();
                    self.publish_agility();
                }
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd).await,
                    None => break,
                },
            }
        }

        debug!(target: "battle_runtime::worker", "battle worker stopped");
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Act { action, reply } => {
                let outcome = self.play_turn(action).await;
                if let Some(reply) = reply {
                    let _ = reply.send(outcome);
                }
            }
            other => self.handle_query(other),
        }
    }

    /// Commands that never change the encounter.
    fn handle_query(&mut self, cmd: Command) {
        match cmd {
            Command::AdvanceMeter { ticks } => {
                self.meter.advance(ticks);
                self.publish_agility();
            }
            Command::QuerySnapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            Command::Act { action, reply } => self.ignore(action, reply),
        }
    }

    async fn present_session_start(&mut self) {
        // A state restored mid-defeat still owes its round transition.
        if !self.encounter.phase().is_idle() {
            debug!(
                target: "battle_runtime::worker",
                phase = ?self.encounter.phase(),
                "finishing pending transition before input opens"
            );
            let step = self.encounter.advance();
            self.play_out(step).await;
        }

        let state = *self.encounter.state();
        self.presenter
            .report_stat_update(state.player.hp, state.monster.hp, state.monster.max_hp)
            .await;
        self.presenter
            .report_progress(ProgressSnapshot::of(&state.player))
            .await;
        self.set_input(true).await;

        info!(
            target: "battle_runtime::worker",
            round = state.round,
            monster_hp = state.monster.hp,
            "battle session ready"
        );
    }

    async fn play_turn(&mut self, action: PlayerAction) -> ActOutcome {
        if !self.input_enabled || !self.encounter.accepts_input() {
            self.ignore(action, None);
            return ActOutcome::Ignored;
        }

        self.set_input(false).await;
        self.event_bus.publish(RuntimeEvent::TurnStarted { action });

        let intent = match action {
            PlayerAction::Attack => PlayerIntent::Attack(self.meter.sample()),
            PlayerAction::Heal => PlayerIntent::Heal,
        };
        debug!(
            target: "battle_runtime::worker",
            ?intent,
            round = self.encounter.state().round,
            "resolving player turn"
        );

        let step = self.encounter.submit(intent);
        self.play_out(step).await;

        self.discard_queued_actions();
        self.set_input(true).await;

        let snapshot = self.snapshot();
        self.event_bus.publish(RuntimeEvent::TurnCompleted {
            snapshot: Box::new(snapshot.clone()),
        });
        ActOutcome::Completed(snapshot)
    }

    /// Presents `step` and keeps advancing until the encounter is idle.
    async fn play_out(&mut self, mut step: Step) {
        loop {
            let Step::Resolved { events, next } = step else {
                break;
            };
            for event in events {
                self.present(&event).await;
                self.event_bus.publish(RuntimeEvent::Battle(event));
            }
            if next.is_idle() {
                break;
            }
            step = self.encounter.advance();
        }
    }

    /// Forwards one event to the presenter and waits for it to finish.
    async fn present(&self, event: &BattleEvent) {
        let presenter = &self.presenter;
        match event {
            BattleEvent::Log { message, tone } => presenter.report_log(message, *tone).await,
            BattleEvent::Timing { tier } => presenter.report_timing(*tier).await,
            BattleEvent::Stats {
                player_hp,
                monster_hp,
                monster_max_hp,
            } => {
                presenter
                    .report_stat_update(*player_hp, *monster_hp, *monster_max_hp)
                    .await
            }
            BattleEvent::Damage {
                target,
                amount,
                crit,
                ..
            } => presenter.report_damage(*target, *amount, *crit).await,
            BattleEvent::Heal { target, amount, .. } => {
                presenter.report_heal(*target, *amount).await
            }
            BattleEvent::LevelUp { level } => presenter.report_level_up(*level).await,
            BattleEvent::Progress(progress) => presenter.report_progress(*progress).await,
            BattleEvent::Defeated { who } => {
                info!(target: "battle_runtime::worker", %who, "combatant defeated");
                presenter.report_defeat(*who).await
            }
            BattleEvent::RoundAdvanced {
                round,
                monster_max_hp,
                damage_multiplier,
            } => {
                info!(
                    target: "battle_runtime::worker",
                    round,
                    monster_max_hp,
                    damage_multiplier,
                    "round advanced"
                );
                presenter
                    .report_round(*round, *monster_max_hp, *damage_multiplier)
                    .await
            }
        }
    }

    /// Answers every action that queued up while the turn was playing.
    ///
    /// Other commands in the queue are served in order.
    fn discard_queued_actions(&mut self) {
        while let Ok(cmd) = self.command_rx.try_recv() {
            self.handle_query(cmd);
        }
    }

    fn ignore(&self, action: PlayerAction, reply: Option<oneshot::Sender<ActOutcome>>) {
        trace!(
            target: "battle_runtime::worker",
            %action,
            phase = ?self.encounter.phase(),
            "action ignored"
        );
        self.event_bus
            .publish(RuntimeEvent::ActionIgnored { action });
        if let Some(reply) = reply {
            let _ = reply.send(ActOutcome::Ignored);
        }
    }

    async fn set_input(&mut self, enabled: bool) {
        self.input_enabled = enabled;
        if enabled {
            self.meter.resume();
        } else {
            self.meter.pause();
        }
        self.publish_agility();
        self.presenter.set_input_enabled(enabled).await;
    }

    /// Latest pointer position for renderers that poll every frame.
    fn publish_agility(&self) {
        self.agility_tx.send_replace(AgilityView::of(&self.meter));
    }

    fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            state: *self.encounter.state(),
            phase: self.encounter.phase(),
            agility: AgilityView::of(&self.meter),
            input_enabled: self.input_enabled,
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
