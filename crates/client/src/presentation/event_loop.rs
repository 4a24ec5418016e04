//! Pumps presenter cues, runtime events, user input, and rendering.
use std::time::Instant;

use anyhow::Result;
use battle_core::AgilityTrack;
use battle_runtime::{AgilityView, RuntimeEvent, RuntimeHandle};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tokio::sync::broadcast::error::RecvError;
use tokio::{
    sync::{broadcast, mpsc, watch},
    time::{self, Duration, MissedTickBehavior},
};

use super::{
    presenter::Cue,
    terminal::Tui,
    ui::{self, RenderContext},
    view::ViewState,
};
use crate::input::{self, KeyAction};
use crate::message::{MessageEntry, MessageLog};

const FRAME_INTERVAL_MS: u64 = 16;
const MESSAGE_PANEL_HEIGHT: u16 = 8;

pub struct EventLoop {
    handle: RuntimeHandle,
    event_rx: broadcast::Receiver<RuntimeEvent>,
    cue_rx: mpsc::UnboundedReceiver<Cue>,
    agility: watch::Receiver<AgilityView>,
    track: AgilityTrack,
    seed: u64,
    view: ViewState,
    messages: MessageLog,
}

impl EventLoop {
    pub fn new(
        handle: RuntimeHandle,
        cue_rx: mpsc::UnboundedReceiver<Cue>,
        track: AgilityTrack,
        seed: u64,
        view: ViewState,
        messages: MessageLog,
    ) -> Self {
        Self {
            event_rx: handle.subscribe(),
            agility: handle.agility(),
            handle,
            cue_rx,
            track,
            seed,
            view,
            messages,
        }
    }

    pub async fn run(mut self, terminal: &mut Tui) -> Result<()> {
        let mut frames = time::interval(Duration::from_millis(FRAME_INTERVAL_MS));
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                cue = self.cue_rx.recv() => match cue {
                    Some(cue) => self.apply_cue(cue),
                    None => {
                        tracing::warn!("Presenter dropped");
                        break;
                    }
                },
                result = self.event_rx.recv() => {
                    if self.handle_runtime_channel(result) {
                        break;
                    }
                }
                _ = frames.tick() => {
                    if self.handle_input_tick().await? {
                        break;
                    }
                    self.render(terminal)?;
                }
            }
        }

        Ok(())
    }

    fn apply_cue(&mut self, cue: Cue) {
        if let Cue::Log { message, tone } = &cue {
            self.messages.push(MessageEntry::new(message.clone(), *tone));
        }
        self.view.apply(&cue, Instant::now());
    }

    /// Returns `true` once the runtime is gone.
    fn handle_runtime_channel(&mut self, result: Result<RuntimeEvent, RecvError>) -> bool {
        match result {
            Ok(event) => {
                match &event {
                    RuntimeEvent::ActionIgnored { action } => {
                        tracing::debug!(%action, "Action ignored by runtime");
                    }
                    RuntimeEvent::TurnCompleted { snapshot } => {
                        tracing::debug!(
                            round = snapshot.state.round,
                            player_hp = snapshot.state.player.hp,
                            monster_hp = snapshot.state.monster.hp,
                            "Turn completed"
                        );
                    }
                    _ => {}
                }
                if let Ok(json) = event.to_json() {
                    tracing::trace!(target: "battle_client::events", "{json}");
                }
                false
            }
            Err(RecvError::Closed) => {
                tracing::warn!("Event stream closed");
                true
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("Dropped {} stale events", skipped);
                false
            }
        }
    }

    /// Drains pending terminal events. Returns `true` when the player quits.
    async fn handle_input_tick(&mut self) -> Result<bool> {
        while event::poll(Duration::from_millis(0))? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind == KeyEventKind::Press && self.handle_key_press(key).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn handle_key_press(&mut self, key: KeyEvent) -> Result<bool> {
        match input::handle_key(key) {
            KeyAction::Quit => {
                tracing::info!("Player left the battle");
                Ok(true)
            }
            KeyAction::Submit(action) => {
                if !self.view.input_enabled {
                    tracing::trace!(%action, "Key ignored while input is disabled");
                    return Ok(false);
                }
                // Key repeat must not queue a second turn before the cue lands.
                self.view.input_enabled = false;
                self.handle.submit(action).await?;
                Ok(false)
            }
            KeyAction::None => Ok(false),
        }
    }

    fn render(&mut self, terminal: &mut Tui) -> Result<()> {
        let now = Instant::now();
        self.view.agility = Some(*self.agility.borrow_and_update());
        self.view.prune(now);

        let ctx = RenderContext {
            view: &self.view,
            messages: &self.messages,
            track: &self.track,
            seed: self.seed,
            message_panel_height: MESSAGE_PANEL_HEIGHT,
            now,
        };
        ui::render(terminal, &ctx)
    }
}
