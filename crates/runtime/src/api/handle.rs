//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! playing turns, querying the session, and streaming runtime events.
use tokio::sync::{broadcast, mpsc, oneshot, watch};

use battle_core::PlayerAction;

use super::errors::{Result, RuntimeError};
use super::snapshot::{ActOutcome, AgilityView, BattleSnapshot};
use crate::events::{EventBus, RuntimeEvent};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
    agility_rx: watch::Receiver<AgilityView>,
}

impl RuntimeHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
        agility_rx: watch::Receiver<AgilityView>,
    ) -> Self {
        Self {
            command_tx,
            event_bus,
            agility_rx,
        }
    }

    /// Play one player turn and wait until it has been fully presented.
    ///
    /// Returns [`ActOutcome::Ignored`] if another turn was in progress when the
    /// action was queued.
    pub async fn act(&self, action: PlayerAction) -> Result<ActOutcome> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.send(Command::Act {
            action,
            reply: Some(reply_tx),
        })
        .await?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Queue an action without waiting for the turn to finish.
    ///
    /// Interactive frontends use this so their render loop keeps running
    /// while the turn plays out; the outcome arrives on [`Self::subscribe`].
    pub async fn submit(&self, action: PlayerAction) -> Result<()> {
        self.send(Command::Act {
            action,
            reply: None,
        })
        .await
    }

    /// Query the current session (read-only snapshot)
    pub async fn snapshot(&self) -> Result<BattleSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.send(Command::QuerySnapshot { reply: reply_tx })
            .await?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Advance the agility pointer by `ticks` steps (if it is running).
    ///
    /// Only needed when the runtime was built without an automatic tick
    /// period.
    pub async fn advance_meter(&self, ticks: u64) -> Result<()> {
        self.send(Command::AdvanceMeter { ticks }).await
    }

    /// Watch the agility pointer without going through the worker queue.
    ///
    /// Reading it never waits on a turn in progress, which makes it the right
    /// source for a render loop; [`Self::snapshot`] queues behind the turn.
    pub fn agility(&self) -> watch::Receiver<AgilityView> {
        self.agility_rx.clone()
    }

    /// Subscribe to runtime events
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let mut events = handle.subscribe();
    /// while let Ok(event) = events.recv().await {
    ///     if let RuntimeEvent::TurnCompleted { snapshot } = event {
    ///         // redraw
    ///     }
    /// }
    /// ```
    pub fn subscribe(&self) -> broadcast::Receiver<RuntimeEvent> {
        self.event_bus.subscribe()
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }
}
