//! Broadcast events for runtime observers.
//!
//! Every battle event forwarded to the presenter is also published here, so
//! loggers, replays and tests can follow a session without implementing
//! [`crate::Presenter`].

mod bus;

pub use bus::EventBus;

use serde::{Deserialize, Serialize};

use battle_core::{BattleEvent, PlayerAction};

use crate::api::BattleSnapshot;

/// Runtime-level notifications, in the order they happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RuntimeEvent {
    /// Input was disabled and the action is being resolved.
    TurnStarted { action: PlayerAction },

    /// One outcome of the current turn, after the presenter finished showing it.
    Battle(BattleEvent),

    /// An action was dropped because a turn was in progress or a combatant
    /// was down.
    ActionIgnored { action: PlayerAction },

    /// The turn is over and input is enabled again.
    TurnCompleted { snapshot: Box<BattleSnapshot> },
}

impl RuntimeEvent {
    /// JSON form for structured logs.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
