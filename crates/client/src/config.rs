//! Client configuration read from the environment.
use std::env;
use std::time::Duration;

use battle_core::BattleConfig;
use battle_runtime::RuntimeConfig;

use crate::presentation::Pacing;

/// Settings for one client session.
///
/// Every field has a default, so an empty environment yields a playable
/// session with a random seed.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Fixed RNG seed for a reproducible session.
    pub seed: Option<u64>,
    /// Period of the agility pointer.
    pub agility_tick: Duration,
    pub agility_span: u32,
    pub agility_step: u32,
    /// Lines kept in the message log.
    pub message_capacity: usize,
    /// Animation pacing as a percentage of the normal speed. `0` disables it.
    pub pacing_percent: u32,
    /// Play this many turns headless instead of opening the TUI.
    pub autoplay_turns: Option<u32>,
    /// Log directory name; a timestamped one is generated when unset.
    pub session_id: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            seed: None,
            agility_tick: RuntimeConfig::DEFAULT_AGILITY_TICK,
            agility_span: BattleConfig::DEFAULT_AGILITY_SPAN,
            agility_step: BattleConfig::DEFAULT_AGILITY_STEP,
            message_capacity: Self::DEFAULT_MESSAGE_CAPACITY,
            pacing_percent: 100,
            autoplay_turns: None,
            session_id: None,
        }
    }
}

impl ClientConfig {
    pub const DEFAULT_MESSAGE_CAPACITY: usize = 200;

    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_SEED` - RNG seed (default: random)
    /// - `AGILITY_TICK_MS` - pointer period in milliseconds (default: 16)
    /// - `AGILITY_SPAN` - track width (default: 400)
    /// - `AGILITY_STEP` - pointer step per tick (default: 20)
    /// - `MESSAGE_CAPACITY` - message log size (default: 200)
    /// - `PACING_PERCENT` - animation speed, 0 for none (default: 100)
    /// - `BATTLE_AUTOPLAY` - number of headless turns (default: interactive)
    /// - `BATTLE_SESSION_ID` - log directory name
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).map(|value| value.trim().to_owned());
        let mut config = Self::default();

        if let Some(seed) = read("BATTLE_SEED").and_then(|v| v.parse().ok()) {
            config.seed = Some(seed);
        }
        if let Some(ms) = read("AGILITY_TICK_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
        {
            config.agility_tick = Duration::from_millis(ms);
        }
        if let Some(span) = read("AGILITY_SPAN").and_then(|v| v.parse().ok()) {
            config.agility_span = span;
        }
        if let Some(step) = read("AGILITY_STEP").and_then(|v| v.parse().ok()) {
            config.agility_step = step;
        }
        if let Some(capacity) = read("MESSAGE_CAPACITY").and_then(|v| v.parse::<usize>().ok()) {
            config.message_capacity = capacity.max(1);
        }
        if let Some(percent) = read("PACING_PERCENT").and_then(|v| v.parse().ok()) {
            config.pacing_percent = percent;
        }
        if let Some(turns) = read("BATTLE_AUTOPLAY").and_then(|v| v.parse::<u32>().ok()) {
            config.autoplay_turns = (turns > 0).then_some(turns);
        }
        if let Some(session) = read("BATTLE_SESSION_ID").filter(|v| !v.is_empty()) {
            config.session_id = Some(session);
        }

        config
    }

    pub fn is_headless(&self) -> bool {
        self.autoplay_turns.is_some()
    }

    pub fn battle_config(&self) -> BattleConfig {
        BattleConfig::with_agility_geometry(self.agility_span, self.agility_step)
    }

    /// Runtime settings for the interactive frontend.
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            battle: self.battle_config(),
            seed: self.seed,
            agility_tick: Some(self.agility_tick),
            ..RuntimeConfig::default()
        }
    }

    pub fn pacing(&self) -> Pacing {
        Pacing::scaled(self.pacing_percent)
    }
}
