//! Deterministic battle rules shared across clients.
//!
//! `battle-core` defines the canonical rules of a boss encounter (progression,
//! combat formulas, the agility timing track and the encounter state machine)
//! and exposes pure, synchronous APIs that can be reused by the runtime and by
//! offline tools. All state mutation flows through [`engine::Encounter`].
pub mod agility;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod progression;
pub mod state;

pub use agility::{AgilityMeter, AgilityTrack, Direction, TimingTier};
pub use combat::{AttackRoll, CritTier, MonsterAction};
pub use config::BattleConfig;
pub use engine::{
    BattleEvent, Combatant, Encounter, LogTone, Phase, PlayerAction, PlayerIntent, Step,
    TurnReport,
};
pub use env::{PcgRng, RandomSource, ScriptedRng};
pub use error::ConfigError;
pub use progression::{LevelUp, ProgressSnapshot};
pub use state::{EncounterState, MonsterState, PlayerState};
