//! Worker tasks that back the runtime orchestration.
//!
//! The battle worker owns the encounter and the agility meter and is the only
//! task that mutates either.

mod battle;

pub use battle::{BattleWorker, Command};
