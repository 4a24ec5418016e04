//! Error types for battle-core.
//!
//! Encounter resolution itself never fails: every value is derived from
//! bounded random draws and clamped arithmetic. The only fallible surface is
//! configuration, which is validated once when the runtime is assembled.

/// Invalid tunable configuration.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConfigError {
    #[error("agility track span must be greater than zero")]
    EmptyAgilityTrack,

    #[error("agility step must be greater than zero")]
    ZeroAgilityStep,

    #[error("perfect timing window ({perfect}) must not exceed good window ({good})")]
    TimingWindowsOutOfOrder { perfect: u32, good: u32 },
}
