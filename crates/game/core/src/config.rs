use crate::error::ConfigError;

/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleConfig {
    /// Length of the agility track in position units (pointer travel span).
    pub agility_span: u32,
    /// Distance the agility pointer travels per oscillator tick.
    pub agility_step: u32,
    /// Distance from the track center below which a sample is `Perfect`.
    pub perfect_window: u32,
    /// Distance from the track center below which a sample is `Good`.
    pub good_window: u32,
}

impl BattleConfig {
    // ===== fixed rules =====
    pub const PLAYER_MAX_HP: u32 = 100;
    pub const INITIAL_MONSTER_HP: u32 = 1000;
    /// Max HP added per monster tier; tier `n` has `n * MONSTER_TIER_HP`.
    pub const MONSTER_TIER_HP: u32 = 1000;
    /// Number of tiers before the max HP cycle repeats.
    pub const MONSTER_TIER_COUNT: u32 = 10;
    /// Damage multiplier at session start, in tenths.
    pub const INITIAL_DAMAGE_MULTIPLIER_TENTHS: u32 = 10;
    /// Damage multiplier increment per monster defeat, in tenths.
    pub const DAMAGE_MULTIPLIER_STEP_TENTHS: u32 = 1;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_AGILITY_SPAN: u32 = 400;
    pub const DEFAULT_AGILITY_STEP: u32 = 20;
    pub const DEFAULT_PERFECT_WINDOW: u32 = 25;
    pub const DEFAULT_GOOD_WINDOW: u32 = 75;

    pub fn new() -> Self {
        Self {
            agility_span: Self::DEFAULT_AGILITY_SPAN,
            agility_step: Self::DEFAULT_AGILITY_STEP,
            perfect_window: Self::DEFAULT_PERFECT_WINDOW,
            good_window: Self::DEFAULT_GOOD_WINDOW,
        }
    }

    pub fn with_agility_geometry(agility_span: u32, agility_step: u32) -> Self {
        Self {
            agility_span,
            agility_step,
            ..Self::new()
        }
    }

    /// Checks the tunable values for internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agility_span == 0 {
            return Err(ConfigError::EmptyAgilityTrack);
        }
        if self.agility_step == 0 {
            return Err(ConfigError::ZeroAgilityStep);
        }
        if self.perfect_window > self.good_window {
            return Err(ConfigError::TimingWindowsOutOfOrder {
                perfect: self.perfect_window,
                good: self.good_window,
            });
        }
        Ok(())
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
