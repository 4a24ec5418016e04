use crate::config::BattleConfig;
use crate::progression;

/// The player's combat and progression state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerState {
    /// Current hit points, always within `0..=PLAYER_MAX_HP`.
    pub hp: u32,
    /// Current level, starting at 1.
    pub level: u32,
    /// Experience toward the next level; always below `xp_cap(level)`.
    pub xp: u32,
}

impl PlayerState {
    pub const fn new() -> Self {
        Self {
            hp: BattleConfig::PLAYER_MAX_HP,
            level: 1,
            xp: 0,
        }
    }

    pub const fn is_defeated(&self) -> bool {
        self.hp == 0
    }

    pub const fn max_hp(&self) -> u32 {
        BattleConfig::PLAYER_MAX_HP
    }

    pub const fn xp_cap(&self) -> u32 {
        progression::xp_cap(self.level)
    }

    /// Subtracts `amount`, clamped at zero. Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_sub(amount);
        before - self.hp
    }

    /// Adds `amount`, clamped at max HP. Returns the HP actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max_hp());
        self.hp - before
    }

    /// Restores full HP after a defeat. Level and experience are kept.
    pub fn revive(&mut self) {
        self.hp = self.max_hp();
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}
