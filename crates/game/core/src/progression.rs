//! Player level and experience progression.
//!
//! Levels are grouped into three tiers (1–5, 6–10, 11+). Each tier fixes the
//! experience needed for the next level and the bonuses granted while in it.
//!
//! | Levels | XP cap | Bonus HP | Bonus ATK |
//! |--------|--------|----------|-----------|
//! | 1–5    | 10     | 20       | 5         |
//! | 6–10   | 20     | 50       | 15        |
//! | 11+    | 35     | 120      | 35        |

use crate::config::BattleConfig;
use crate::state::PlayerState;

/// Experience required to leave `level`.
pub const fn xp_cap(level: u32) -> u32 {
    match level {
        0..=5 => 10,
        6..=10 => 20,
        _ => 35,
    }
}

/// Hit points restored when reaching `level`.
pub const fn bonus_hp(level: u32) -> u32 {
    match level {
        0..=5 => 20,
        6..=10 => 50,
        _ => 120,
    }
}

/// Flat attack bonus added to every player attack roll at `level`.
pub const fn bonus_attack(level: u32) -> u32 {
    match level {
        0..=5 => 5,
        6..=10 => 15,
        _ => 35,
    }
}

/// Experience granted for dealing `damage` in one attack.
pub const fn xp_for_damage(damage: u32) -> u32 {
    damage / 5
}

/// A single level gained while applying experience.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelUp {
    pub level: u32,
    pub hp_before: u32,
    pub hp_after: u32,
}

/// Adds experience and rolls over into as many levels as it pays for.
///
/// Each level reached heals the player by that level's bonus HP, capped at
/// max HP. Returns the levels gained in order; empty when none.
pub fn apply_xp(player: &mut PlayerState, amount: u32) -> Vec<LevelUp> {
    player.xp = player.xp.saturating_add(amount);

    let mut gained = Vec::new();
    while player.xp >= xp_cap(player.level) {
        player.xp -= xp_cap(player.level);
        player.level += 1;

        let hp_before = player.hp;
        player.hp = (player.hp + bonus_hp(player.level)).min(BattleConfig::PLAYER_MAX_HP);

        gained.push(LevelUp {
            level: player.level,
            hp_before,
            hp_after: player.hp,
        });
    }
    gained
}

/// Stats panel view of the player's progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressSnapshot {
    pub level: u32,
    pub xp: u32,
    pub xp_cap: u32,
    pub bonus_attack: u32,
    pub bonus_hp: u32,
}

impl ProgressSnapshot {
    pub fn of(player: &PlayerState) -> Self {
        Self {
            level: player.level,
            xp: player.xp,
            xp_cap: xp_cap(player.level),
            bonus_attack: bonus_attack(player.level),
            bonus_hp: bonus_hp(player.level),
        }
    }
}
