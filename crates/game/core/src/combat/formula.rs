//! Damage and heal formulas.
//!
//! Every random term is a uniform draw over a half-open interval, floored.
//! Draw order matters for replays: a player attack consumes its base roll and
//! then its crit roll; a monster turn consumes its action choice, then either
//! its damage roll and crit roll or its heal roll.

use super::crit::{CritTier, roll_crit};
use crate::env::RandomSource;
use crate::progression::bonus_attack;

/// Floor applied to the monster's base damage for low tiers.
pub const MONSTER_MIN_BASE_DAMAGE: u32 = 6;

/// Damage dealt by a single attack together with its crit tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackRoll {
    pub damage: u32,
    pub crit: CritTier,
}

impl AttackRoll {
    fn with_crit(damage: u32, crit: CritTier) -> Self {
        Self {
            damage: crit.apply(damage),
            crit,
        }
    }
}

/// What the monster does on its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MonsterAction {
    Attack,
    Heal,
}

/// Player's pre-crit attack value: `10 + d10 + bonus_attack(level)`.
pub fn player_base_damage(rng: &mut impl RandomSource, level: u32) -> u32 {
    rng.roll_below(10) + 10 + bonus_attack(level)
}

/// Full player attack: base roll, timing multiplier, then crit.
pub fn player_attack_damage(
    rng: &mut impl RandomSource,
    level: u32,
    agility_multiplier: f64,
) -> AttackRoll {
    let base = player_base_damage(rng, level);
    let timed = (base as f64 * agility_multiplier).floor() as u32;
    AttackRoll::with_crit(timed, roll_crit(rng))
}

/// Player heal: `10 + d10 + floor(level * 1.5)`.
pub fn player_heal_amount(rng: &mut impl RandomSource, level: u32) -> u32 {
    rng.roll_below(10) + 10 + level * 3 / 2
}

/// Monster base damage for its current tier and accumulated multiplier.
pub fn monster_base_damage(max_hp: u32, damage_multiplier: f64) -> f64 {
    (max_hp / 100).max(MONSTER_MIN_BASE_DAMAGE) as f64 * damage_multiplier
}

/// Monster attack: uniform over `[base, 2 * base)`, floored, then crit.
pub fn monster_attack_damage(rng: &mut impl RandomSource, base: f64) -> AttackRoll {
    let damage = (rng.uniform(base) + base).floor() as u32;
    AttackRoll::with_crit(damage, roll_crit(rng))
}

/// Monster heal: `10 + d15 + round * 2`.
pub fn monster_heal_amount(rng: &mut impl RandomSource, round: u32) -> u32 {
    rng.roll_below(15) + 10 + round * 2
}

/// Coin flip between attacking and healing.
pub fn choose_monster_action(rng: &mut impl RandomSource) -> MonsterAction {
    if rng.chance(0.5) {
        MonsterAction::Attack
    } else {
        MonsterAction::Heal
    }
}
