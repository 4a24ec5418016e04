//! Combat resolution formulas.
//!
//! Pure functions computing damage and heal amounts from random rolls,
//! level bonuses, timing multipliers and crit multipliers. They never touch
//! encounter state; [`crate::engine::Encounter`] applies their results.
//!
//! # Core Functions
//!
//! - `roll_crit`: crit tier for one attack
//! - `player_attack_damage` / `player_heal_amount`
//! - `monster_base_damage` / `monster_attack_damage` / `monster_heal_amount`
//! - `choose_monster_action`: the monster's attack/heal coin flip

pub mod crit;
pub mod formula;

pub use crit::{CritTier, roll_crit};
pub use formula::{
    AttackRoll, MonsterAction, choose_monster_action, monster_attack_damage, monster_base_damage,
    monster_heal_amount, player_attack_damage, player_base_damage, player_heal_amount,
};
