use crate::config::BattleConfig;

/// Max HP of the monster fielded in `round`.
///
/// Tiers cycle through `1000, 2000, ..., 10000` and then start over, so
/// round 11 fields a 1000 HP monster again.
pub const fn monster_max_hp(round: u32) -> u32 {
    let tier = (round.saturating_sub(1) % BattleConfig::MONSTER_TIER_COUNT) + 1;
    tier * BattleConfig::MONSTER_TIER_HP
}

/// The monster's combat state.
///
/// The damage multiplier is stored in tenths so that repeated `+0.1`
/// increments stay exact over arbitrarily long sessions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterState {
    /// Current hit points, always within `0..=max_hp`.
    pub hp: u32,
    /// Max hit points for the current tier.
    pub max_hp: u32,
    damage_multiplier_tenths: u32,
}

impl MonsterState {
    pub const fn new() -> Self {
        Self {
            hp: BattleConfig::INITIAL_MONSTER_HP,
            max_hp: BattleConfig::INITIAL_MONSTER_HP,
            damage_multiplier_tenths: BattleConfig::INITIAL_DAMAGE_MULTIPLIER_TENTHS,
        }
    }

    /// Builds a monster at full HP with an explicit multiplier (in tenths).
    pub const fn with_multiplier_tenths(max_hp: u32, damage_multiplier_tenths: u32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            damage_multiplier_tenths,
        }
    }

    pub const fn is_defeated(&self) -> bool {
        self.hp == 0
    }

    pub fn damage_multiplier(&self) -> f64 {
        self.damage_multiplier_tenths as f64 / 10.0
    }

    pub const fn damage_multiplier_tenths(&self) -> u32 {
        self.damage_multiplier_tenths
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
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
        self.hp - before
    }

    /// Replaces the defeated monster with the tier for `round`.
    ///
    /// The damage multiplier carries over and grows by one step.
    pub fn respawn(&mut self, round: u32) {
        self.max_hp = monster_max_hp(round);
        self.hp = self.max_hp;
        self.damage_multiplier_tenths += BattleConfig::DAMAGE_MULTIPLIER_STEP_TENTHS;
    }
}

impl Default for MonsterState {
    fn default() -> Self {
        Self::new()
    }
}
