//! Authoritative encounter state.
//!
//! Runtime layers clone or borrow this state but mutate it exclusively
//! through [`crate::engine::Encounter`].
mod monster;
mod player;

pub use monster::{MonsterState, monster_max_hp};
pub use player::PlayerState;

use crate::engine::Combatant;

/// Canonical snapshot of one battle session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterState {
    /// Round counter, starting at 1. Advances whenever either side falls.
    pub round: u32,
    pub player: PlayerState,
    pub monster: MonsterState,
}

impl EncounterState {
    pub const fn new() -> Self {
        Self {
            round: 1,
            player: PlayerState::new(),
            monster: MonsterState::new(),
        }
    }

    /// True once either side is at 0 HP and the round has not advanced yet.
    pub const fn has_defeated_combatant(&self) -> bool {
        self.player.is_defeated() || self.monster.is_defeated()
    }

    pub const fn hp_of(&self, who: Combatant) -> u32 {
        match who {
            Combatant::Player => self.player.hp,
            Combatant::Monster => self.monster.hp,
        }
    }

    pub const fn max_hp_of(&self, who: Combatant) -> u32 {
        match who {
            Combatant::Player => self.player.max_hp(),
            Combatant::Monster => self.monster.max_hp,
        }
    }

    /// Starts the next round after `defeated` fell.
    ///
    /// The round counter is shared: it advances on player defeats too, and
    /// the monster tier is keyed off it the next time the monster falls.
    pub fn advance_round(&mut self, defeated: Combatant) {
        self.round += 1;
        match defeated {
            Combatant::Player => self.player.revive(),
            Combatant::Monster => self.monster.respawn(self.round),
        }
    }
}

impl Default for EncounterState {
    fn default() -> Self {
        Self::new()
    }
}
