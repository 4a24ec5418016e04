use crate::agility::TimingTier;
use crate::combat::CritTier;
use crate::progression::ProgressSnapshot;

/// One side of the encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Combatant {
    Player,
    Monster,
}

impl Combatant {
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Monster,
            Self::Monster => Self::Player,
        }
    }
}

/// Action requested by the player before the timing track is sampled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerAction {
    Attack,
    Heal,
}

/// Semantic color of a transcript line.
///
/// Frontends map these onto their palette; the core only says what kind of
/// line it is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogTone {
    /// Action announcements ("You attack!").
    Neutral,
    /// Uncritical player hit.
    PlayerHit,
    /// Uncritical monster hit.
    MonsterHit,
    /// Critical hit of the given tier.
    Crit(CritTier),
    /// Any heal.
    Heal,
    LevelUp,
    /// Timing feedback for the given tier.
    Timing(TimingTier),
    /// Defeats and round changes.
    Defeat,
}

/// Observable outcome of one state machine step.
///
/// Events are emitted in the order the presentation layer should show them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    Log {
        message: String,
        tone: LogTone,
    },
    Timing {
        tier: TimingTier,
    },
    Stats {
        player_hp: u32,
        monster_hp: u32,
        monster_max_hp: u32,
    },
    /// `amount` is the rolled damage; the HP fields show the clamped result.
    Damage {
        target: Combatant,
        amount: u32,
        crit: CritTier,
        hp_before: u32,
        hp_after: u32,
    },
    Heal {
        target: Combatant,
        amount: u32,
        hp_before: u32,
        hp_after: u32,
    },
    LevelUp {
        level: u32,
    },
    Progress(ProgressSnapshot),
    Defeated {
        who: Combatant,
    },
    RoundAdvanced {
        round: u32,
        monster_max_hp: u32,
        damage_multiplier: f64,
    },
}

impl BattleEvent {
    pub(crate) fn log(message: impl Into<String>, tone: LogTone) -> Self {
        Self::Log {
            message: message.into(),
            tone,
        }
    }

    pub fn is_log(&self) -> bool {
        matches!(self, Self::Log { .. })
    }
}
