//! Read-only views returned by the runtime.
use serde::{Deserialize, Serialize};

use battle_core::{AgilityMeter, Direction, EncounterState, Phase, TimingTier};

/// Position of the agility pointer at the time of the snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgilityView {
    pub position: u32,
    pub span: u32,
    pub direction: Direction,
    pub running: bool,
    /// Tier an attack would get right now.
    pub tier: TimingTier,
}

impl AgilityView {
    pub fn of(meter: &AgilityMeter) -> Self {
        let (position, direction) = meter.position();
        Self {
            position,
            span: meter.track().span(),
            direction,
            running: meter.is_running(),
            tier: meter.sample(),
        }
    }

    /// Pointer position as a fraction of the track, in `[0, 1]`.
    pub fn ratio(&self) -> f64 {
        self.position as f64 / self.span as f64
    }
}

/// Complete view of a battle session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub state: EncounterState,
    pub phase: Phase,
    pub agility: AgilityView,
    pub input_enabled: bool,
}

/// Reply to [`crate::RuntimeHandle::act`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ActOutcome {
    /// The turn ran to completion; the snapshot is taken after input was
    /// re-enabled.
    Completed(BattleSnapshot),
    /// The action arrived while a turn was in progress or a combatant was
    /// down, and was dropped.
    Ignored,
}

impl ActOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }

    pub fn snapshot(&self) -> Option<&BattleSnapshot> {
        match self {
            Self::Completed(snapshot) => Some(snapshot),
            Self::Ignored => None,
        }
    }
}
