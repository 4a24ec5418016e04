//! Encounter state machine.
//!
//! The [`Encounter`] is the authoritative reducer for [`EncounterState`]. A
//! player turn is driven in steps: [`Encounter::submit`] resolves the player's
//! intent, then [`Encounter::advance`] resolves the monster's reply and any
//! round transition until the machine is back in [`Phase::Idle`]. Splitting
//! the turn lets a presentation layer finish showing a defeat before the
//! next round is applied.
//!
//! ```text
//! Idle ──submit──▶ PlayerActing ─┬─▶ MonsterActing ──advance──┬─▶ Idle
//!                                └─▶ RoundTransition(Monster) │
//!                                    RoundTransition(Player) ◀┘
//! RoundTransition(_) ──advance──▶ Idle
//! ```
//!
//! `PlayerActing` is transient: `submit` resolves the player's action
//! immediately and reports the phase it leads to.

mod event;
mod transition;

pub use event::{BattleEvent, Combatant, LogTone, PlayerAction};

use crate::agility::TimingTier;
use crate::env::{PcgRng, RandomSource};
use crate::state::EncounterState;

/// Position of the encounter within a turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Waiting for the player.
    #[default]
    Idle,
    /// Resolving the player's action.
    PlayerActing,
    /// Monster reply pending.
    MonsterActing,
    /// `who` fell; the next round has not been set up yet.
    RoundTransition(Combatant),
}

impl Phase {
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// A player action with the timing tier already sampled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerIntent {
    Attack(TimingTier),
    Heal,
}

impl PlayerIntent {
    pub const fn action(self) -> PlayerAction {
        match self {
            Self::Attack(_) => PlayerAction::Attack,
            Self::Heal => PlayerAction::Heal,
        }
    }
}

/// Result of a single state machine step.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Step {
    /// The request was not valid in the current phase; nothing changed.
    Ignored,
    Resolved {
        events: Vec<BattleEvent>,
        next: Phase,
    },
}

impl Step {
    pub const fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }
}

/// Every event produced by one full player turn.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnReport {
    pub events: Vec<BattleEvent>,
    /// True when the turn was rejected by the guard.
    pub ignored: bool,
}

impl TurnReport {
    fn ignored() -> Self {
        Self {
            events: Vec::new(),
            ignored: true,
        }
    }

    /// Combatant who fell during the turn, if any.
    pub fn defeated(&self) -> Option<Combatant> {
        self.events.iter().find_map(|event| match event {
            BattleEvent::Defeated { who } => Some(*who),
            _ => None,
        })
    }

    /// Total rolled damage dealt to `target`.
    pub fn damage_to(&self, target: Combatant) -> u32 {
        self.events
            .iter()
            .filter_map(|event| match event {
                BattleEvent::Damage {
                    target: t, amount, ..
                } if *t == target => Some(*amount),
                _ => None,
            })
            .sum()
    }

    /// Levels reached during the turn, in order.
    pub fn level_ups(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|event| match event {
                BattleEvent::LevelUp { level } => Some(*level),
                _ => None,
            })
            .collect()
    }

    /// Transcript lines in order.
    pub fn log_lines(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|event| match event {
            BattleEvent::Log { message, .. } => Some(message.as_str()),
            _ => None,
        })
    }
}

/// Owns the encounter state and its random source.
#[derive(Clone, Debug)]
pub struct Encounter<R: RandomSource> {
    state: EncounterState,
    phase: Phase,
    rng: R,
}

impl Encounter<PcgRng> {
    /// Fresh encounter whose every roll is determined by `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(PcgRng::from_seed(seed))
    }
}

impl<R: RandomSource> Encounter<R> {
    pub fn new(rng: R) -> Self {
        Self::with_state(EncounterState::new(), rng)
    }

    /// Resumes from an existing state. If a combatant is already at 0 HP the
    /// encounter starts in the matching round transition.
    pub fn with_state(state: EncounterState, rng: R) -> Self {
        let phase = if state.player.is_defeated() {
            Phase::RoundTransition(Combatant::Player)
        } else if state.monster.is_defeated() {
            Phase::RoundTransition(Combatant::Monster)
        } else {
            Phase::Idle
        };
        Self { state, phase, rng }
    }

    pub fn state(&self) -> &EncounterState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether [`Self::submit`] would accept an intent right now.
    pub fn accepts_input(&self) -> bool {
        self.phase.is_idle() && !self.state.has_defeated_combatant()
    }

    /// Resolves the player's half of a turn.
    ///
    /// Returns [`Step::Ignored`] unless the encounter is idle with both
    /// combatants standing.
    pub fn submit(&mut self, intent: PlayerIntent) -> Step {
        if !self.accepts_input() {
            return Step::Ignored;
        }

        self.phase = Phase::PlayerActing;
        let mut events = Vec::new();
        match intent {
            PlayerIntent::Attack(tier) => {
                transition::player_attack(&mut self.state, &mut self.rng, tier, &mut events);
            }
            PlayerIntent::Heal => {
                transition::player_heal(&mut self.state, &mut self.rng, &mut events);
            }
        }

        // Healing never defeats the monster, so this only triggers on attacks.
        let next = if self.state.monster.is_defeated() {
            transition::defeat(Combatant::Monster, &mut events);
            Phase::RoundTransition(Combatant::Monster)
        } else {
            Phase::MonsterActing
        };
        self.resolve(events, next)
    }

    /// Resolves the pending monster reply or round transition.
    ///
    /// Returns [`Step::Ignored`] when idle.
    pub fn advance(&mut self) -> Step {
        let mut events = Vec::new();
        let next = match self.phase {
            Phase::Idle | Phase::PlayerActing => return Step::Ignored,
            Phase::MonsterActing => {
                transition::monster_turn(&mut self.state, &mut self.rng, &mut events);
                if self.state.player.is_defeated() {
                    transition::defeat(Combatant::Player, &mut events);
                    Phase::RoundTransition(Combatant::Player)
                } else {
                    Phase::Idle
                }
            }
            Phase::RoundTransition(who) => {
                transition::round_transition(&mut self.state, who, &mut events);
                Phase::Idle
            }
        };
        self.resolve(events, next)
    }

    /// Runs a whole turn synchronously: submit, then advance until idle.
    pub fn play_turn(&mut self, intent: PlayerIntent) -> TurnReport {
        let mut report = match self.submit(intent) {
            Step::Ignored => return TurnReport::ignored(),
            Step::Resolved { events, .. } => TurnReport {
                events,
                ignored: false,
            },
        };

        while let Step::Resolved { events, .. } = self.advance() {
            report.events.extend(events);
        }
        report
    }

    fn resolve(&mut self, events: Vec<BattleEvent>, next: Phase) -> Step {
        self.phase = next;
        Step::Resolved { events, next }
    }
}
