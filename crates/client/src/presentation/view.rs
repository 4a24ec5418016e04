//! Everything the renderer draws, updated from presenter cues.
//!
//! Animations are plain deadlines compared against the frame's `now`, so the
//! state stays testable without a terminal.
use std::time::{Duration, Instant};

use battle_core::{Combatant, CritTier, EncounterState, ProgressSnapshot, TimingTier};
use battle_runtime::AgilityView;

use super::presenter::{Cue, Pacing};

const FLOATER_LIFETIME: Duration = Duration::from_secs(1);
const TIMING_FEEDBACK: Duration = Duration::from_secs(1);
const LEVEL_UP_FLASH: Duration = Duration::from_millis(150);
const HEAVY_SHAKE: Duration = Duration::from_millis(500);
const LIGHT_SHAKE: Duration = Duration::from_millis(220);
const LIGHT_SHAKE_INTENSITY: f64 = 0.6;
const MAX_SHAKE_INTENSITY: f64 = 2.0;
/// Half-period of the shake wobble.
const SHAKE_FLIP: Duration = Duration::from_millis(40);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloaterKind {
    Damage(CritTier),
    Heal,
}

/// Damage or heal number drifting above a combatant.
#[derive(Clone, Debug, PartialEq)]
pub struct Floater {
    pub target: Combatant,
    pub text: String,
    pub kind: FloaterKind,
    pub born: Instant,
}

impl Floater {
    /// Progress through its lifetime in `[0, 1]`.
    pub fn age(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.born).as_secs_f64() / FLOATER_LIFETIME.as_secs_f64()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shake {
    pub intensity: f64,
    pub started: Instant,
    pub until: Instant,
}

/// An effect that lasts until a deadline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timed<T> {
    pub value: T,
    pub until: Instant,
}

impl<T> Timed<T> {
    fn new(value: T, now: Instant, duration: Duration) -> Self {
        Self {
            value,
            until: now + duration,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ViewState {
    pub player_hp: u32,
    pub player_max_hp: u32,
    pub monster_hp: u32,
    pub monster_max_hp: u32,
    pub progress: ProgressSnapshot,
    pub round: u32,
    pub damage_multiplier: f64,
    pub input_enabled: bool,
    pub agility: Option<AgilityView>,
    pub timing: Option<Timed<TimingTier>>,
    /// Attacker mid-lunge.
    pub lunge: Option<Timed<Combatant>>,
    pub fallen: Option<Timed<Combatant>>,
    floaters: Vec<Floater>,
    shake: Option<Shake>,
    flash_until: Option<Instant>,
    pacing: Pacing,
}

impl ViewState {
    pub fn new(pacing: Pacing) -> Self {
        let state = EncounterState::new();
        Self {
            player_hp: state.player.hp,
            player_max_hp: state.player.max_hp(),
            monster_hp: state.monster.hp,
            monster_max_hp: state.monster.max_hp,
            progress: ProgressSnapshot::of(&state.player),
            round: state.round,
            damage_multiplier: state.monster.damage_multiplier(),
            input_enabled: false,
            agility: None,
            timing: None,
            lunge: None,
            fallen: None,
            floaters: Vec::new(),
            shake: None,
            flash_until: None,
            pacing,
        }
    }

    /// Applies a presenter cue. Log lines are handled by the message log.
    pub fn apply(&mut self, cue: &Cue, now: Instant) {
        match cue {
            Cue::Log { .. } => {}
            Cue::Stats {
                player_hp,
                monster_hp,
                monster_max_hp,
            } => {
                self.player_hp = *player_hp;
                self.monster_hp = *monster_hp;
                self.monster_max_hp = *monster_max_hp;
            }
            Cue::Damage {
                target,
                amount,
                crit,
            } => {
                let text = if crit.is_crit() {
                    format!("-{amount} {crit}!")
                } else {
                    format!("-{amount}")
                };
                self.float(*target, text, FloaterKind::Damage(*crit), now);
                self.lunge = Some(Timed::new(target.opponent(), now, self.pacing.attack));
                self.impact(*amount, crit.is_crit(), now);
            }
            Cue::Heal { target, amount } => {
                self.float(*target, format!("+{amount}"), FloaterKind::Heal, now);
            }
            Cue::LevelUp { .. } => {
                self.flash_until = Some(now + LEVEL_UP_FLASH);
            }
            Cue::Defeat { who } => {
                self.fallen = Some(Timed::new(*who, now, self.pacing.defeat));
            }
            Cue::Input(enabled) => self.input_enabled = *enabled,
            Cue::Timing(tier) => {
                self.timing = Some(Timed::new(*tier, now, TIMING_FEEDBACK));
            }
            Cue::Progress(progress) => self.progress = *progress,
            Cue::Round {
                round,
                monster_max_hp,
                damage_multiplier,
            } => {
                self.round = *round;
                self.monster_max_hp = *monster_max_hp;
                self.damage_multiplier = *damage_multiplier;
                self.fallen = None;
            }
        }
    }

    fn float(&mut self, target: Combatant, text: String, kind: FloaterKind, now: Instant) {
        self.floaters.push(Floater {
            target,
            text,
            kind,
            born: now,
        });
    }

    fn impact(&mut self, amount: u32, crit: bool, now: Instant) {
        let (intensity, duration) = if crit || amount > 20 {
            (
                (f64::from(amount) / 50.0).min(MAX_SHAKE_INTENSITY),
                HEAVY_SHAKE,
            )
        } else if amount > 8 {
            (LIGHT_SHAKE_INTENSITY, LIGHT_SHAKE)
        } else {
            return;
        };
        self.shake = Some(Shake {
            intensity,
            started: now,
            until: now + duration,
        });
    }

    /// Drops every effect whose time is up.
    pub fn prune(&mut self, now: Instant) {
        self.floaters.retain(|f| f.age(now) < 1.0);
        if self.shake.is_some_and(|s| now >= s.until) {
            self.shake = None;
        }
        if self.flash_until.is_some_and(|until| now >= until) {
            self.flash_until = None;
        }
        expire(&mut self.timing, now);
        expire(&mut self.lunge, now);
        expire(&mut self.fallen, now);
    }

    pub fn floaters_for(&self, target: Combatant) -> impl Iterator<Item = &Floater> {
        self.floaters.iter().filter(move |f| f.target == target)
    }

    pub fn shake(&self) -> Option<Shake> {
        self.shake
    }

    /// Horizontal offset of the arena in cells.
    pub fn shake_offset(&self, now: Instant) -> i16 {
        let Some(shake) = self.shake.filter(|s| now < s.until) else {
            return 0;
        };
        let amplitude = (shake.intensity * 2.0).round().max(1.0) as i16;
        let flips = now.saturating_duration_since(shake.started).as_millis() / SHAKE_FLIP.as_millis();
        if flips % 2 == 0 { amplitude } else { -amplitude }
    }

    pub fn is_flashing(&self, now: Instant) -> bool {
        self.flash_until.is_some_and(|until| now < until)
    }

    pub fn is_lunging(&self, who: Combatant, now: Instant) -> bool {
        self.lunge.is_some_and(|l| l.value == who && now < l.until)
    }

    pub fn is_fallen(&self, who: Combatant) -> bool {
        self.fallen.is_some_and(|f| f.value == who) || self.hp(who) == 0
    }

    pub fn hp(&self, who: Combatant) -> u32 {
        match who {
            Combatant::Player => self.player_hp,
            Combatant::Monster => self.monster_hp,
        }
    }

    pub fn max_hp(&self, who: Combatant) -> u32 {
        match who {
            Combatant::Player => self.player_max_hp,
            Combatant::Monster => self.monster_max_hp,
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(Pacing::default())
    }
}

fn expire<T>(slot: &mut Option<Timed<T>>, now: Instant) {
    if slot.as_ref().is_some_and(|t| now >= t.until) {
        *slot = None;
    }
}
