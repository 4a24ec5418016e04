//! Presenter that feeds the render loop and paces the battle.
//!
//! The runtime awaits every call, so sleeping here is what holds the next
//! event back until the current animation has played.
use std::time::Duration;

use async_trait::async_trait;
use battle_core::{Combatant, CritTier, LogTone, ProgressSnapshot, TimingTier};
use battle_runtime::Presenter;
use tokio::sync::mpsc;

/// One presentation instruction for the render loop.
#[derive(Clone, Debug, PartialEq)]
pub enum Cue {
    Log {
        message: String,
        tone: LogTone,
    },
    Stats {
        player_hp: u32,
        monster_hp: u32,
        monster_max_hp: u32,
    },
    Damage {
        target: Combatant,
        amount: u32,
        crit: CritTier,
    },
    Heal {
        target: Combatant,
        amount: u32,
    },
    LevelUp {
        level: u32,
    },
    Defeat {
        who: Combatant,
    },
    Input(bool),
    Timing(TimingTier),
    Progress(ProgressSnapshot),
    Round {
        round: u32,
        monster_max_hp: u32,
        damage_multiplier: f64,
    },
}

/// How long each animation holds the battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pacing {
    /// Attacker lunges toward the target.
    pub attack: Duration,
    /// Target recoils.
    pub hit: Duration,
    /// Attacker steps back.
    pub recover: Duration,
    pub heal: Duration,
    pub defeat: Duration,
}

impl Pacing {
    const ATTACK_MS: u64 = 520;
    const HIT_MS: u64 = 300;
    const RECOVER_MS: u64 = 260;
    const HEAL_MS: u64 = 520;
    const DEFEAT_MS: u64 = 1250;

    pub const INSTANT: Self = Self {
        attack: Duration::ZERO,
        hit: Duration::ZERO,
        recover: Duration::ZERO,
        heal: Duration::ZERO,
        defeat: Duration::ZERO,
    };

    /// Normal timings scaled by `percent` (100 is normal speed).
    pub fn scaled(percent: u32) -> Self {
        let scale = |ms: u64| Duration::from_millis(ms * u64::from(percent) / 100);
        Self {
            attack: scale(Self::ATTACK_MS),
            hit: scale(Self::HIT_MS),
            recover: scale(Self::RECOVER_MS),
            heal: scale(Self::HEAL_MS),
            defeat: scale(Self::DEFEAT_MS),
        }
    }

    /// Full attack animation: lunge, impact, and return.
    pub fn strike(&self) -> Duration {
        self.attack + self.hit + self.recover
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::scaled(100)
    }
}

/// Forwards every runtime report to the render loop as a [`Cue`].
pub struct TerminalPresenter {
    cues: mpsc::UnboundedSender<Cue>,
    pacing: Pacing,
}

impl TerminalPresenter {
    pub fn new(pacing: Pacing) -> (Self, mpsc::UnboundedReceiver<Cue>) {
        let (cues, rx) = mpsc::unbounded_channel();
        (Self { cues, pacing }, rx)
    }

    fn cue(&self, cue: Cue) {
        // Closed once the player quits; the turn still plays out.
        if self.cues.send(cue).is_err() {
            tracing::trace!("render loop closed, cue dropped");
        }
    }

    async fn hold(duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

#[async_trait]
impl Presenter for TerminalPresenter {
    async fn report_log(&self, message: &str, tone: LogTone) {
        self.cue(Cue::Log {
            message: message.to_owned(),
            tone,
        });
    }

    async fn report_stat_update(&self, player_hp: u32, monster_hp: u32, monster_max_hp: u32) {
        self.cue(Cue::Stats {
            player_hp,
            monster_hp,
            monster_max_hp,
        });
    }

    async fn report_damage(&self, target: Combatant, amount: u32, crit: CritTier) {
        self.cue(Cue::Damage {
            target,
            amount,
            crit,
        });
        Self::hold(self.pacing.strike()).await;
    }

    async fn report_heal(&self, target: Combatant, amount: u32) {
        self.cue(Cue::Heal { target, amount });
        Self::hold(self.pacing.heal).await;
    }

    async fn report_level_up(&self, level: u32) {
        self.cue(Cue::LevelUp { level });
    }

    async fn report_defeat(&self, who: Combatant) {
        self.cue(Cue::Defeat { who });
        Self::hold(self.pacing.defeat).await;
    }

    async fn set_input_enabled(&self, enabled: bool) {
        self.cue(Cue::Input(enabled));
    }

    async fn report_timing(&self, tier: TimingTier) {
        self.cue(Cue::Timing(tier));
    }

    async fn report_progress(&self, progress: ProgressSnapshot) {
        self.cue(Cue::Progress(progress));
    }

    async fn report_round(&self, round: u32, monster_max_hp: u32, damage_multiplier: f64) {
        self.cue(Cue::Round {
            round,
            monster_max_hp,
            damage_multiplier,
        });
    }
}
