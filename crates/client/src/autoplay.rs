//! Headless session driven by a fixed policy.
//!
//! Useful for replaying a seed, soak-testing the runtime, and eyeballing the
//! transcript without a terminal UI. The agility meter runs on a manual clock
//! so the same seed always produces the same battle.
use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use battle_core::{
    BattleEvent, Combatant, CritTier, EncounterState, LogTone, PlayerAction, TimingTier,
};
use battle_runtime::{ActOutcome, Presenter, Runtime, RuntimeEvent, RuntimeHandle};
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::config::ClientConfig;

/// Heal when the player drops below this many hit points.
pub const HEAL_BELOW: u32 = 40;

/// Meter ticks between attacks. Coprime with the default period so the
/// pointer visits every position.
pub const METER_STRIDE: u64 = 7;

/// Prints the battle log to stdout.
pub struct TranscriptPresenter;

#[async_trait]
impl Presenter for TranscriptPresenter {
    async fn report_log(&self, message: &str, _tone: LogTone) {
        println!("{message}");
    }

    async fn report_stat_update(&self, _player_hp: u32, _monster_hp: u32, _monster_max_hp: u32) {}

    async fn report_damage(&self, _target: Combatant, _amount: u32, _crit: CritTier) {}

    async fn report_heal(&self, _target: Combatant, _amount: u32) {}

    async fn report_level_up(&self, _level: u32) {}

    async fn report_defeat(&self, _who: Combatant) {}

    async fn set_input_enabled(&self, _enabled: bool) {}
}

pub fn choose_action(state: &EncounterState) -> PlayerAction {
    if state.player.hp < HEAL_BELOW {
        PlayerAction::Heal
    } else {
        PlayerAction::Attack
    }
}

/// Totals collected from the battle events of a session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub turns: u32,
    pub ignored: u32,
    pub final_round: u32,
    pub final_level: u32,
    pub monsters_defeated: u32,
    pub player_defeats: u32,
    pub damage_dealt: u64,
    pub damage_taken: u64,
    pub player_heals: u32,
    pub monster_heals: u32,
    pub crits: u32,
    pub perfect: u32,
    pub good: u32,
    pub bad: u32,
}

impl SessionSummary {
    pub fn record(&mut self, event: &BattleEvent) {
        match event {
            BattleEvent::Timing { tier } => match tier {
                TimingTier::Perfect => self.perfect += 1,
                TimingTier::Good => self.good += 1,
                TimingTier::Bad => self.bad += 1,
            },
            BattleEvent::Damage {
                target,
                amount,
                crit,
                ..
            } => {
                match target {
                    Combatant::Monster => self.damage_dealt += u64::from(*amount),
                    Combatant::Player => self.damage_taken += u64::from(*amount),
                }
                if crit.is_crit() {
                    self.crits += 1;
                }
            }
            BattleEvent::Heal { target, .. } => match target {
                Combatant::Player => self.player_heals += 1,
                Combatant::Monster => self.monster_heals += 1,
            },
            BattleEvent::Defeated { who } => match who {
                Combatant::Monster => self.monsters_defeated += 1,
                Combatant::Player => self.player_defeats += 1,
            },
            BattleEvent::Progress(progress) => self.final_level = progress.level,
            BattleEvent::RoundAdvanced { round, .. } => self.final_round = *round,
            BattleEvent::Log { .. } | BattleEvent::Stats { .. } | BattleEvent::LevelUp { .. } => {}
        }
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Session summary ===")?;
        writeln!(f, "Turns played:      {} ({} ignored)", self.turns, self.ignored)?;
        writeln!(f, "Round reached:     {}", self.final_round)?;
        writeln!(f, "Player level:      {}", self.final_level)?;
        writeln!(
            f,
            "Defeats:           {} monsters, {} player",
            self.monsters_defeated, self.player_defeats
        )?;
        writeln!(
            f,
            "Damage:            {} dealt, {} taken ({} crits)",
            self.damage_dealt, self.damage_taken, self.crits
        )?;
        writeln!(
            f,
            "Heals:             {} player, {} monster",
            self.player_heals, self.monster_heals
        )?;
        write!(
            f,
            "Timing:            {} perfect, {} good, {} bad",
            self.perfect, self.good, self.bad
        )
    }
}

pub async fn run(config: &ClientConfig, turns: u32) -> Result<()> {
    let mut runtime_config = config.runtime_config();
    runtime_config.agility_tick = None;

    let runtime = Runtime::builder()
        .config(runtime_config)
        .presenter(TranscriptPresenter)
        .build()
        .await?;
    tracing::info!(seed = runtime.seed(), turns, "Starting autoplay");

    let handle = runtime.handle();
    let summary = play(&handle, turns).await?;
    drop(handle);

    println!();
    println!("{summary}");
    println!("Seed:              {}", runtime.seed());

    runtime.shutdown().await?;
    Ok(())
}

/// Plays `turns` turns and tallies what happened.
pub async fn play(handle: &RuntimeHandle, turns: u32) -> Result<SessionSummary> {
    let mut events = handle.subscribe();
    let mut state = handle.snapshot().await?.state;
    let mut summary = SessionSummary {
        final_round: state.round,
        final_level: state.player.level,
        ..SessionSummary::default()
    };

    for _ in 0..turns {
        let action = choose_action(&state);
        if action == PlayerAction::Attack {
            handle.advance_meter(METER_STRIDE).await?;
        }

        match handle.act(action).await? {
            ActOutcome::Completed(snapshot) => {
                summary.turns += 1;
                state = snapshot.state;
            }
            ActOutcome::Ignored => summary.ignored += 1,
        }
        drain(&mut events, &mut summary);
    }

    Ok(summary)
}

fn drain(events: &mut broadcast::Receiver<RuntimeEvent>, summary: &mut SessionSummary) {
    loop {
        match events.try_recv() {
            Ok(RuntimeEvent::Battle(event)) => summary.record(&event),
            Ok(_) => {}
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!("Summary missed {} events", skipped);
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_runtime::{NullPresenter, RuntimeConfig};

    #[test]
    fn heals_only_when_low() {
        let mut state = EncounterState::new();
        assert_eq!(choose_action(&state), PlayerAction::Attack);
        state.player.hp = 40;
        assert_eq!(choose_action(&state), PlayerAction::Attack);
        state.player.hp = 39;
        assert_eq!(choose_action(&state), PlayerAction::Heal);
    }

    #[test]
    fn summary_tallies_events() {
        let mut summary = SessionSummary::default();
        for event in [
            BattleEvent::Timing {
                tier: TimingTier::Perfect,
            },
            BattleEvent::Damage {
                target: Combatant::Monster,
                amount: 40,
                crit: CritTier::Weak,
                hp_before: 1000,
                hp_after: 960,
            },
            BattleEvent::Damage {
                target: Combatant::Player,
                amount: 12,
                crit: CritTier::None,
                hp_before: 100,
                hp_after: 88,
            },
            BattleEvent::Heal {
                target: Combatant::Monster,
                amount: 20,
                hp_before: 960,
                hp_after: 980,
            },
            BattleEvent::Defeated {
                who: Combatant::Player,
            },
            BattleEvent::RoundAdvanced {
                round: 2,
                monster_max_hp: 980,
                damage_multiplier: 1.0,
            },
        ] {
            summary.record(&event);
        }

        assert_eq!(summary.perfect, 1);
        assert_eq!(summary.damage_dealt, 40);
        assert_eq!(summary.damage_taken, 12);
        assert_eq!(summary.crits, 1);
        assert_eq!(summary.monster_heals, 1);
        assert_eq!(summary.player_defeats, 1);
        assert_eq!(summary.final_round, 2);
        assert!(summary.to_string().contains("1 perfect, 0 good, 0 bad"));
    }

    #[tokio::test]
    async fn plays_every_turn_and_replays_by_seed() {
        async fn session(seed: u64) -> SessionSummary {
            let runtime = Runtime::builder()
                .config(RuntimeConfig {
                    seed: Some(seed),
                    agility_tick: None,
                    ..RuntimeConfig::default()
                })
                .presenter(NullPresenter)
                .build()
                .await
                .unwrap();
            let handle = runtime.handle();
            let summary = play(&handle, 60).await.unwrap();
            drop(handle);
            runtime.shutdown().await.unwrap();
            summary
        }

        let first = session(99).await;
        assert_eq!(first.turns, 60);
        assert_eq!(first.ignored, 0);
        assert!(first.damage_dealt > 0);
        assert_eq!(first.perfect + first.good + first.bad, 60 - first.player_heals);
        assert_eq!(first, session(99).await);
    }
}
