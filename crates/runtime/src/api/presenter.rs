//! Asynchronous presentation boundary.
//!
//! The battle worker reports every observable outcome through [`Presenter`]
//! and awaits each call, so an implementation controls pacing simply by not
//! returning until its animation or delay has finished.
use std::sync::Arc;

use async_trait::async_trait;
use battle_core::{Combatant, CritTier, LogTone, ProgressSnapshot, TimingTier};

/// Receives battle outcomes in display order.
///
/// Implementations can drive:
/// - An interactive terminal with animations and delays
/// - A headless transcript writer
/// - Recording fixtures for tests
#[async_trait]
pub trait Presenter: Send + Sync {
    async fn report_log(&self, message: &str, tone: LogTone);

    async fn report_stat_update(&self, player_hp: u32, monster_hp: u32, monster_max_hp: u32);

    async fn report_damage(&self, target: Combatant, amount: u32, crit: CritTier);

    async fn report_heal(&self, target: Combatant, amount: u32);

    async fn report_level_up(&self, level: u32);

    /// Plays the defeat of `who`. The next round is only set up after this
    /// returns.
    async fn report_defeat(&self, who: Combatant);

    /// Enables or disables player input. Disabled for the whole turn.
    async fn set_input_enabled(&self, enabled: bool);

    async fn report_timing(&self, _tier: TimingTier) {}

    async fn report_progress(&self, _progress: ProgressSnapshot) {}

    async fn report_round(&self, _round: u32, _monster_max_hp: u32, _damage_multiplier: f64) {}
}

#[async_trait]
impl<P: Presenter + ?Sized> Presenter for Arc<P> {
    async fn report_log(&self, message: &str, tone: LogTone) {
        (**self).report_log(message, tone).await
    }

    async fn report_stat_update(&self, player_hp: u32, monster_hp: u32, monster_max_hp: u32) {
        (**self)
            .report_stat_update(player_hp, monster_hp, monster_max_hp)
            .await
    }

    async fn report_damage(&self, target: Combatant, amount: u32, crit: CritTier) {
        (**self).report_damage(target, amount, crit).await
    }

    async fn report_heal(&self, target: Combatant, amount: u32) {
        (**self).report_heal(target, amount).await
    }

    async fn report_level_up(&self, level: u32) {
        (**self).report_level_up(level).await
    }

    async fn report_defeat(&self, who: Combatant) {
        (**self).report_defeat(who).await
    }

    async fn set_input_enabled(&self, enabled: bool) {
        (**self).set_input_enabled(enabled).await
    }

    async fn report_timing(&self, tier: TimingTier) {
        (**self).report_timing(tier).await
    }

    async fn report_progress(&self, progress: ProgressSnapshot) {
        (**self).report_progress(progress).await
    }

    async fn report_round(&self, round: u32, monster_max_hp: u32, damage_multiplier: f64) {
        (**self)
            .report_round(round, monster_max_hp, damage_multiplier)
            .await
    }
}

/// A presenter that discards everything.
/// Useful for headless runs driven purely by [`crate::RuntimeHandle`] events.
pub struct NullPresenter;

#[async_trait]
impl Presenter for NullPresenter {
    async fn report_log(&self, _message: &str, _tone: LogTone) {}

    async fn report_stat_update(&self, _player_hp: u32, _monster_hp: u32, _monster_max_hp: u32) {}

    async fn report_damage(&self, _target: Combatant, _amount: u32, _crit: CritTier) {}

    async fn report_heal(&self, _target: Combatant, _amount: u32) {}

    async fn report_level_up(&self, _level: u32) {}

    async fn report_defeat(&self, _who: Combatant) {}

    async fn set_input_enabled(&self, _enabled: bool) {}
}
