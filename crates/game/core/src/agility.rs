//! Agility timing track.
//!
//! A pointer sweeps back and forth across a bounded track at a fixed step per
//! tick, clamping and reversing at either end. Its position is a pure
//! function of the number of ticks elapsed, so sampling is deterministic and
//! never disturbs the oscillation. The distance from the track center at the
//! moment of an attack picks the timing multiplier.

use crate::config::BattleConfig;
use crate::error::ConfigError;

/// Timing quality of an attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimingTier {
    Perfect,
    Good,
    Bad,
}

impl TimingTier {
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Perfect => 1.6,
            Self::Good => 1.25,
            Self::Bad => 0.9,
        }
    }

    /// Feedback text shown over the track.
    pub const fn feedback(self) -> &'static str {
        match self {
            Self::Perfect => "Perfect!",
            Self::Good => "Good",
            Self::Bad => "Bad",
        }
    }
}

/// Direction the pointer is travelling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Forward,
    Backward,
}

/// Geometry of the track: `[0, span]` traversed `step` units per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgilityTrack {
    span: u32,
    step: u32,
    perfect_window: u32,
    good_window: u32,
}

impl AgilityTrack {
    pub fn new(span: u32, step: u32) -> Result<Self, ConfigError> {
        Self::from_config(&BattleConfig::with_agility_geometry(span, step))
    }

    pub fn from_config(config: &BattleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            span: config.agility_span,
            step: config.agility_step,
            perfect_window: config.perfect_window,
            good_window: config.good_window,
        })
    }

    pub const fn span(&self) -> u32 {
        self.span
    }

    pub const fn step(&self) -> u32 {
        self.step
    }

    pub fn center(&self) -> f64 {
        self.span as f64 / 2.0
    }

    /// Ticks needed to sweep from one end to the other.
    const fn sweep_ticks(&self) -> u64 {
        self.span.div_ceil(self.step) as u64
    }

    /// Ticks in one full back-and-forth cycle.
    pub const fn period(&self) -> u64 {
        2 * self.sweep_ticks()
    }

    /// Pointer position and heading after `ticks` ticks from the start.
    ///
    /// The pointer starts at 0 heading forward. When a step would overshoot
    /// an end it stops exactly on that end and turns around.
    pub fn position_at(&self, ticks: u64) -> (u32, Direction) {
        let sweep = self.sweep_ticks();
        let phase = ticks % self.period();
        let step = self.step as u64;
        let span = self.span as u64;

        if phase < sweep {
            ((phase * step).min(span) as u32, Direction::Forward)
        } else {
            let back = (phase - sweep) * step;
            (span.saturating_sub(back) as u32, Direction::Backward)
        }
    }

    /// Timing tier for a pointer at `position`.
    pub fn classify(&self, position: u32) -> TimingTier {
        let distance = (position as f64 - self.center()).abs();
        if distance < self.perfect_window as f64 {
            TimingTier::Perfect
        } else if distance < self.good_window as f64 {
            TimingTier::Good
        } else {
            TimingTier::Bad
        }
    }
}

impl Default for AgilityTrack {
    fn default() -> Self {
        Self {
            span: BattleConfig::DEFAULT_AGILITY_SPAN,
            step: BattleConfig::DEFAULT_AGILITY_STEP,
            perfect_window: BattleConfig::DEFAULT_PERFECT_WINDOW,
            good_window: BattleConfig::DEFAULT_GOOD_WINDOW,
        }
    }
}

/// A running oscillator over an [`AgilityTrack`].
///
/// Only advances while running. The runtime pauses it for the whole time
/// input is disabled so the next sample matches what the player last saw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgilityMeter {
    track: AgilityTrack,
    ticks: u64,
    running: bool,
}

impl AgilityMeter {
    pub const fn new(track: AgilityTrack) -> Self {
        Self {
            track,
            ticks: 0,
            running: true,
        }
    }

    pub const fn track(&self) -> &AgilityTrack {
        &self.track
    }

    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Advance one tick if running.
    pub fn tick(&mut self) {
        self.advance(1);
    }

    /// Advance `ticks` ticks if running.
    pub fn advance(&mut self, ticks: u64) {
        if self.running {
            self.ticks = self.ticks.wrapping_add(ticks);
        }
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn resume(&mut self) {
        self.running = true;
    }

    pub fn position(&self) -> (u32, Direction) {
        self.track.position_at(self.ticks)
    }

    /// Reads the timing tier at the current position.
    pub fn sample(&self) -> TimingTier {
        self.track.classify(self.position().0)
    }
}

impl Default for AgilityMeter {
    fn default() -> Self {
        Self::new(AgilityTrack::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_wave_clamps_and_reverses() {
        // 0, 20, 40, 50 (clamped), 30, 10, 0 (clamped), 20, ...
        let track = AgilityTrack::new(50, 20).unwrap();
        let positions: Vec<u32> = (0..8).map(|t| track.position_at(t).0).collect();
        assert_eq!(positions, [0, 20, 40, 50, 30, 10, 0, 20]);

        assert_eq!(track.position_at(2).1, Direction::Forward);
        assert_eq!(track.position_at(3).1, Direction::Backward);
        assert_eq!(track.position_at(6).1, Direction::Forward);
        assert_eq!(track.period(), 6);
    }

    #[test]
    fn exact_multiple_span_hits_both_ends() {
        let track = AgilityTrack::default();
        assert_eq!(track.position_at(0).0, 0);
        assert_eq!(track.position_at(10).0, 200);
        assert_eq!(track.position_at(20).0, 400);
        assert_eq!(track.position_at(30).0, 200);
        assert_eq!(track.position_at(40).0, 0);
    }

    #[test]
    fn classify_by_distance_from_center() {
        let track = AgilityTrack::default();
        assert_eq!(track.classify(200), TimingTier::Perfect);
        assert_eq!(track.classify(176), TimingTier::Perfect);
        assert_eq!(track.classify(175), TimingTier::Good);
        assert_eq!(track.classify(226), TimingTier::Good);
        assert_eq!(track.classify(126), TimingTier::Good);
        assert_eq!(track.classify(125), TimingTier::Bad);
        assert_eq!(track.classify(0), TimingTier::Bad);
        assert_eq!(track.classify(400), TimingTier::Bad);
    }

    #[test]
    fn paused_meter_holds_position() {
        let mut meter = AgilityMeter::default();
        meter.advance(10);
        assert_eq!(meter.sample(), TimingTier::Perfect);

        meter.pause();
        meter.advance(7);
        assert_eq!(meter.ticks(), 10);
        assert_eq!(meter.position().0, 200);

        meter.resume();
        meter.tick();
        assert_eq!(meter.position().0, 220);
        assert_eq!(meter.sample(), TimingTier::Perfect);
    }

    #[test]
    fn sampling_is_a_pure_read() {
        let mut meter = AgilityMeter::default();
        meter.advance(3);
        let first = meter.sample();
        let again = meter.sample();
        assert_eq!(first, again);
        assert_eq!(meter.ticks(), 3);
    }

    #[test]
    fn rejects_degenerate_track() {
        assert_eq!(AgilityTrack::new(0, 20), Err(ConfigError::EmptyAgilityTrack));
        assert_eq!(AgilityTrack::new(400, 0), Err(ConfigError::ZeroAgilityStep));
    }
}
