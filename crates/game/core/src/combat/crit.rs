//! Critical hit table.

use crate::env::RandomSource;

/// Severity of a critical hit, rolled once per attack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CritTier {
    #[default]
    None,
    Weak,
    Strong,
    Ultra,
}

impl CritTier {
    /// Upper bounds (inclusive) on a `[0, 100)` roll, most severe first.
    const ULTRA_MAX_ROLL: f64 = 1.0;
    const STRONG_MAX_ROLL: f64 = 6.0;
    const WEAK_MAX_ROLL: f64 = 16.0;

    pub const fn multiplier(self) -> f64 {
        match self {
            Self::None => 1.0,
            Self::Weak => 1.5,
            Self::Strong => 2.0,
            Self::Ultra => 3.0,
        }
    }

    pub const fn is_crit(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Classifies a roll drawn from `[0, 100)`.
    ///
    /// The ranges are cumulative, so the most severe tier is checked first.
    pub fn from_roll(roll: f64) -> Self {
        if roll <= Self::ULTRA_MAX_ROLL {
            Self::Ultra
        } else if roll <= Self::STRONG_MAX_ROLL {
            Self::Strong
        } else if roll <= Self::WEAK_MAX_ROLL {
            Self::Weak
        } else {
            Self::None
        }
    }

    /// Scales already-floored damage by this tier and floors again.
    pub fn apply(self, damage: u32) -> u32 {
        match self {
            Self::None => damage,
            _ => (damage as f64 * self.multiplier()).floor() as u32,
        }
    }
}

/// Rolls the crit tier for one attack.
pub fn roll_crit(rng: &mut impl RandomSource) -> CritTier {
    CritTier::from_roll(rng.uniform(100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{PcgRng, ScriptedRng};

    #[test]
    fn boundaries_pick_most_severe_tier() {
        assert_eq!(CritTier::from_roll(0.0), CritTier::Ultra);
        assert_eq!(CritTier::from_roll(1.0), CritTier::Ultra);
        assert_eq!(CritTier::from_roll(1.01), CritTier::Strong);
        assert_eq!(CritTier::from_roll(6.0), CritTier::Strong);
        assert_eq!(CritTier::from_roll(6.5), CritTier::Weak);
        assert_eq!(CritTier::from_roll(16.0), CritTier::Weak);
        assert_eq!(CritTier::from_roll(16.01), CritTier::None);
        assert_eq!(CritTier::from_roll(99.9), CritTier::None);
    }

    #[test]
    fn apply_floors_after_scaling() {
        assert_eq!(CritTier::None.apply(15), 15);
        assert_eq!(CritTier::Weak.apply(15), 22);
        assert_eq!(CritTier::Strong.apply(15), 30);
        assert_eq!(CritTier::Ultra.apply(15), 45);
    }

    #[test]
    fn roll_crit_reads_one_draw() {
        let mut rng = ScriptedRng::new([0.005, 0.05, 0.10, 0.5]);
        assert_eq!(roll_crit(&mut rng), CritTier::Ultra);
        assert_eq!(roll_crit(&mut rng), CritTier::Strong);
        assert_eq!(roll_crit(&mut rng), CritTier::Weak);
        assert_eq!(roll_crit(&mut rng), CritTier::None);
        assert_eq!(rng.draws(), 4);
    }

    #[test]
    fn distribution_matches_table() {
        const SAMPLES: usize = 200_000;
        let mut rng = PcgRng::from_seed(0xC817);
        let mut counts = [0usize; 4];
        for _ in 0..SAMPLES {
            let idx = match roll_crit(&mut rng) {
                CritTier::Ultra => 0,
                CritTier::Strong => 1,
                CritTier::Weak => 2,
                CritTier::None => 3,
            };
            counts[idx] += 1;
        }

        let rate = |n: usize| n as f64 / SAMPLES as f64;
        assert!((rate(counts[0]) - 0.01).abs() < 0.003);
        assert!((rate(counts[1]) - 0.05).abs() < 0.005);
        assert!((rate(counts[2]) - 0.10).abs() < 0.006);
        assert!((rate(counts[3]) - 0.84).abs() < 0.008);
    }
}
