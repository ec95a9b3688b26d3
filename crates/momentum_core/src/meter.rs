//! Team Momentum Meter
//!
//! Tracks in-game momentum for the home and away sides.
//!
//! Value range: `min_momentum..=max_momentum` (default -100..=100)
//! Neutral baseline: midpoint of the range
//!
//! Every mutation clamps, so both values stay inside the bounds whatever the
//! caller passes in.

use serde::{Deserialize, Serialize};

use crate::config::MeterConfig;
use crate::models::TeamSide;

/// Ratio of the half range that separates Neutral from High/Low
const LEVEL_RATIO_MILD: f32 = 0.2;
/// Ratio of the half range that separates High/Low from the extremes
const LEVEL_RATIO_EXTREME: f32 = 0.6;

/// Momentum bucket, ordered from worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MomentumLevel {
    VeryLow,
    Low,
    Neutral,
    High,
    VeryHigh,
}

/// Momentum state for both teams
#[derive(Debug, Clone)]
pub struct MomentumMeter {
    home_momentum: f32,
    away_momentum: f32,
    momentum_threshold: f32,
    momentum_decay_rate: f32,
    max_momentum: f32,
    min_momentum: f32,
}

impl Default for MomentumMeter {
    fn default() -> Self {
        Self::from_config(&MeterConfig::default())
    }
}

impl MomentumMeter {
    pub fn new(threshold: f32, decay_rate: f32) -> Self {
        let mut meter = Self::default();
        meter.set_threshold(threshold);
        meter.set_decay_rate(decay_rate);
        meter
    }

    pub fn from_config(config: &MeterConfig) -> Self {
        let neutral = config.neutral();
        let mut meter = Self {
            home_momentum: neutral,
            away_momentum: neutral,
            momentum_threshold: 0.0,
            momentum_decay_rate: 0.0,
            max_momentum: config.max_momentum,
            min_momentum: config.min_momentum,
        };
        meter.set_threshold(config.threshold);
        meter.set_decay_rate(config.decay_rate);
        meter
    }

    pub fn neutral(&self) -> f32 {
        (self.min_momentum + self.max_momentum) * 0.5
    }

    fn half_range(&self) -> f32 {
        (self.max_momentum - self.min_momentum) * 0.5
    }

    pub fn min_momentum(&self) -> f32 {
        self.min_momentum
    }

    pub fn max_momentum(&self) -> f32 {
        self.max_momentum
    }

    pub fn momentum(&self, side: TeamSide) -> f32 {
        match side {
            TeamSide::Home => self.home_momentum,
            TeamSide::Away => self.away_momentum,
        }
    }

    fn slot(&mut self, side: TeamSide) -> &mut f32 {
        match side {
            TeamSide::Home => &mut self.home_momentum,
            TeamSide::Away => &mut self.away_momentum,
        }
    }

    pub fn set_momentum(&mut self, side: TeamSide, value: f32) {
        let (min, max) = (self.min_momentum, self.max_momentum);
        *self.slot(side) = value.clamp(min, max);
    }

    pub fn adjust_momentum(&mut self, side: TeamSide, adjustment: f32) {
        let current = self.momentum(side);
        self.set_momentum(side, current + adjustment);
    }

    /// Move momentum from one side to the other without breaking the zero sum.
    ///
    /// `amount > 0` moves momentum toward `side`, `amount < 0` away from it.
    /// The amount is cut down to what both sides can absorb before clamping,
    /// so the two deltas always cancel. Returns the amount actually moved.
    pub fn transfer_momentum(&mut self, side: TeamSide, amount: f32) -> f32 {
        let gainer = self.momentum(side);
        let loser = self.momentum(side.opponent());
        let moved = if amount >= 0.0 {
            amount
                .min(self.max_momentum - gainer)
                .min(loser - self.min_momentum)
                .max(0.0)
        } else {
            amount
                .max(self.min_momentum - gainer)
                .max(loser - self.max_momentum)
                .min(0.0)
        };
        *self.slot(side) = gainer + moved;
        *self.slot(side.opponent()) = loser - moved;
        moved
    }

    /// Pull both sides toward neutral by `decay_rate * half_range * delta_time`.
    ///
    /// A step never crosses neutral; negative `delta_time` does nothing.
    pub fn decay_momentum(&mut self, delta_time: f32) {
        if delta_time <= 0.0 {
            return;
        }
        let step = self.momentum_decay_rate * self.half_range() * delta_time;
        let neutral = self.neutral();
        for side in [TeamSide::Home, TeamSide::Away] {
            let value = self.momentum(side);
            let decayed = if value > neutral {
                (value - step).max(neutral)
            } else {
                (value + step).min(neutral)
            };
            *self.slot(side) = decayed;
        }
    }

    pub fn reset_momentum(&mut self) {
        let neutral = self.neutral();
        self.home_momentum = neutral;
        self.away_momentum = neutral;
    }

    pub fn momentum_level(&self, side: TeamSide) -> MomentumLevel {
        let ratio = (self.momentum(side) - self.neutral()) / self.half_range();
        if ratio >= LEVEL_RATIO_EXTREME {
            MomentumLevel::VeryHigh
        } else if ratio >= LEVEL_RATIO_MILD {
            MomentumLevel::High
        } else if ratio > -LEVEL_RATIO_MILD {
            MomentumLevel::Neutral
        } else if ratio > -LEVEL_RATIO_EXTREME {
            MomentumLevel::Low
        } else {
            MomentumLevel::VeryLow
        }
    }

    /// Positive when the home side has the edge
    pub fn momentum_difference(&self) -> f32 {
        self.home_momentum - self.away_momentum
    }

    pub fn is_at_threshold(&self, side: TeamSide) -> bool {
        (self.momentum(side) - self.neutral()).abs() >= self.momentum_threshold
    }

    /// Threshold reached with the surge in this side's favour
    pub fn is_surging(&self, side: TeamSide) -> bool {
        self.is_at_threshold(side) && self.momentum(side) > self.neutral()
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        self.momentum_threshold = threshold.clamp(0.0, self.half_range());
    }

    pub fn set_decay_rate(&mut self, rate: f32) {
        self.momentum_decay_rate = rate.max(0.0);
    }

    pub fn threshold(&self) -> f32 {
        self.momentum_threshold
    }

    pub fn decay_rate(&self) -> f32 {
        self.momentum_decay_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_meter_is_neutral() {
        let m = MomentumMeter::default();
        assert!(m.momentum(TeamSide::Home).abs() < 0.001);
        assert!(m.momentum(TeamSide::Away).abs() < 0.001);
        assert_eq!(m.momentum_level(TeamSide::Home), MomentumLevel::Neutral);
        assert!((m.threshold() - 50.0).abs() < 0.001);
    }

    #[test]
    fn test_adjust_clamps() {
        let mut m = MomentumMeter::default();
        m.adjust_momentum(TeamSide::Home, 500.0);
        m.adjust_momentum(TeamSide::Away, -500.0);
        assert!((m.momentum(TeamSide::Home) - 100.0).abs() < 0.001);
        assert!((m.momentum(TeamSide::Away) + 100.0).abs() < 0.001);
    }

    #[test]
    fn test_transfer_is_zero_sum_near_bounds() {
        let mut m = MomentumMeter::default();
        m.set_momentum(TeamSide::Home, 90.0);
        m.set_momentum(TeamSide::Away, -20.0);

        let moved = m.transfer_momentum(TeamSide::Home, 25.0);

        assert!((moved - 10.0).abs() < 0.001);
        assert!((m.momentum(TeamSide::Home) - 100.0).abs() < 0.001);
        assert!((m.momentum(TeamSide::Away) + 30.0).abs() < 0.001);
    }

    #[test]
    fn test_negative_transfer_moves_toward_opponent() {
        let mut m = MomentumMeter::default();
        let moved = m.transfer_momentum(TeamSide::Away, -15.0);
        assert!((moved + 15.0).abs() < 0.001);
        assert!((m.momentum(TeamSide::Away) + 15.0).abs() < 0.001);
        assert!((m.momentum(TeamSide::Home) - 15.0).abs() < 0.001);
    }

    #[test]
    fn test_decay_does_not_overshoot() {
        let mut m = MomentumMeter::new(50.0, 0.1);
        m.set_momentum(TeamSide::Home, 5.0);
        m.set_momentum(TeamSide::Away, -5.0);

        // step = 0.1 * 100 * 1.0 = 10 > remaining 5
        m.decay_momentum(1.0);

        assert!(m.momentum(TeamSide::Home).abs() < 0.001);
        assert!(m.momentum(TeamSide::Away).abs() < 0.001);
    }

    #[test]
    fn test_negative_delta_time_ignored() {
        let mut m = MomentumMeter::default();
        m.set_momentum(TeamSide::Home, 40.0);
        m.decay_momentum(-3.0);
        assert!((m.momentum(TeamSide::Home) - 40.0).abs() < 0.001);
    }

    #[test]
    fn test_levels_are_symmetric() {
        let mut m = MomentumMeter::default();
        let cases = [
            (80.0, MomentumLevel::VeryHigh),
            (30.0, MomentumLevel::High),
            (0.0, MomentumLevel::Neutral),
            (-30.0, MomentumLevel::Low),
            (-80.0, MomentumLevel::VeryLow),
        ];
        for (value, expected) in cases {
            m.set_momentum(TeamSide::Home, value);
            assert_eq!(m.momentum_level(TeamSide::Home), expected, "value {}", value);
        }
        assert!(MomentumLevel::VeryLow < MomentumLevel::VeryHigh);
    }

    #[test]
    fn test_threshold_and_difference() {
        let mut m = MomentumMeter::default();
        m.set_momentum(TeamSide::Home, 50.0);
        m.set_momentum(TeamSide::Away, -60.0);
        assert!(m.is_at_threshold(TeamSide::Home));
        assert!(m.is_at_threshold(TeamSide::Away));
        assert!(m.is_surging(TeamSide::Home));
        assert!(!m.is_surging(TeamSide::Away));
        assert!((m.momentum_difference() - 110.0).abs() < 0.001);
    }

    #[test]
    fn test_reset_and_setters() {
        let mut m = MomentumMeter::default();
        m.set_momentum(TeamSide::Home, 70.0);
        m.reset_momentum();
        assert!(m.momentum(TeamSide::Home).abs() < 0.001);

        m.set_decay_rate(-1.0);
        assert!(m.decay_rate().abs() < 0.001);
        m.set_threshold(1000.0);
        assert!((m.threshold() - 100.0).abs() < 0.001);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn side() -> impl Strategy<Value = TeamSide> {
        prop_oneof![Just(TeamSide::Home), Just(TeamSide::Away)]
    }

    proptest! {
        /// Property: no sequence of transfers and decays leaves the bounds or breaks the zero sum
        #[test]
        fn prop_transfers_stay_bounded_and_balanced(
            ops in prop::collection::vec((side(), -300.0f32..300.0f32, 0.0f32..2.0f32), 1..40)
        ) {
            let mut m = MomentumMeter::default();
            for (side, amount, dt) in ops {
                m.transfer_momentum(side, amount);
                m.decay_momentum(dt);
                for s in [TeamSide::Home, TeamSide::Away] {
                    prop_assert!(m.momentum(s) >= m.min_momentum() && m.momentum(s) <= m.max_momentum());
                }
                prop_assert!((m.momentum(TeamSide::Home) + m.momentum(TeamSide::Away)).abs() < 0.01);
            }
        }

        /// Property: raw adjustments are clamped whatever the input
        #[test]
        fn prop_adjust_clamped(
            ops in prop::collection::vec((side(), -500.0f32..500.0f32), 1..30)
        ) {
            let mut m = MomentumMeter::default();
            for (side, adjustment) in ops {
                m.adjust_momentum(side, adjustment);
                prop_assert!(m.momentum(side) >= -100.0 && m.momentum(side) <= 100.0);
            }
        }

        /// Property: decay moves toward neutral and never past it
        #[test]
        fn prop_decay_monotonic(
            start in -100.0f32..100.0f32,
            rate in 0.0f32..1.0f32,
            dt in 0.0f32..5.0f32
        ) {
            let mut m = MomentumMeter::new(50.0, rate);
            m.set_momentum(TeamSide::Home, start);
            m.decay_momentum(dt);
            let after = m.momentum(TeamSide::Home);
            prop_assert!(after.abs() <= start.abs() + 1e-4);
            prop_assert!(after * start >= 0.0);
        }
    }
}
