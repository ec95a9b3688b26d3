//! Team composure mode
//!
//! One state machine per team. Activation opens a mitigation window and
//! starts the cooldown at the same time, so the mode is never active without
//! a pending cooldown.
//!
//! ```text
//! Ready --activate--> Active --window ends--> Cooldown --cooldown ends--> Ready
//! ```

use serde::{Deserialize, Serialize};

use crate::coach::Coach;
use crate::config::ComposureConfig;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ComposureState {
    Ready,
    Active {
        remaining: f32,
        cooldown_remaining: f32,
    },
    Cooldown {
        remaining: f32,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamComposureMode {
    state: ComposureState,
    duration: f32,
    effectiveness: f32,
    cooldown_time: f32,
    max_effectiveness: f32,
    /// Effectiveness locked in at activation, including the coach bonus
    active_effectiveness: f32,
    activating_coach: Option<String>,
}

impl Default for TeamComposureMode {
    fn default() -> Self {
        Self::from_config(&ComposureConfig::default())
    }
}

impl TeamComposureMode {
    pub fn new(duration: f32, effectiveness: f32) -> Self {
        let mut mode = Self::default();
        mode.set_duration(duration);
        mode.set_effectiveness(effectiveness);
        mode
    }

    pub fn from_config(config: &ComposureConfig) -> Self {
        Self {
            state: ComposureState::Ready,
            duration: config.duration.max(0.0),
            effectiveness: config.effectiveness.clamp(0.0, 1.0),
            cooldown_time: config.cooldown.max(0.0),
            max_effectiveness: config.max_effectiveness.clamp(0.0, 1.0),
            active_effectiveness: 0.0,
            activating_coach: None,
        }
    }

    // ========================
    // Control
    // ========================

    /// Open the window. Returns false (and changes nothing) unless Ready.
    ///
    /// The coach's leadership bonus raises effectiveness (capped at
    /// `max_effectiveness`) and shortens the cooldown by the same share.
    /// The cooldown never ends before the window does.
    pub fn activate(&mut self, coach: Option<&Coach>) -> bool {
        if !self.can_activate() {
            log::debug!("Composure activation rejected: {:?}", self.state);
            return false;
        }
        let bonus = coach.map(Coach::leadership_bonus).unwrap_or(0.0);
        self.active_effectiveness = (self.effectiveness + bonus).clamp(0.0, self.max_effectiveness);
        let cooldown = (self.cooldown_time * (1.0 - bonus)).max(self.duration);
        self.activating_coach = coach.map(|c| c.name().to_string());
        self.state = if self.duration > 0.0 {
            ComposureState::Active {
                remaining: self.duration,
                cooldown_remaining: cooldown,
            }
        } else if cooldown > 0.0 {
            ComposureState::Cooldown { remaining: cooldown }
        } else {
            ComposureState::Ready
        };
        log::info!(
            "Composure mode activated by {} ({:.0}% for {:.0}s, cooldown {:.0}s)",
            self.activating_coach.as_deref().unwrap_or("team"),
            self.active_effectiveness * 100.0,
            self.duration,
            cooldown
        );
        true
    }

    /// End the window early; the cooldown keeps running
    pub fn deactivate(&mut self) {
        if let ComposureState::Active {
            cooldown_remaining, ..
        } = self.state
        {
            self.state = if cooldown_remaining > 0.0 {
                ComposureState::Cooldown {
                    remaining: cooldown_remaining,
                }
            } else {
                ComposureState::Ready
            };
        }
    }

    /// Advance both timers, floored at zero. Negative `delta_time` is ignored.
    pub fn update(&mut self, delta_time: f32) {
        let dt = delta_time.max(0.0);
        self.state = match self.state {
            ComposureState::Ready => ComposureState::Ready,
            ComposureState::Active {
                remaining,
                cooldown_remaining,
            } => {
                let remaining = (remaining - dt).max(0.0);
                let cooldown_remaining = (cooldown_remaining - dt).max(0.0);
                if remaining > 0.0 {
                    ComposureState::Active {
                        remaining,
                        cooldown_remaining,
                    }
                } else if cooldown_remaining > 0.0 {
                    log::debug!("Composure window closed, {:.1}s cooldown left", cooldown_remaining);
                    ComposureState::Cooldown {
                        remaining: cooldown_remaining,
                    }
                } else {
                    ComposureState::Ready
                }
            }
            ComposureState::Cooldown { remaining } => {
                let remaining = (remaining - dt).max(0.0);
                if remaining > 0.0 {
                    ComposureState::Cooldown { remaining }
                } else {
                    ComposureState::Ready
                }
            }
        };
    }

    /// Back to Ready, dropping any window or cooldown
    pub fn reset(&mut self) {
        self.state = ComposureState::Ready;
        self.activating_coach = None;
    }

    // ========================
    // Queries
    // ========================

    pub fn state(&self) -> ComposureState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, ComposureState::Active { .. })
    }

    pub fn can_activate(&self) -> bool {
        matches!(self.state, ComposureState::Ready)
    }

    /// Share of adverse effect strength removed right now (0.0 when inactive)
    pub fn mitigation_factor(&self) -> f32 {
        if self.is_active() {
            self.active_effectiveness
        } else {
            0.0
        }
    }

    pub fn remaining_time(&self) -> f32 {
        match self.state {
            ComposureState::Active { remaining, .. } => remaining,
            _ => 0.0,
        }
    }

    pub fn cooldown_remaining(&self) -> f32 {
        match self.state {
            ComposureState::Ready => 0.0,
            ComposureState::Active {
                cooldown_remaining, ..
            } => cooldown_remaining,
            ComposureState::Cooldown { remaining } => remaining,
        }
    }

    pub fn activating_coach(&self) -> Option<&str> {
        self.activating_coach.as_deref()
    }

    pub fn effectiveness(&self) -> f32 {
        self.effectiveness
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn cooldown_time(&self) -> f32 {
        self.cooldown_time
    }

    // ========================
    // Configuration
    // ========================

    pub fn set_duration(&mut self, duration: f32) {
        self.duration = duration.max(0.0);
    }

    pub fn set_effectiveness(&mut self, effectiveness: f32) {
        self.effectiveness = effectiveness.clamp(0.0, 1.0);
    }

    pub fn set_cooldown_time(&mut self, cooldown: f32) {
        self.cooldown_time = cooldown.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TeamId;

    #[test]
    fn test_activation_starts_window_and_cooldown() {
        let mut mode = TeamComposureMode::default();
        assert!(mode.activate(None));
        assert!(mode.is_active());
        assert!((mode.mitigation_factor() - 0.7).abs() < 0.001);
        assert!((mode.remaining_time() - 30.0).abs() < 0.001);
        assert!((mode.cooldown_remaining() - 120.0).abs() < 0.001);
    }

    #[test]
    fn test_second_activation_rejected_until_cooldown_ends() {
        let mut mode = TeamComposureMode::default();
        assert!(mode.activate(None));
        assert!(!mode.activate(None));

        mode.update(40.0);
        assert!(!mode.is_active());
        assert!(mode.mitigation_factor().abs() < 0.001);
        assert!(!mode.activate(None));
        assert!((mode.cooldown_remaining() - 80.0).abs() < 0.001);

        mode.update(80.0);
        assert!(mode.can_activate());
        assert!(mode.activate(None));
    }

    #[test]
    fn test_deactivate_keeps_cooldown() {
        let mut mode = TeamComposureMode::default();
        mode.activate(None);
        mode.update(10.0);
        mode.deactivate();
        assert!(!mode.is_active());
        assert!((mode.cooldown_remaining() - 110.0).abs() < 0.001);
    }

    #[test]
    fn test_cooldown_never_shorter_than_window() {
        let mut mode = TeamComposureMode::new(60.0, 0.5);
        mode.set_cooldown_time(10.0);
        mode.activate(None);
        mode.update(59.0);
        assert!(mode.is_active());
        assert!(mode.cooldown_remaining() >= mode.remaining_time());
    }

    #[test]
    fn test_leadership_bonus_applies() {
        let coach = Coach::new("C1", "Strong Leader", TeamId::new("AWAY"), 100);
        let mut mode = TeamComposureMode::default();
        mode.activate(Some(&coach));
        assert!((mode.mitigation_factor() - 0.8).abs() < 0.001);
        assert!((mode.cooldown_remaining() - 108.0).abs() < 0.01);
        assert_eq!(mode.activating_coach(), Some("Strong Leader"));
    }

    #[test]
    fn test_timers_floor_at_zero() {
        let mut mode = TeamComposureMode::default();
        mode.activate(None);
        mode.update(-5.0);
        assert!((mode.remaining_time() - 30.0).abs() < 0.001);
        mode.update(10_000.0);
        assert_eq!(mode.state(), ComposureState::Ready);
        assert!(mode.cooldown_remaining().abs() < 0.001);
    }
}
