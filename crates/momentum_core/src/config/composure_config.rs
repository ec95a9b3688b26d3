//! Composure mode and momentum effect parameters

use serde::{Deserialize, Serialize};

/// Team composure window
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposureConfig {
    /// Active window length in seconds (default: 30.0)
    pub duration: f32,
    /// Fraction of adverse effect strength removed (default: 0.7)
    pub effectiveness: f32,
    /// Seconds from activation until the next activation (default: 120.0)
    pub cooldown: f32,
    /// Cap after the coach's leadership bonus (default: 0.95)
    pub max_effectiveness: f32,
}

impl Default for ComposureConfig {
    fn default() -> Self {
        Self {
            duration: 30.0,
            effectiveness: 0.7,
            cooldown: 120.0,
            max_effectiveness: 0.95,
        }
    }
}

/// Effects scheduled when a team crosses a momentum threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// Stat points at full strength (default: 10.0)
    pub base_magnitude: f32,
    /// Effect lifetime in seconds (default: 30.0)
    pub duration: f32,
    /// Magnitude multiplier when the surging team hits VeryHigh (default: 1.5)
    pub very_high_scale: f32,
    /// Share of a negative effect a fully composed player shrugs off (default: 0.0, off)
    pub composure_resistance: f32,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            base_magnitude: 10.0,
            duration: 30.0,
            very_high_scale: 1.5,
            composure_resistance: 0.0,
        }
    }
}
