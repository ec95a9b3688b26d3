//! Event impact scaling

use serde::{Deserialize, Serialize};

/// Game-context scaling applied to base event impacts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactConfig {
    /// Extra impact per unit of game tension (default: 0.5)
    pub tension_weight: f32,
    /// Multiplier for plays in the final minutes (default: 1.5)
    pub late_game_multiplier: f32,
    /// Seconds left in the 4th quarter that count as late game (default: 300)
    pub late_game_seconds: u32,
    /// Score difference treated as a close game (default: 8)
    pub close_game_margin: u32,
    /// Score difference treated as a blowout (default: 21)
    pub blowout_margin: u32,
    /// Multiplier applied to impacts in blowouts (default: 0.5)
    pub blowout_damper: f32,
    /// Morale points moved per point of momentum impact (default: 0.2)
    pub morale_per_impact: f32,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            tension_weight: 0.5,
            late_game_multiplier: 1.5,
            late_game_seconds: 300,
            close_game_margin: 8,
            blowout_margin: 21,
            blowout_damper: 0.5,
            morale_per_impact: 0.2,
        }
    }
}
