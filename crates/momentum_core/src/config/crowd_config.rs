//! Crowd layout and noise parameters

use serde::{Deserialize, Serialize};

/// Crowd parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrowdConfig {
    /// Number of sections the stadium is split into (default: 8)
    pub num_sections: usize,
    /// Sections given to travelling away fans (default: 1)
    pub away_sections: usize,
    /// Neutral sections (default: 1)
    pub neutral_sections: usize,
    /// Lowest sampled fill rate per section (default: 0.75)
    pub min_fill_rate: f32,
    /// Ambient noise with nothing happening (default: 40.0)
    pub base_noise_level: f32,
    /// Noise ceiling (default: 120.0)
    pub max_noise_level: f32,
    /// Below this the crowd is quiet (default: 50.0)
    pub quiet_threshold: f32,
    /// Above this the crowd is loud (default: 90.0)
    pub loud_threshold: f32,
    /// Reaction intensity of neutral sections (default: 0.5)
    pub neutral_reaction_factor: f32,
    /// Fraction of section noise that fades per second (default: 0.2)
    pub noise_settle_rate: f32,
}

impl Default for CrowdConfig {
    fn default() -> Self {
        Self {
            num_sections: 8,
            away_sections: 1,
            neutral_sections: 1,
            min_fill_rate: 0.75,
            base_noise_level: 40.0,
            max_noise_level: 120.0,
            quiet_threshold: 50.0,
            loud_threshold: 90.0,
            neutral_reaction_factor: 0.5,
            noise_settle_rate: 0.2,
        }
    }
}
