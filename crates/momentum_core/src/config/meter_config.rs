//! Momentum meter bounds and decay

use serde::{Deserialize, Serialize};

/// Momentum meter parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterConfig {
    /// Lower bound of team momentum (default: -100.0)
    pub min_momentum: f32,
    /// Upper bound of team momentum (default: 100.0)
    pub max_momentum: f32,
    /// Distance from neutral that counts as "at threshold" (default: 50.0)
    pub threshold: f32,
    /// Fraction of the half range recovered toward neutral per second (default: 0.1)
    pub decay_rate: f32,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            min_momentum: -100.0,
            max_momentum: 100.0,
            threshold: 50.0,
            decay_rate: 0.1,
        }
    }
}

impl MeterConfig {
    pub fn neutral(&self) -> f32 {
        (self.min_momentum + self.max_momentum) * 0.5
    }

    pub fn half_range(&self) -> f32 {
        (self.max_momentum - self.min_momentum) * 0.5
    }
}
