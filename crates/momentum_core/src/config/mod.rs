//! # Momentum Configuration
//!
//! All tuning constants of the momentum pipeline in one place.
//!
//! ## Presets
//! - `realistic()`: default balance
//! - `arcade()`: bigger swings, longer effects
//! - `simulation()`: damped swings, faster recovery
//!
//! ## Usage
//! ```rust
//! use momentum_core::config::MomentumConfig;
//!
//! let config = MomentumConfig::default();
//! let arcade = MomentumConfig::arcade();
//! assert!(arcade.effect.base_magnitude > config.effect.base_magnitude);
//! ```

mod composure_config;
mod crowd_config;
mod impact_config;
mod meter_config;

pub use composure_config::{ComposureConfig, EffectConfig};
pub use crowd_config::CrowdConfig;
pub use impact_config::ImpactConfig;
pub use meter_config::MeterConfig;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MomentumError, Result};

/// Orchestrator tick settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Ticks per second (default: 10.0)
    pub update_frequency: f32,
    /// Start enabled after `initialize()` (default: true)
    pub start_enabled: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            update_frequency: 10.0,
            start_enabled: true,
        }
    }
}

/// Full momentum pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MomentumConfig {
    #[serde(default)]
    pub meter: MeterConfig,
    #[serde(default)]
    pub impact: ImpactConfig,
    #[serde(default)]
    pub effect: EffectConfig,
    #[serde(default)]
    pub crowd: CrowdConfig,
    #[serde(default)]
    pub composure: ComposureConfig,
    #[serde(default)]
    pub system: SystemConfig,
}

impl MomentumConfig {
    pub fn realistic() -> Self {
        Self::default()
    }

    pub fn arcade() -> Self {
        let mut cfg = Self::default();
        cfg.meter.decay_rate = 0.05;
        cfg.meter.threshold = 40.0;
        cfg.impact.tension_weight = 0.8;
        cfg.effect.base_magnitude = 15.0;
        cfg.effect.duration = 45.0;
        cfg.composure.effectiveness = 0.5;
        cfg
    }

    pub fn simulation() -> Self {
        let mut cfg = Self::default();
        cfg.meter.decay_rate = 0.15;
        cfg.meter.threshold = 60.0;
        cfg.impact.tension_weight = 0.3;
        cfg.effect.base_magnitude = 6.0;
        cfg.effect.duration = 20.0;
        cfg
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a `.json` file, anything else is parsed as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let cfg = if is_json {
            Self::from_json_str(&text)?
        } else {
            Self::from_yaml_str(&text)?
        };
        log::info!("Loaded momentum config from {:?}", path);
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let m = &self.meter;
        if m.min_momentum >= m.max_momentum {
            return Err(MomentumError::InvalidConfig(format!(
                "min_momentum {} must be below max_momentum {}",
                m.min_momentum, m.max_momentum
            )));
        }
        if m.threshold <= 0.0 || m.threshold > m.half_range() {
            return Err(MomentumError::InvalidConfig(format!(
                "threshold {} outside (0, {}]",
                m.threshold,
                m.half_range()
            )));
        }
        if m.decay_rate < 0.0 {
            return Err(MomentumError::InvalidConfig("decay_rate must be >= 0".into()));
        }
        if self.effect.duration <= 0.0 {
            return Err(MomentumError::InvalidConfig("effect duration must be > 0".into()));
        }
        if !(0.0..=1.0).contains(&self.composure.effectiveness) {
            return Err(MomentumError::InvalidConfig(
                "composure effectiveness must be within [0, 1]".into(),
            ));
        }
        let c = &self.crowd;
        if c.num_sections == 0 || c.away_sections + c.neutral_sections > c.num_sections {
            return Err(MomentumError::InvalidConfig(format!(
                "crowd layout {} away + {} neutral does not fit {} sections",
                c.away_sections, c.neutral_sections, c.num_sections
            )));
        }
        if c.max_noise_level <= 0.0 {
            return Err(MomentumError::InvalidConfig("max_noise_level must be > 0".into()));
        }
        if self.system.update_frequency <= 0.0 {
            return Err(MomentumError::InvalidConfig("update_frequency must be > 0".into()));
        }
        Ok(())
    }
}
