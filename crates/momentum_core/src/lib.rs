//! # momentum_core - Crowd Momentum Engine for American Football
//!
//! Tracks which side holds the momentum of a match, turns significant plays
//! into momentum swings, lets the crowd react, and hands timed stat effects
//! to the players of the team on the wrong end of a surge.
//!
//! ## Features
//! - Zero-sum home/away momentum meter with decay toward neutral
//! - Situation-scaled event impact (tension, late game, blowouts, venue)
//! - Sectioned crowd with per-affiliation cheering and booing
//! - Fading team-wide effects, mitigated by the coach's composure mode
//! - Deterministic crowd seating from a seed
//!
//! ## Usage
//! ```rust
//! use momentum_core::{
//!     CrowdMomentumSystem, EventType, GameEvent, GameState, Stadium, Team, TeamId,
//!     TeamRegistry, VenueType,
//! };
//!
//! let home = TeamId::new("HOME");
//! let away = TeamId::new("AWAY");
//! let state = GameState::new(home.clone(), away.clone());
//! let mut stadium = Stadium::new("S1", "Field", 60_000, VenueType::DomeStadium);
//! let mut teams = TeamRegistry::new();
//! teams.insert(Team::new(home.clone(), "Home", true));
//! teams.insert(Team::new(away, "Away", false));
//!
//! let mut system = CrowdMomentumSystem::default();
//! system.initialize().unwrap();
//! let mut play = GameEvent::for_state(EventType::Touchdown, home, &state);
//! let outcome = system
//!     .process_game_event(&mut play, &state, &mut stadium, &mut teams)
//!     .unwrap();
//! assert!(outcome.home_delta > 0.0);
//! system.tick(0.1, &mut stadium, &mut teams).unwrap();
//! ```

#![allow(clippy::too_many_arguments)]

pub mod coach;
pub mod composure;
pub mod config;
pub mod crowd;
pub mod effect;
pub mod error;
pub mod event;
pub mod game_state;
pub mod meter;
pub mod models;
pub mod player;
pub mod stadium;
pub mod system;
pub mod team;

pub use coach::Coach;
pub use composure::{ComposureState, TeamComposureMode};
pub use config::{
    ComposureConfig, CrowdConfig, EffectConfig, ImpactConfig, MeterConfig, MomentumConfig, SystemConfig,
};
pub use crowd::{Crowd, CrowdSection, SectionReaction};
pub use effect::{EffectArena, EffectId, EffectType, MomentumEffect};
pub use error::{MomentumError, Result};
pub use event::{EventType, GameEvent};
pub use game_state::GameState;
pub use meter::{MomentumLevel, MomentumMeter};
pub use models::{PlayerId, PlayerStats, Position, StatKind, TeamId, TeamSide};
pub use player::Player;
pub use stadium::{Stadium, VenueType};
pub use system::{CrowdMomentumSystem, EventOutcome, SystemState};
pub use team::{Team, TeamRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
