//! Shared identifiers and attribute bundles

pub mod ids;
pub mod stats;

pub use ids::{PlayerId, TeamId, TeamSide};
pub use stats::{PlayerStats, Position, StatKind};
