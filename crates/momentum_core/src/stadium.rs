//! Stadium and venue modifiers

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::CrowdConfig;
use crate::crowd::Crowd;
use crate::models::{TeamId, TeamSide};

const MIN_RIVALRY_FACTOR: f32 = 1.0;
const MAX_RIVALRY_FACTOR: f32 = 2.0;
const MIN_HOME_FIELD_ADVANTAGE: f32 = 1.0;
const MAX_HOME_FIELD_ADVANTAGE: f32 = 1.5;
const DEFAULT_HOME_FIELD_ADVANTAGE: f32 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VenueType {
    SmallStadium,
    MediumStadium,
    LargeStadium,
    DomeStadium,
    OutdoorStadium,
}

impl VenueType {
    /// Acoustic multiplier on crowd noise
    pub fn noise_bonus(self) -> f32 {
        match self {
            VenueType::SmallStadium => 0.9,
            VenueType::MediumStadium => 1.0,
            VenueType::LargeStadium => 1.1,
            VenueType::DomeStadium => 1.2,
            VenueType::OutdoorStadium => 0.95,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stadium {
    stadium_id: String,
    stadium_name: String,
    capacity: u32,
    crowd: Crowd,
    venue_type: VenueType,
    rivalry_factor: f32,
    home_field_advantage: f32,
}

impl Stadium {
    pub fn new(id: impl Into<String>, name: impl Into<String>, capacity: u32, venue_type: VenueType) -> Self {
        Self::with_crowd_config(id, name, capacity, venue_type, &CrowdConfig::default())
    }

    pub fn with_crowd_config(
        id: impl Into<String>,
        name: impl Into<String>,
        capacity: u32,
        venue_type: VenueType,
        config: &CrowdConfig,
    ) -> Self {
        let mut crowd = Crowd::from_config(config);
        crowd.set_acoustics(venue_type.noise_bonus());
        Self {
            stadium_id: id.into(),
            stadium_name: name.into(),
            capacity,
            crowd,
            venue_type,
            rivalry_factor: MIN_RIVALRY_FACTOR,
            home_field_advantage: DEFAULT_HOME_FIELD_ADVANTAGE,
        }
    }

    /// Split the stadium into sections and seat the fans.
    ///
    /// The last `away_sections + neutral_sections` sections go to away fans
    /// and neutrals, the rest to the home side. Fill rate per section is
    /// drawn from `[min_fill_rate, 1.0]` with a seeded RNG, so the same seed
    /// always seats the same crowd.
    pub fn initialize_crowd(&mut self, home: &TeamId, away: &TeamId, config: &CrowdConfig, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let sections = config.num_sections.max(1);
        let per_section = self.capacity / sections as u32;
        let home_sections = sections.saturating_sub(config.away_sections + config.neutral_sections);
        let min_fill = config.min_fill_rate.clamp(0.0, 1.0);

        self.crowd.clear_sections(sections);
        for idx in 0..sections {
            let affiliation = if idx < home_sections {
                Some(home.clone())
            } else if idx < home_sections + config.away_sections {
                Some(away.clone())
            } else {
                None
            };
            self.crowd.add_crowd_section(affiliation, per_section);
        }
        for section in self.crowd.sections_mut() {
            let fill: f32 = if min_fill < 1.0 {
                rng.gen_range(min_fill..=1.0)
            } else {
                1.0
            };
            section.set_attendance((section.capacity() as f32 * fill).round() as u32);
        }
        self.crowd.reset_crowd();
        log::info!(
            "Stadium {}: {} sections seated ({} home, {} away), attendance {}",
            self.stadium_name,
            sections,
            home_sections,
            config.away_sections,
            self.attendance()
        );
    }

    // ========================
    // Properties
    // ========================

    pub fn crowd(&self) -> &Crowd {
        &self.crowd
    }

    pub fn crowd_mut(&mut self) -> &mut Crowd {
        &mut self.crowd
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn attendance(&self) -> u32 {
        self.crowd.sections().iter().map(|s| s.current_attendance()).sum()
    }

    pub fn venue_type(&self) -> VenueType {
        self.venue_type
    }

    pub fn name(&self) -> &str {
        &self.stadium_name
    }

    pub fn id(&self) -> &str {
        &self.stadium_id
    }

    // ========================
    // Game Modifiers
    // ========================

    pub fn rivalry_multiplier(&self) -> f32 {
        self.rivalry_factor
    }

    pub fn venue_bonus(&self) -> f32 {
        self.venue_type.noise_bonus()
    }

    pub fn home_field_advantage(&self) -> f32 {
        self.home_field_advantage
    }

    /// Multiplier on an event's momentum impact: rivalry always applies,
    /// home-field advantage only to home plays
    pub fn impact_multiplier(&self, side: TeamSide) -> f32 {
        match side {
            TeamSide::Home => self.rivalry_factor * self.home_field_advantage,
            TeamSide::Away => self.rivalry_factor,
        }
    }

    pub fn set_rivalry_factor(&mut self, factor: f32) {
        self.rivalry_factor = factor.clamp(MIN_RIVALRY_FACTOR, MAX_RIVALRY_FACTOR);
    }

    pub fn set_home_field_advantage(&mut self, advantage: f32) {
        self.home_field_advantage = advantage.clamp(MIN_HOME_FIELD_ADVANTAGE, MAX_HOME_FIELD_ADVANTAGE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stadium() -> Stadium {
        Stadium::new("STD1", "Test Field", 80_000, VenueType::LargeStadium)
    }

    #[test]
    fn test_initialize_crowd_layout() {
        let mut s = stadium();
        let cfg = CrowdConfig::default();
        s.initialize_crowd(&TeamId::new("HOME"), &TeamId::new("AWAY"), &cfg, 42);

        let sections = s.crowd().sections();
        assert_eq!(sections.len(), 8);
        let home = sections.iter().filter(|x| x.team_affiliation() == Some(&TeamId::new("HOME"))).count();
        let away = sections.iter().filter(|x| x.team_affiliation() == Some(&TeamId::new("AWAY"))).count();
        let neutral = sections.iter().filter(|x| x.team_affiliation().is_none()).count();
        assert_eq!((home, away, neutral), (6, 1, 1));
        assert!(s.attendance() <= s.capacity());
        assert!(s.attendance() as f32 >= s.capacity() as f32 * 0.74);
    }

    #[test]
    fn test_same_seed_same_crowd() {
        let cfg = CrowdConfig::default();
        let mut a = stadium();
        let mut b = stadium();
        a.initialize_crowd(&TeamId::new("HOME"), &TeamId::new("AWAY"), &cfg, 7);
        b.initialize_crowd(&TeamId::new("HOME"), &TeamId::new("AWAY"), &cfg, 7);
        assert_eq!(a.attendance(), b.attendance());
    }

    #[test]
    fn test_reinitialize_replaces_sections() {
        let cfg = CrowdConfig::default();
        let mut s = stadium();
        s.initialize_crowd(&TeamId::new("HOME"), &TeamId::new("AWAY"), &cfg, 1);
        s.initialize_crowd(&TeamId::new("HOME"), &TeamId::new("AWAY"), &cfg, 2);
        assert_eq!(s.crowd().sections().len(), 8);
    }

    #[test]
    fn test_dome_is_loudest() {
        let dome = Stadium::new("D", "Dome", 60_000, VenueType::DomeStadium);
        let small = Stadium::new("S", "Small", 20_000, VenueType::SmallStadium);
        assert!(dome.venue_bonus() > small.venue_bonus());
        // base noise scaled by acoustics
        assert!((dome.crowd().noise_level() - 48.0).abs() < 0.01);
    }

    #[test]
    fn test_modifiers_clamped() {
        let mut s = stadium();
        s.set_rivalry_factor(5.0);
        s.set_home_field_advantage(0.2);
        assert!((s.rivalry_multiplier() - 2.0).abs() < 0.001);
        assert!((s.home_field_advantage() - 1.0).abs() < 0.001);
        assert!((s.impact_multiplier(TeamSide::Home) - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_home_field_only_for_home_plays() {
        let s = stadium();
        assert!((s.impact_multiplier(TeamSide::Home) - 1.1).abs() < 0.001);
        assert!((s.impact_multiplier(TeamSide::Away) - 1.0).abs() < 0.001);
    }
}
