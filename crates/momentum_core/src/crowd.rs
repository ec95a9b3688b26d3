//! Crowd reaction and noise
//!
//! A `Crowd` is split into `CrowdSection`s, each supporting one team or
//! neutral. Sections react to plays individually; the crowd aggregates their
//! noise weighted by how full each section is.

use serde::{Deserialize, Serialize};

use crate::config::CrowdConfig;
use crate::event::GameEvent;
use crate::models::TeamId;

/// Impact that produces a reaction of intensity 1.0
const REFERENCE_IMPACT: f32 = 25.0;
const MIN_REACTION_INTENSITY: f32 = 0.2;
const MAX_REACTION_INTENSITY: f32 = 2.0;

const SECTION_MAX_NOISE: f32 = 100.0;
const SECTION_MAX_ENTHUSIASM: f32 = 100.0;
const SECTION_DEFAULT_ENTHUSIASM: f32 = 50.0;
const CROWD_DEFAULT_ENTHUSIASM: f32 = 50.0;

/// Noise and enthusiasm per unit of intensity
const CHEER_NOISE: f32 = 20.0;
const CHEER_ENTHUSIASM: f32 = 5.0;
const BOO_NOISE: f32 = 12.0;
const BOO_ENTHUSIASM: f32 = 3.0;

/// How a section answered the last play
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SectionReaction {
    Silent,
    Cheer(f32),
    Boo(f32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrowdSection {
    section_id: String,
    team_affiliation: Option<TeamId>,
    capacity: u32,
    current_attendance: u32,
    current_enthusiasm: f32,
    noise_contribution: f32,
    last_reaction: SectionReaction,
}

impl CrowdSection {
    /// New section, filled to capacity
    pub fn new(id: impl Into<String>, team: Option<TeamId>, capacity: u32) -> Self {
        Self {
            section_id: id.into(),
            team_affiliation: team,
            capacity,
            current_attendance: capacity,
            current_enthusiasm: SECTION_DEFAULT_ENTHUSIASM,
            noise_contribution: 0.0,
            last_reaction: SectionReaction::Silent,
        }
    }

    pub fn cheer(&mut self, intensity: f32) {
        let intensity = intensity.max(0.0);
        self.noise_contribution = (self.noise_contribution + CHEER_NOISE * intensity).min(SECTION_MAX_NOISE);
        self.set_enthusiasm(self.current_enthusiasm + CHEER_ENTHUSIASM * intensity);
        self.last_reaction = SectionReaction::Cheer(intensity);
    }

    pub fn boo(&mut self, intensity: f32) {
        let intensity = intensity.max(0.0);
        self.noise_contribution = (self.noise_contribution + BOO_NOISE * intensity).min(SECTION_MAX_NOISE);
        self.set_enthusiasm(self.current_enthusiasm - BOO_ENTHUSIASM * intensity);
        self.last_reaction = SectionReaction::Boo(intensity);
    }

    /// Cheer when the play helps the section's team, boo when it helps the
    /// other side. Neutral sections applaud at `neutral_factor` intensity.
    pub fn react_to_play(&mut self, event: &GameEvent, neutral_factor: f32) {
        let intensity = reaction_intensity(event);
        let Some(team) = &self.team_affiliation else {
            self.cheer(intensity * neutral_factor);
            return;
        };
        let own_team_acted = team == event.team();
        let good_for_actor = if event.has_impact() {
            event.momentum_impact() >= 0.0
        } else {
            event.event_type().favours_actor()
        };
        if own_team_acted == good_for_actor {
            self.cheer(intensity);
        } else {
            self.boo(intensity);
        }
    }

    /// Let noise fade by `rate` per second
    pub fn settle(&mut self, delta_time: f32, rate: f32) {
        let keep = (1.0 - rate.max(0.0) * delta_time.max(0.0)).max(0.0);
        self.noise_contribution *= keep;
    }

    pub fn reset(&mut self) {
        self.noise_contribution = 0.0;
        self.current_enthusiasm = SECTION_DEFAULT_ENTHUSIASM;
        self.last_reaction = SectionReaction::Silent;
    }

    pub fn noise_contribution(&self) -> f32 {
        self.noise_contribution
    }

    pub fn enthusiasm(&self) -> f32 {
        self.current_enthusiasm
    }

    pub fn team_affiliation(&self) -> Option<&TeamId> {
        self.team_affiliation.as_ref()
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn current_attendance(&self) -> u32 {
        self.current_attendance
    }

    /// Attendance / capacity, 0.0 for an empty-capacity section
    pub fn fill_rate(&self) -> f32 {
        if self.capacity == 0 {
            0.0
        } else {
            self.current_attendance as f32 / self.capacity as f32
        }
    }

    pub fn last_reaction(&self) -> SectionReaction {
        self.last_reaction
    }

    pub fn id(&self) -> &str {
        &self.section_id
    }

    /// Saturates at capacity
    pub fn set_attendance(&mut self, attendance: u32) {
        self.current_attendance = attendance.min(self.capacity);
    }

    pub fn set_enthusiasm(&mut self, enthusiasm: f32) {
        self.current_enthusiasm = enthusiasm.clamp(0.0, SECTION_MAX_ENTHUSIASM);
    }
}

/// Reaction size for a play, from its computed impact (or base impact if not computed yet)
fn reaction_intensity(event: &GameEvent) -> f32 {
    let impact = if event.has_impact() {
        event.momentum_impact()
    } else {
        event.event_type().base_impact()
    };
    (impact.abs() / REFERENCE_IMPACT).clamp(MIN_REACTION_INTENSITY, MAX_REACTION_INTENSITY)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crowd {
    noise_level: f32,
    enthusiasm: f32,
    crowd_sections: Vec<CrowdSection>,
    max_sections: usize,
    base_noise_level: f32,
    max_noise_level: f32,
    quiet_threshold: f32,
    loud_threshold: f32,
    neutral_reaction_factor: f32,
    noise_settle_rate: f32,
    /// Venue acoustics multiplier
    acoustics: f32,
}

impl Default for Crowd {
    fn default() -> Self {
        Self::from_config(&CrowdConfig::default())
    }
}

impl Crowd {
    pub fn new(num_sections: usize) -> Self {
        Self::from_config(&CrowdConfig {
            num_sections,
            ..CrowdConfig::default()
        })
    }

    pub fn from_config(config: &CrowdConfig) -> Self {
        let max_noise = config.max_noise_level.max(0.0);
        Self {
            noise_level: config.base_noise_level.clamp(0.0, max_noise),
            enthusiasm: CROWD_DEFAULT_ENTHUSIASM,
            crowd_sections: Vec::with_capacity(config.num_sections),
            max_sections: config.num_sections,
            base_noise_level: config.base_noise_level.max(0.0),
            max_noise_level: max_noise,
            quiet_threshold: config.quiet_threshold,
            loud_threshold: config.loud_threshold,
            neutral_reaction_factor: config.neutral_reaction_factor.clamp(0.0, 1.0),
            noise_settle_rate: config.noise_settle_rate.max(0.0),
            acoustics: 1.0,
        }
    }

    // ========================
    // Reactions
    // ========================

    pub fn react_to_event(&mut self, event: &GameEvent) {
        let before = self.weighted_section_enthusiasm();
        for section in &mut self.crowd_sections {
            section.react_to_play(event, self.neutral_reaction_factor);
        }
        let after = self.weighted_section_enthusiasm();
        self.update_enthusiasm(after - before);
        self.generate_noise();
        log::debug!(
            "Crowd reacted to {:?}: noise {:.1}, enthusiasm {:.1}",
            event.event_type(),
            self.noise_level,
            self.enthusiasm
        );
    }

    /// `(base + Σ noise_i * fill_i / n) * acoustics`, clamped to `[0, max]`
    pub fn generate_noise(&mut self) -> f32 {
        let weighted = if self.crowd_sections.is_empty() {
            0.0
        } else {
            self.crowd_sections
                .iter()
                .map(|s| s.noise_contribution() * s.fill_rate())
                .sum::<f32>()
                / self.crowd_sections.len() as f32
        };
        self.noise_level = ((self.base_noise_level + weighted) * self.acoustics).clamp(0.0, self.max_noise_level);
        self.noise_level
    }

    /// Per-tick fade of section noise
    pub fn update(&mut self, delta_time: f32) {
        for section in &mut self.crowd_sections {
            section.settle(delta_time, self.noise_settle_rate);
        }
        self.generate_noise();
    }

    pub fn update_enthusiasm(&mut self, adjustment: f32) {
        self.enthusiasm = (self.enthusiasm + adjustment).clamp(0.0, SECTION_MAX_ENTHUSIASM);
    }

    pub fn reset_crowd(&mut self) {
        for section in &mut self.crowd_sections {
            section.reset();
        }
        self.enthusiasm = CROWD_DEFAULT_ENTHUSIASM;
        self.generate_noise();
    }

    fn weighted_section_enthusiasm(&self) -> f32 {
        let attendance: u32 = self.crowd_sections.iter().map(|s| s.current_attendance()).sum();
        if attendance == 0 {
            return 0.0;
        }
        self.crowd_sections
            .iter()
            .map(|s| s.enthusiasm() * s.current_attendance() as f32)
            .sum::<f32>()
            / attendance as f32
    }

    // ========================
    // Queries
    // ========================

    pub fn noise_level(&self) -> f32 {
        self.noise_level
    }

    pub fn enthusiasm(&self) -> f32 {
        self.enthusiasm
    }

    /// Noise normalised to [0, 1]
    pub fn volume_level(&self) -> f32 {
        if self.max_noise_level <= 0.0 {
            return 0.0;
        }
        (self.noise_level / self.max_noise_level).clamp(0.0, 1.0)
    }

    pub fn is_quiet(&self) -> bool {
        self.noise_level < self.quiet_threshold
    }

    pub fn is_loud(&self) -> bool {
        self.noise_level > self.loud_threshold
    }

    pub fn sections(&self) -> &[CrowdSection] {
        &self.crowd_sections
    }

    pub fn sections_mut(&mut self) -> &mut [CrowdSection] {
        &mut self.crowd_sections
    }

    pub fn section(&self, id: &str) -> Option<&CrowdSection> {
        self.crowd_sections.iter().find(|s| s.id() == id)
    }

    /// Fill-weighted noise coming from sections backing `team`
    pub fn affiliated_noise(&self, team: &TeamId) -> f32 {
        self.crowd_sections
            .iter()
            .filter(|s| s.team_affiliation() == Some(team))
            .map(|s| s.noise_contribution() * s.fill_rate())
            .sum()
    }

    pub fn max_sections(&self) -> usize {
        self.max_sections
    }

    // ========================
    // Configuration
    // ========================

    pub fn set_base_noise_level(&mut self, level: f32) {
        self.base_noise_level = level.max(0.0);
        self.generate_noise();
    }

    pub fn set_max_noise_level(&mut self, level: f32) {
        self.max_noise_level = level.max(0.0);
        self.generate_noise();
    }

    pub(crate) fn set_acoustics(&mut self, acoustics: f32) {
        self.acoustics = acoustics.max(0.0);
        self.generate_noise();
    }

    /// Add a section; false once the crowd already has its fixed section count
    pub fn add_crowd_section(&mut self, team: Option<TeamId>, capacity: u32) -> bool {
        if self.crowd_sections.len() >= self.max_sections {
            log::warn!("Crowd already has {} sections, ignoring new section", self.max_sections);
            return false;
        }
        let id = format!("S{}", self.crowd_sections.len() + 1);
        self.crowd_sections.push(CrowdSection::new(id, team, capacity));
        true
    }

    /// Drop every section and allow `max_sections` new ones
    pub(crate) fn clear_sections(&mut self, max_sections: usize) {
        self.crowd_sections.clear();
        self.max_sections = max_sections;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventType;

    fn home() -> TeamId {
        TeamId::new("HOME")
    }

    fn away() -> TeamId {
        TeamId::new("AWAY")
    }

    fn crowd() -> Crowd {
        let mut c = Crowd::new(3);
        c.add_crowd_section(Some(home()), 1000);
        c.add_crowd_section(Some(away()), 1000);
        c.add_crowd_section(None, 1000);
        c
    }

    fn touchdown(team: TeamId, impact: f32) -> GameEvent {
        let mut e = GameEvent::new(EventType::Touchdown, team, true, 0.0);
        e.set_momentum_impact(impact);
        e
    }

    #[test]
    fn test_section_count_fixed() {
        let mut c = crowd();
        assert!(!c.add_crowd_section(None, 500));
        assert_eq!(c.sections().len(), 3);
    }

    #[test]
    fn test_attendance_saturates() {
        let mut s = CrowdSection::new("S1", None, 100);
        s.set_attendance(500);
        assert_eq!(s.current_attendance(), 100);
        s.set_attendance(25);
        assert!((s.fill_rate() - 0.25).abs() < 0.001);
    }

    #[test]
    fn test_sections_split_by_affiliation() {
        let mut c = crowd();
        c.react_to_event(&touchdown(home(), 25.0));

        assert_eq!(c.sections()[0].last_reaction(), SectionReaction::Cheer(1.0));
        assert_eq!(c.sections()[1].last_reaction(), SectionReaction::Boo(1.0));
        assert_eq!(c.sections()[2].last_reaction(), SectionReaction::Cheer(0.5));
        assert!(c.sections()[0].enthusiasm() > c.sections()[1].enthusiasm());
    }

    #[test]
    fn test_own_fumble_draws_boos() {
        let mut c = crowd();
        let mut fumble = GameEvent::new(EventType::Fumble, home(), true, 0.0);
        fumble.set_momentum_impact(-15.0);
        c.react_to_event(&fumble);
        assert!(matches!(c.sections()[0].last_reaction(), SectionReaction::Boo(_)));
        assert!(matches!(c.sections()[1].last_reaction(), SectionReaction::Cheer(_)));
    }

    #[test]
    fn test_noise_weighted_by_fill() {
        let mut c = crowd();
        c.react_to_event(&touchdown(home(), 25.0));
        let full = c.noise_level();

        let mut half = crowd();
        for s in half.sections_mut() {
            s.set_attendance(500);
        }
        half.react_to_event(&touchdown(home(), 25.0));

        // full: 40 + (20 + 12 + 10) / 3 = 54
        assert!((full - 54.0).abs() < 0.01);
        assert!((half.noise_level() - 47.0).abs() < 0.01);
    }

    #[test]
    fn test_noise_clamped_and_volume_normalised() {
        let mut c = crowd();
        c.set_max_noise_level(60.0);
        for _ in 0..20 {
            c.react_to_event(&touchdown(home(), 50.0));
        }
        assert!((c.noise_level() - 60.0).abs() < 0.001);
        assert!((c.volume_level() - 1.0).abs() < 0.001);
        assert!(!c.is_loud());
    }

    #[test]
    fn test_noise_settles_back_to_base() {
        let mut c = crowd();
        c.react_to_event(&touchdown(home(), 25.0));
        assert!(!c.is_quiet());
        for _ in 0..100 {
            c.update(0.5);
        }
        assert!((c.noise_level() - 40.0).abs() < 0.01);
        assert!(c.is_quiet());
    }

    #[test]
    fn test_reset_crowd() {
        let mut c = crowd();
        c.react_to_event(&touchdown(home(), 25.0));
        c.reset_crowd();
        assert!((c.noise_level() - 40.0).abs() < 0.001);
        assert!((c.enthusiasm() - 50.0).abs() < 0.001);
        assert_eq!(c.sections()[1].last_reaction(), SectionReaction::Silent);
    }

    #[test]
    fn test_affiliated_noise() {
        let mut c = crowd();
        c.react_to_event(&touchdown(home(), 25.0));
        assert!((c.affiliated_noise(&home()) - 20.0).abs() < 0.001);
        assert!((c.affiliated_noise(&away()) - 12.0).abs() < 0.001);
    }
}
