//! Game events that move momentum
//!
//! An event is fixed at construction except for its momentum impact, which is
//! filled in later from the match situation.

use serde::{Deserialize, Serialize};

use crate::config::ImpactConfig;
use crate::game_state::GameState;
use crate::models::{PlayerId, TeamId, TeamSide};

/// Significant plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Touchdown,
    Interception,
    Sack,
    FourthDownStop,
    Fumble,
    FieldGoal,
    Penalty,
    Safety,
    Turnover,
}

impl EventType {
    /// Momentum swing before game-context scaling, from the acting team's side.
    ///
    /// Fumble and Turnover are committed by the acting team, so they are negative.
    /// Penalty is credited to the team the flag favoured.
    pub fn base_impact(self) -> f32 {
        match self {
            EventType::Touchdown => 25.0,
            EventType::Interception => 20.0,
            EventType::Safety => 20.0,
            EventType::FourthDownStop => 15.0,
            EventType::FieldGoal => 10.0,
            EventType::Sack => 8.0,
            EventType::Penalty => 5.0,
            EventType::Fumble => -15.0,
            EventType::Turnover => -18.0,
        }
    }

    /// Whether the acting team is the one that benefits
    pub fn favours_actor(self) -> bool {
        self.base_impact() >= 0.0
    }
}

/// A play worth reacting to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEvent {
    event_type: EventType,
    team: TeamId,
    player: Option<PlayerId>,
    momentum_impact: Option<f32>,
    timestamp: f32,
    is_home_team_event: bool,
}

impl GameEvent {
    pub fn new(event_type: EventType, team: TeamId, is_home_team_event: bool, timestamp: f32) -> Self {
        Self {
            event_type,
            team,
            player: None,
            momentum_impact: None,
            timestamp: timestamp.max(0.0),
            is_home_team_event,
        }
    }

    /// Build an event for `team`, reading side and timestamp from the match
    pub fn for_state(event_type: EventType, team: TeamId, state: &GameState) -> Self {
        let is_home = state.side_of(&team) == Some(TeamSide::Home);
        let timestamp = state.elapsed_regulation_seconds() as f32;
        Self::new(event_type, team, is_home, timestamp)
    }

    pub fn with_player(mut self, player: PlayerId) -> Self {
        self.player = Some(player);
        self
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn team(&self) -> &TeamId {
        &self.team
    }

    pub fn player(&self) -> Option<&PlayerId> {
        self.player.as_ref()
    }

    /// Impact if already computed, 0.0 otherwise
    pub fn momentum_impact(&self) -> f32 {
        self.momentum_impact.unwrap_or(0.0)
    }

    pub fn has_impact(&self) -> bool {
        self.momentum_impact.is_some()
    }

    pub fn timestamp(&self) -> f32 {
        self.timestamp
    }

    pub fn is_home_team_event(&self) -> bool {
        self.is_home_team_event
    }

    pub fn side(&self) -> TeamSide {
        TeamSide::from_is_home(self.is_home_team_event)
    }

    /// Scale the base impact by the match situation and store it
    ///
    /// - tension: `1 + tension * tension_weight`
    /// - late game: `late_game_multiplier`
    /// - blowout: `blowout_damper`
    pub fn calculate_momentum_impact(&mut self, state: &GameState, config: &ImpactConfig) -> f32 {
        let mut impact = self.event_type.base_impact();
        impact *= 1.0 + state.game_tension() * config.tension_weight;
        if state.is_late_game() {
            impact *= config.late_game_multiplier;
        }
        if state.score_difference().unsigned_abs() > config.blowout_margin {
            impact *= config.blowout_damper;
        }
        self.momentum_impact = Some(impact);
        impact
    }

    pub fn set_momentum_impact(&mut self, impact: f32) {
        self.momentum_impact = Some(impact);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(TeamId::new("HOME"), TeamId::new("AWAY"))
    }

    #[test]
    fn test_turnovers_hurt_the_actor() {
        assert!(EventType::Touchdown.favours_actor());
        assert!(!EventType::Fumble.favours_actor());
        assert!(!EventType::Turnover.favours_actor());
        assert!(EventType::Penalty.base_impact() < EventType::Sack.base_impact());
    }

    #[test]
    fn test_for_state_reads_side() {
        let s = state();
        let home = GameEvent::for_state(EventType::Sack, TeamId::new("HOME"), &s);
        let away = GameEvent::for_state(EventType::Sack, TeamId::new("AWAY"), &s);
        assert!(home.is_home_team_event());
        assert_eq!(away.side(), TeamSide::Away);
    }

    #[test]
    fn test_impact_deferred_until_calculated() {
        let mut e = GameEvent::new(EventType::Touchdown, TeamId::new("HOME"), true, 10.0);
        assert!(!e.has_impact());
        assert!(e.momentum_impact().abs() < 0.001);

        let impact = e.calculate_momentum_impact(&state(), &ImpactConfig::default());
        assert!(e.has_impact());
        // kickoff tension 0.5 -> 25 * 1.25
        assert!((impact - 31.25).abs() < 0.01);
    }

    #[test]
    fn test_late_close_game_amplifies() {
        let cfg = ImpactConfig::default();
        let early = state();
        let mut late = state();
        late.set_time(4, 60);

        let mut e1 = GameEvent::new(EventType::Touchdown, TeamId::new("HOME"), true, 0.0);
        let mut e2 = e1.clone();
        let early_impact = e1.calculate_momentum_impact(&early, &cfg);
        let late_impact = e2.calculate_momentum_impact(&late, &cfg);
        assert!(late_impact > early_impact * cfg.late_game_multiplier);
    }

    #[test]
    fn test_blowout_dampens() {
        let cfg = ImpactConfig::default();
        let mut blowout = state();
        blowout.update_score(&TeamId::new("HOME"), 35);

        let mut e = GameEvent::new(EventType::Touchdown, TeamId::new("HOME"), true, 0.0);
        let impact = e.calculate_momentum_impact(&blowout, &cfg);
        assert!(impact < EventType::Touchdown.base_impact() * 0.6);
    }

    #[test]
    fn test_fumble_impact_negative() {
        let mut e = GameEvent::new(EventType::Fumble, TeamId::new("AWAY"), false, 0.0);
        assert!(e.calculate_momentum_impact(&state(), &ImpactConfig::default()) < 0.0);
    }
}
