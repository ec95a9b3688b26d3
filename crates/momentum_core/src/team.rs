//! Teams and the roster registry
//!
//! A `Team` owns its players, its coach and its composure mode. Other
//! components refer to teams by `TeamId` through `TeamRegistry`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::coach::Coach;
use crate::composure::TeamComposureMode;
use crate::config::ComposureConfig;
use crate::models::{PlayerId, TeamId};
use crate::player::Player;

pub const MIN_MORALE: f32 = 0.0;
pub const MAX_MORALE: f32 = 100.0;
pub const DEFAULT_MORALE: f32 = 50.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    team_id: TeamId,
    team_name: String,
    is_home_team: bool,
    players: Vec<Player>,
    coach: Option<Coach>,
    composure: TeamComposureMode,
    team_morale: f32,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>, is_home: bool) -> Self {
        Self::with_composure(id, name, is_home, &ComposureConfig::default())
    }

    pub fn with_composure(
        id: TeamId,
        name: impl Into<String>,
        is_home: bool,
        composure: &ComposureConfig,
    ) -> Self {
        Self {
            team_id: id,
            team_name: name.into(),
            is_home_team: is_home,
            players: Vec::new(),
            coach: None,
            composure: TeamComposureMode::from_config(composure),
            team_morale: DEFAULT_MORALE,
        }
    }

    // ========================
    // Player Management
    // ========================

    /// Add a player, taking over its team back-reference.
    /// Rejected (returns false) when the id is already on the roster.
    pub fn add_player(&mut self, mut player: Player) -> bool {
        if self.players.iter().any(|p| p.id() == player.id()) {
            log::warn!("Team {}: duplicate player id {}", self.team_id, player.id());
            return false;
        }
        player.set_team(self.team_id.clone());
        // Ids from a previous team's effects mean nothing here
        player.clear_all_effects();
        self.players.push(player);
        true
    }

    pub fn remove_player(&mut self, player_id: &PlayerId) -> Option<Player> {
        let idx = self.players.iter().position(|p| p.id() == player_id)?;
        Some(self.players.remove(idx))
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    pub fn player(&self, player_id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == player_id)
    }

    pub fn player_mut(&mut self, player_id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id() == player_id)
    }

    // ========================
    // Properties
    // ========================

    pub fn id(&self) -> &TeamId {
        &self.team_id
    }

    pub fn name(&self) -> &str {
        &self.team_name
    }

    pub fn is_home_team(&self) -> bool {
        self.is_home_team
    }

    pub fn coach(&self) -> Option<&Coach> {
        self.coach.as_ref()
    }

    pub fn set_coach(&mut self, mut coach: Coach) {
        coach.set_team(self.team_id.clone());
        self.coach = Some(coach);
    }

    // ========================
    // Composure
    // ========================

    /// Coach calls composure mode. Teams without a coach can still use it,
    /// just without a leadership bonus.
    pub fn activate_composure_mode(&mut self) -> bool {
        let activated = match &self.coach {
            Some(coach) => coach.activate_team_composure(&mut self.composure),
            None => self.composure.activate(None),
        };
        if !activated {
            log::debug!(
                "Team {}: composure unavailable, cooldown {:.1}s",
                self.team_id,
                self.composure.cooldown_remaining()
            );
        }
        activated
    }

    pub fn deactivate_composure_mode(&mut self) {
        self.composure.deactivate();
    }

    pub fn is_composure_mode_active(&self) -> bool {
        self.composure.is_active()
    }

    pub fn composure(&self) -> &TeamComposureMode {
        &self.composure
    }

    /// Share of adverse effect strength removed for this team's players
    pub fn composure_mitigation(&self) -> f32 {
        self.composure.mitigation_factor()
    }

    pub fn update_composure(&mut self, delta_time: f32) {
        self.composure.update(delta_time);
    }

    pub fn set_composure_cooldown(&mut self, cooldown: f32) {
        self.composure.set_cooldown_time(cooldown);
    }

    pub fn reset_composure_cooldown(&mut self) {
        self.composure.reset();
    }

    // ========================
    // Morale
    // ========================

    pub fn set_morale(&mut self, morale: f32) {
        self.team_morale = morale.clamp(MIN_MORALE, MAX_MORALE);
    }

    pub fn adjust_morale(&mut self, delta: f32) {
        self.set_morale(self.team_morale + delta);
    }

    pub fn morale(&self) -> f32 {
        self.team_morale
    }
}

/// Externally owned set of teams, looked up by id
#[derive(Debug, Clone, Default)]
pub struct TeamRegistry {
    teams: BTreeMap<TeamId, Team>,
}

impl TeamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; returns the team previously stored under the id
    pub fn insert(&mut self, team: Team) -> Option<Team> {
        self.teams.insert(team.id().clone(), team)
    }

    pub fn remove(&mut self, id: &TeamId) -> Option<Team> {
        self.teams.remove(id)
    }

    pub fn get(&self, id: &TeamId) -> Option<&Team> {
        self.teams.get(id)
    }

    pub fn get_mut(&mut self, id: &TeamId) -> Option<&mut Team> {
        self.teams.get_mut(id)
    }

    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }

    pub fn teams_mut(&mut self) -> impl Iterator<Item = &mut Team> {
        self.teams.values_mut()
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}
