//! Head coach
//!
//! The coach calls composure mode; the cooldown itself lives in the team's
//! `TeamComposureMode`. Leadership shifts how well the mode works.

use serde::{Deserialize, Serialize};

use crate::composure::TeamComposureMode;
use crate::models::TeamId;

pub const MIN_LEADERSHIP: u8 = 1;
pub const MAX_LEADERSHIP: u8 = 100;
/// Leadership rating with no bonus or malus
const NEUTRAL_LEADERSHIP: f32 = 50.0;
/// Bonus at the top of the scale
const MAX_LEADERSHIP_BONUS: f32 = 0.1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coach {
    coach_id: String,
    coach_name: String,
    team: TeamId,
    leadership_rating: u8,
}

impl Coach {
    pub fn new(id: impl Into<String>, name: impl Into<String>, team: TeamId, leadership: u8) -> Self {
        Self {
            coach_id: id.into(),
            coach_name: name.into(),
            team,
            leadership_rating: leadership.clamp(MIN_LEADERSHIP, MAX_LEADERSHIP),
        }
    }

    /// Share added to composure effectiveness and removed from cooldown.
    ///
    /// Linear from about -0.1 (rating 1) through 0.0 (rating 50) to +0.1 (rating 100).
    pub fn leadership_bonus(&self) -> f32 {
        (self.leadership_rating as f32 - NEUTRAL_LEADERSHIP) / NEUTRAL_LEADERSHIP * MAX_LEADERSHIP_BONUS
    }

    pub fn can_activate_composure(&self, mode: &TeamComposureMode) -> bool {
        mode.can_activate()
    }

    /// Call composure mode for the team. False while on cooldown.
    pub fn activate_team_composure(&self, mode: &mut TeamComposureMode) -> bool {
        mode.activate(Some(self))
    }

    pub fn leadership_rating(&self) -> u8 {
        self.leadership_rating
    }

    pub fn set_leadership_rating(&mut self, rating: u8) {
        self.leadership_rating = rating.clamp(MIN_LEADERSHIP, MAX_LEADERSHIP);
    }

    pub fn team(&self) -> &TeamId {
        &self.team
    }

    pub(crate) fn set_team(&mut self, team: TeamId) {
        self.team = team;
    }

    pub fn id(&self) -> &str {
        &self.coach_id
    }

    pub fn name(&self) -> &str {
        &self.coach_name
    }
}
