//! Match clock, score and tension
//!
//! The surrounding match loop owns the clock and the score. This core only
//! reads them, plus the derived `game_tension` used to scale event impact.

use serde::{Deserialize, Serialize};

use crate::config::ImpactConfig;
use crate::models::{TeamId, TeamSide};

/// Length of a regulation quarter in seconds
pub const QUARTER_SECONDS: u32 = 900;
/// Regulation quarters; anything past this is overtime
pub const REGULATION_QUARTERS: u32 = 4;
/// Overtime period length in seconds
pub const OVERTIME_SECONDS: u32 = 600;

/// Score difference beyond which closeness contributes nothing
const TENSION_SCORE_SPAN: f32 = 28.0;
const TENSION_CLOSENESS_WEIGHT: f32 = 0.5;
const TENSION_LATENESS_WEIGHT: f32 = 0.3;
const TENSION_RIVALRY_BONUS: f32 = 0.1;
const TENSION_PLAYOFF_BONUS: f32 = 0.1;

/// Authoritative match situation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    current_quarter: u32,
    time_remaining: u32,
    home_score: u32,
    away_score: u32,
    home_team: TeamId,
    away_team: TeamId,
    is_rivalry_game: bool,
    is_playoff_game: bool,
    game_tension: f32,
    late_game_seconds: u32,
    close_game_margin: u32,
}

impl GameState {
    pub fn new(home_team: TeamId, away_team: TeamId) -> Self {
        Self::with_config(home_team, away_team, &ImpactConfig::default())
    }

    pub fn with_config(home_team: TeamId, away_team: TeamId, config: &ImpactConfig) -> Self {
        let mut state = Self {
            current_quarter: 1,
            time_remaining: QUARTER_SECONDS,
            home_score: 0,
            away_score: 0,
            home_team,
            away_team,
            is_rivalry_game: false,
            is_playoff_game: false,
            game_tension: 0.0,
            late_game_seconds: config.late_game_seconds,
            close_game_margin: config.close_game_margin,
        };
        state.calculate_game_tension();
        state
    }

    // ========================
    // Time
    // ========================

    pub fn current_quarter(&self) -> u32 {
        self.current_quarter
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    /// Jump the clock; quarter is floored at 1 and time at the period length
    pub fn set_time(&mut self, quarter: u32, time_remaining: u32) {
        self.current_quarter = quarter.max(1);
        self.time_remaining = time_remaining.min(self.period_length());
        self.calculate_game_tension();
    }

    /// Run the clock down by `seconds`, rolling into the next regulation
    /// quarter when one expires. The clock stops at 0:00 of the 4th quarter
    /// and of overtime; starting overtime is the match loop's call.
    pub fn update_time(&mut self, seconds: u32) {
        let mut left = seconds;
        while left > 0 {
            if self.time_remaining > left {
                self.time_remaining -= left;
                left = 0;
            } else {
                left -= self.time_remaining;
                self.time_remaining = 0;
                if self.current_quarter < REGULATION_QUARTERS {
                    self.current_quarter += 1;
                    self.time_remaining = QUARTER_SECONDS;
                } else {
                    break;
                }
            }
        }
        self.calculate_game_tension();
    }

    fn period_length(&self) -> u32 {
        if self.current_quarter > REGULATION_QUARTERS {
            OVERTIME_SECONDS
        } else {
            QUARTER_SECONDS
        }
    }

    /// Seconds played so far, overtime excluded
    pub fn elapsed_regulation_seconds(&self) -> u32 {
        let quarter = self.current_quarter.min(REGULATION_QUARTERS);
        let played_quarters = (quarter - 1) * QUARTER_SECONDS;
        if self.current_quarter > REGULATION_QUARTERS {
            REGULATION_QUARTERS * QUARTER_SECONDS
        } else {
            played_quarters + (QUARTER_SECONDS - self.time_remaining)
        }
    }

    // ========================
    // Score
    // ========================

    pub fn home_score(&self) -> u32 {
        self.home_score
    }

    pub fn away_score(&self) -> u32 {
        self.away_score
    }

    /// Home minus away, saturating at the `i32` range
    pub fn score_difference(&self) -> i32 {
        let diff = i64::from(self.home_score) - i64::from(self.away_score);
        diff.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }

    /// Add points for `team`, saturating at `u32::MAX`. Unknown team ids are ignored.
    pub fn update_score(&mut self, team: &TeamId, points: u32) {
        match self.side_of(team) {
            Some(TeamSide::Home) => self.home_score = self.home_score.saturating_add(points),
            Some(TeamSide::Away) => self.away_score = self.away_score.saturating_add(points),
            None => {
                log::warn!("update_score: team {} is not playing in this match", team);
                return;
            }
        }
        self.calculate_game_tension();
    }

    // ========================
    // Analysis
    // ========================

    pub fn is_late_game(&self) -> bool {
        self.current_quarter > REGULATION_QUARTERS
            || (self.current_quarter == REGULATION_QUARTERS
                && self.time_remaining <= self.late_game_seconds)
    }

    pub fn is_close_game(&self) -> bool {
        self.score_difference().unsigned_abs() <= self.close_game_margin
    }

    pub fn is_rivalry_game(&self) -> bool {
        self.is_rivalry_game
    }

    pub fn is_playoff_game(&self) -> bool {
        self.is_playoff_game
    }

    /// Cached tension in [0, 1]
    pub fn game_tension(&self) -> f32 {
        self.game_tension
    }

    /// Recompute tension from closeness, lateness and the occasion.
    ///
    /// closeness: 1.0 at a tie, 0.0 at a 28+ point gap
    /// lateness: share of regulation played (overtime counts as 1.0)
    pub fn calculate_game_tension(&mut self) {
        let gap = self.score_difference().unsigned_abs() as f32;
        let closeness = 1.0 - (gap / TENSION_SCORE_SPAN).min(1.0);
        let lateness =
            self.elapsed_regulation_seconds() as f32 / (REGULATION_QUARTERS * QUARTER_SECONDS) as f32;

        let mut tension = closeness * TENSION_CLOSENESS_WEIGHT + lateness * TENSION_LATENESS_WEIGHT;
        if self.is_rivalry_game {
            tension += TENSION_RIVALRY_BONUS;
        }
        if self.is_playoff_game {
            tension += TENSION_PLAYOFF_BONUS;
        }
        self.game_tension = tension.clamp(0.0, 1.0);
    }

    // ========================
    // Teams
    // ========================

    pub fn home_team(&self) -> &TeamId {
        &self.home_team
    }

    pub fn away_team(&self) -> &TeamId {
        &self.away_team
    }

    pub fn team(&self, side: TeamSide) -> &TeamId {
        match side {
            TeamSide::Home => &self.home_team,
            TeamSide::Away => &self.away_team,
        }
    }

    pub fn side_of(&self, team: &TeamId) -> Option<TeamSide> {
        if *team == self.home_team {
            Some(TeamSide::Home)
        } else if *team == self.away_team {
            Some(TeamSide::Away)
        } else {
            None
        }
    }

    pub fn set_rivalry_status(&mut self, is_rivalry: bool) {
        self.is_rivalry_game = is_rivalry;
        self.calculate_game_tension();
    }

    pub fn set_playoff_status(&mut self, is_playoff: bool) {
        self.is_playoff_game = is_playoff;
        self.calculate_game_tension();
    }
}
