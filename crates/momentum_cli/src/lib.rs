//! Scenario Runner
//!
//! Scripted match driver for `momentum_core`: reads a scenario (teams,
//! stadium, timed plays and composure calls), plays it through a
//! `CrowdMomentumSystem` at the configured tick rate and records a timeline.
//!
//! Scenarios are JSON (`.json`) or YAML (anything else).

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use momentum_core::{
    Coach, CrowdMomentumSystem, EventType, GameEvent, GameState, MomentumConfig, MomentumLevel, Player,
    PlayerId, Position, Stadium, Team, TeamId, TeamRegistry, TeamSide, VenueType,
};

/// Slack for float drift when matching sample times
const SAMPLE_TOLERANCE: f32 = 1e-3;

fn default_sample_every() -> f32 {
    5.0
}

fn default_quarter() -> u32 {
    1
}

fn default_time_remaining() -> u32 {
    momentum_core::game_state::QUARTER_SECONDS
}

fn default_leadership() -> u8 {
    50
}

/// A scripted match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub home: TeamSpec,
    pub away: TeamSpec,
    pub stadium: StadiumSpec,
    /// Seed for crowd seating
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub rivalry: bool,
    #[serde(default)]
    pub playoff: bool,
    #[serde(default = "default_quarter")]
    pub start_quarter: u32,
    #[serde(default = "default_time_remaining")]
    pub start_time_remaining: u32,
    #[serde(default)]
    pub home_score: u32,
    #[serde(default)]
    pub away_score: u32,
    /// Seconds of match to run after the start
    pub duration: f32,
    /// Timeline sampling interval in seconds
    #[serde(default = "default_sample_every")]
    pub sample_every: f32,
    #[serde(default)]
    pub plays: Vec<ScriptedPlay>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub coach: Option<CoachSpec>,
    #[serde(default)]
    pub players: Vec<PlayerSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachSpec {
    pub name: String,
    #[serde(default = "default_leadership")]
    pub leadership: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub id: String,
    pub name: String,
    pub position: Position,
    #[serde(default)]
    pub composure: Option<f32>,
    #[serde(default)]
    pub immune: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StadiumSpec {
    pub name: String,
    pub capacity: u32,
    pub venue: VenueType,
    #[serde(default)]
    pub rivalry_factor: Option<f32>,
    #[serde(default)]
    pub home_field_advantage: Option<f32>,
}

/// Something that happens `at` seconds after the scenario starts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedPlay {
    pub at: f32,
    pub side: TeamSide,
    #[serde(flatten)]
    pub action: PlayAction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayAction {
    Event {
        event: EventType,
        #[serde(default)]
        points: u32,
    },
    Composure,
}

/// Meter, crowd and team state at one point in time
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub at: f32,
    pub quarter: u32,
    pub time_remaining: u32,
    pub home_momentum: f32,
    pub away_momentum: f32,
    pub home_level: MomentumLevel,
    pub away_level: MomentumLevel,
    pub crowd_noise: f32,
    pub home_morale: f32,
    pub away_morale: f32,
    pub active_effects: usize,
    pub home_composure: bool,
    pub away_composure: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayRecord {
    pub at: f32,
    pub side: TeamSide,
    pub description: String,
    pub impact: f32,
    pub home_delta: f32,
    pub away_delta: f32,
    pub effects_scheduled: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub scenario: String,
    pub attendance: u32,
    pub plays: Vec<PlayRecord>,
    pub timeline: Vec<Snapshot>,
    pub final_state: Snapshot,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario: {}", path.display()))?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let scenario: Scenario = if is_json {
            serde_json::from_str(&text).context("Failed to parse scenario JSON")?
        } else {
            serde_yaml::from_str(&text).context("Failed to parse scenario YAML")?
        };
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        if self.home.id == self.away.id {
            bail!("Home and away team share id {}", self.home.id);
        }
        if self.duration.is_nan() || self.duration < 0.0 {
            bail!("Scenario duration must be non-negative, got {}", self.duration);
        }
        if self.sample_every.is_nan() || self.sample_every <= 0.0 {
            bail!("sample_every must be positive, got {}", self.sample_every);
        }
        if let Some(play) = self.plays.iter().find(|p| p.at.is_nan() || p.at < 0.0 || p.at > self.duration) {
            bail!("Play at {}s falls outside the scenario ({}s)", play.at, self.duration);
        }
        Ok(())
    }

    /// Late, tight divisional game in a dome
    pub fn demo() -> Self {
        let event = |at: f32, side: TeamSide, event: EventType, points: u32| ScriptedPlay {
            at,
            side,
            action: PlayAction::Event { event, points },
        };
        Scenario {
            name: "Fourth-quarter comeback".to_string(),
            home: demo_team("HOME", "Harbor Gulls", "Coach Reyes", 70),
            away: demo_team("AWAY", "Prairie Bison", "Coach Lind", 55),
            stadium: StadiumSpec {
                name: "Harbor Dome".to_string(),
                capacity: 68_000,
                venue: VenueType::DomeStadium,
                rivalry_factor: Some(1.2),
                home_field_advantage: None,
            },
            seed: 2024,
            rivalry: true,
            playoff: false,
            start_quarter: 4,
            start_time_remaining: 420,
            home_score: 17,
            away_score: 20,
            duration: 180.0,
            sample_every: 10.0,
            plays: vec![
                event(5.0, TeamSide::Home, EventType::Sack, 0),
                event(20.0, TeamSide::Home, EventType::Interception, 0),
                event(45.0, TeamSide::Home, EventType::Touchdown, 7),
                ScriptedPlay {
                    at: 50.0,
                    side: TeamSide::Away,
                    action: PlayAction::Composure,
                },
                event(90.0, TeamSide::Away, EventType::Fumble, 0),
                event(110.0, TeamSide::Home, EventType::FieldGoal, 3),
                event(150.0, TeamSide::Away, EventType::Penalty, 0),
            ],
        }
    }
}

fn demo_team(id: &str, name: &str, coach: &str, leadership: u8) -> TeamSpec {
    let roster = [
        ("QB1", Position::Quarterback),
        ("RB1", Position::RunningBack),
        ("WR1", Position::WideReceiver),
        ("OL1", Position::OffensiveLine),
        ("DL1", Position::DefensiveLine),
        ("LB1", Position::Linebacker),
        ("CB1", Position::Cornerback),
        ("K1", Position::Kicker),
    ];
    TeamSpec {
        id: id.to_string(),
        name: name.to_string(),
        coach: Some(CoachSpec {
            name: coach.to_string(),
            leadership,
        }),
        players: roster
            .iter()
            .map(|(pid, position)| PlayerSpec {
                id: format!("{}_{}", id, pid),
                name: format!("{} {}", name, pid),
                position: *position,
                composure: None,
                immune: false,
            })
            .collect(),
    }
}

fn build_team(roster: &TeamSpec, is_home: bool, config: &MomentumConfig) -> Team {
    let team_id = TeamId::new(roster.id.clone());
    let mut team = Team::with_composure(team_id.clone(), roster.name.clone(), is_home, &config.composure);
    if let Some(coach) = &roster.coach {
        team.set_coach(Coach::new(
            format!("{}_HC", roster.id),
            coach.name.clone(),
            team_id.clone(),
            coach.leadership,
        ));
    }
    for p in &roster.players {
        let mut player = Player::new(PlayerId::new(p.id.clone()), p.name.clone(), team_id.clone(), p.position);
        if let Some(level) = p.composure {
            player.set_composure_level(level);
        }
        player.set_momentum_immune(p.immune);
        team.add_player(player);
    }
    team
}

/// Everything a scenario run owns
struct Match {
    system: CrowdMomentumSystem,
    state: GameState,
    stadium: Stadium,
    teams: TeamRegistry,
}

impl Match {
    fn snapshot(&self, at: f32) -> Snapshot {
        let meter = self.system.momentum_meter();
        let team = |side: TeamSide| self.teams.get(self.state.team(side));
        Snapshot {
            at,
            quarter: self.state.current_quarter(),
            time_remaining: self.state.time_remaining(),
            home_momentum: meter.momentum(TeamSide::Home),
            away_momentum: meter.momentum(TeamSide::Away),
            home_level: meter.momentum_level(TeamSide::Home),
            away_level: meter.momentum_level(TeamSide::Away),
            crowd_noise: self.stadium.crowd().noise_level(),
            home_morale: team(TeamSide::Home).map(|t| t.morale()).unwrap_or_default(),
            away_morale: team(TeamSide::Away).map(|t| t.morale()).unwrap_or_default(),
            active_effects: self.system.effects().len(),
            home_composure: team(TeamSide::Home).is_some_and(|t| t.is_composure_mode_active()),
            away_composure: team(TeamSide::Away).is_some_and(|t| t.is_composure_mode_active()),
        }
    }
}

/// Play `scenario` through a fresh system built from `config`
pub fn run_scenario(scenario: &Scenario, config: &MomentumConfig) -> Result<RunReport> {
    scenario.validate()?;
    config.validate()?;

    let home_id = TeamId::new(scenario.home.id.clone());
    let away_id = TeamId::new(scenario.away.id.clone());

    let mut state = GameState::with_config(home_id.clone(), away_id.clone(), &config.impact);
    state.set_time(scenario.start_quarter, scenario.start_time_remaining);
    state.set_rivalry_status(scenario.rivalry);
    state.set_playoff_status(scenario.playoff);
    state.update_score(&home_id, scenario.home_score);
    state.update_score(&away_id, scenario.away_score);

    let venue = &scenario.stadium;
    let mut stadium = Stadium::with_crowd_config("STADIUM", venue.name.clone(), venue.capacity, venue.venue, &config.crowd);
    stadium.initialize_crowd(&home_id, &away_id, &config.crowd, scenario.seed);
    if let Some(factor) = venue.rivalry_factor {
        stadium.set_rivalry_factor(factor);
    }
    if let Some(advantage) = venue.home_field_advantage {
        stadium.set_home_field_advantage(advantage);
    }

    let mut teams = TeamRegistry::new();
    teams.insert(build_team(&scenario.home, true, config));
    teams.insert(build_team(&scenario.away, false, config));

    let mut system = CrowdMomentumSystem::new(config.clone());
    system.initialize()?;
    system.enable_system()?;

    let mut m = Match {
        system,
        state,
        stadium,
        teams,
    };

    let mut plays = scenario.plays.clone();
    plays.sort_by(|a, b| a.at.total_cmp(&b.at));
    let mut pending = plays.into_iter().peekable();

    let interval = m.system.tick_interval();
    let mut records = Vec::new();
    let mut timeline = vec![m.snapshot(0.0)];
    let mut next_sample = scenario.sample_every;
    let mut clock = 0.0_f32;
    let mut clock_carry = 0.0_f32;

    loop {
        while let Some(play) = pending.next_if(|p| p.at <= clock) {
            if let Some(record) = run_play(&mut m, &play)? {
                records.push(record);
            }
        }
        if clock >= scenario.duration {
            break;
        }

        let dt = interval.min(scenario.duration - clock);
        m.system.tick(dt, &mut m.stadium, &mut m.teams)?;
        clock += dt;

        clock_carry += dt;
        let whole = clock_carry.floor();
        if whole >= 1.0 {
            m.state.update_time(whole as u32);
            clock_carry -= whole;
        }

        if clock + SAMPLE_TOLERANCE >= next_sample {
            timeline.push(m.snapshot(clock));
            next_sample += scenario.sample_every;
        }
    }

    let final_state = m.snapshot(clock);
    let attendance = m.stadium.attendance();
    m.system.shutdown(&mut m.teams)?;

    Ok(RunReport {
        scenario: scenario.name.clone(),
        attendance,
        plays: records,
        timeline,
        final_state,
    })
}

fn run_play(m: &mut Match, play: &ScriptedPlay) -> Result<Option<PlayRecord>> {
    let team_id = m.state.team(play.side).clone();
    match &play.action {
        PlayAction::Event { event, points } => {
            if *points > 0 {
                m.state.update_score(&team_id, *points);
            }
            let mut game_event = GameEvent::for_state(*event, team_id.clone(), &m.state);
            let outcome = m
                .system
                .process_game_event(&mut game_event, &m.state, &mut m.stadium, &mut m.teams)?;
            Ok(Some(PlayRecord {
                at: play.at,
                side: play.side,
                description: format!("{:?} by {}", event, team_id),
                impact: outcome.impact,
                home_delta: outcome.home_delta,
                away_delta: outcome.away_delta,
                effects_scheduled: outcome.scheduled_effects.len(),
            }))
        }
        PlayAction::Composure => {
            let activated = m.system.activate_team_composure(&team_id, &mut m.teams)?;
            Ok(Some(PlayRecord {
                at: play.at,
                side: play.side,
                description: if activated {
                    format!("Composure mode called by {}", team_id)
                } else {
                    format!("Composure mode unavailable for {}", team_id)
                },
                impact: 0.0,
                home_delta: 0.0,
                away_delta: 0.0,
                effects_scheduled: 0,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_demo_runs_to_completion() -> Result<()> {
        let report = run_scenario(&Scenario::demo(), &MomentumConfig::default())?;
        assert_eq!(report.plays.len(), 7);
        assert!((report.final_state.at - 180.0).abs() < 0.01);
        // 0s plus one sample every 10s
        assert_eq!(report.timeline.len(), 19);
        assert!(report.attendance > 0);
        for snap in &report.timeline {
            assert!((snap.home_momentum + snap.away_momentum).abs() < 0.01);
        }
        Ok(())
    }

    #[test]
    fn test_second_composure_call_is_rejected() -> Result<()> {
        let mut scenario = Scenario::demo();
        scenario.plays = vec![
            ScriptedPlay {
                at: 1.0,
                side: TeamSide::Away,
                action: PlayAction::Composure,
            },
            ScriptedPlay {
                at: 2.0,
                side: TeamSide::Away,
                action: PlayAction::Composure,
            },
        ];
        let report = run_scenario(&scenario, &MomentumConfig::default())?;
        assert!(report.plays[0].description.starts_with("Composure mode called"));
        assert!(report.plays[1].description.contains("unavailable"));
        Ok(())
    }

    #[test]
    fn test_load_yaml_scenario() -> Result<()> {
        let yaml = r#"
name: Quick test
home: { id: H, name: Home }
away: { id: A, name: Away }
stadium: { name: Field, capacity: 30000, venue: SMALL_STADIUM }
duration: 20
plays:
  - { at: 2, side: Home, kind: event, event: TOUCHDOWN, points: 7 }
  - { at: 4, side: Away, kind: composure }
"#;
        let mut file = NamedTempFile::new()?;
        file.write_all(yaml.as_bytes())?;
        let scenario = Scenario::load(file.path())?;
        assert_eq!(scenario.plays.len(), 2);
        assert_eq!(scenario.start_quarter, 1);

        let report = run_scenario(&scenario, &MomentumConfig::arcade())?;
        assert!(report.plays[0].home_delta > 0.0);
        assert_eq!(report.timeline.len(), 5);
        Ok(())
    }

    #[test]
    fn test_play_outside_window_rejected() {
        let mut scenario = Scenario::demo();
        scenario.plays.push(ScriptedPlay {
            at: 500.0,
            side: TeamSide::Home,
            action: PlayAction::Composure,
        });
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn test_play_without_time_rejected() {
        let mut scenario = Scenario::demo();
        scenario.plays.push(ScriptedPlay {
            at: f32::NAN,
            side: TeamSide::Away,
            action: PlayAction::Composure,
        });
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn test_same_team_ids_rejected() {
        let mut scenario = Scenario::demo();
        scenario.away.id = scenario.home.id.clone();
        assert!(scenario.validate().is_err());
    }
}
