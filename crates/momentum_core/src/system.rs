//! Crowd Momentum System
//!
//! Top-level orchestrator. Owns the momentum meter and every scheduled
//! effect; the match loop lends it the game state, the stadium and the team
//! registry on each call.
//!
//! ## Lifecycle
//! ```text
//! Uninitialized --initialize--> Enabled <--enable/disable--> Disabled
//!                                  \                            /
//!                                   `------- shutdown ---------'--> ShutDown
//! ```
//!
//! ## Per-tick order
//! 1. `process_game_event` for every play resolved this tick
//! 2. `update_momentum` (decay, effect expiry, composure timers, crowd)
//! 3. `apply_momentum_effects` (player stat recompute)
//!
//! `tick` runs 2 and 3; `advance` runs `tick` at the configured frequency
//! whatever the caller's frame rate.

use serde::Serialize;

use crate::config::MomentumConfig;
use crate::effect::{EffectArena, EffectId, EffectType, MomentumEffect};
use crate::error::{MomentumError, Result};
use crate::event::GameEvent;
use crate::game_state::GameState;
use crate::meter::{MomentumLevel, MomentumMeter};
use crate::models::{TeamId, TeamSide};
use crate::stadium::Stadium;
use crate::team::TeamRegistry;

pub const MIN_UPDATE_FREQUENCY: f32 = 1.0;
pub const MAX_UPDATE_FREQUENCY: f32 = 120.0;
/// Upper bound on catch-up ticks in one `advance` call
const MAX_TICKS_PER_ADVANCE: u32 = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SystemState {
    Uninitialized,
    Enabled,
    Disabled,
    ShutDown,
}

/// What one processed event did
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventOutcome {
    /// False when the event was ignored (system not enabled, unknown team)
    pub processed: bool,
    /// Impact requested for the acting team after all multipliers
    pub impact: f32,
    pub home_delta: f32,
    pub away_delta: f32,
    pub scheduled_effects: Vec<EffectId>,
}

#[derive(Debug, Clone)]
pub struct CrowdMomentumSystem {
    momentum_meter: MomentumMeter,
    effects: EffectArena,
    config: MomentumConfig,
    state: SystemState,
    update_frequency: f32,
    tick_accumulator: f32,
}

impl Default for CrowdMomentumSystem {
    fn default() -> Self {
        Self::new(MomentumConfig::default())
    }
}

impl CrowdMomentumSystem {
    pub fn new(config: MomentumConfig) -> Self {
        Self {
            momentum_meter: MomentumMeter::from_config(&config.meter),
            effects: EffectArena::new(),
            update_frequency: config
                .system
                .update_frequency
                .clamp(MIN_UPDATE_FREQUENCY, MAX_UPDATE_FREQUENCY),
            config,
            state: SystemState::Uninitialized,
            tick_accumulator: 0.0,
        }
    }

    // ========================
    // Lifecycle
    // ========================

    pub fn initialize(&mut self) -> Result<()> {
        self.ensure_alive("initialize")?;
        if self.state != SystemState::Uninitialized {
            log::debug!("Momentum system already initialized ({:?})", self.state);
            return Ok(());
        }
        self.momentum_meter.reset_momentum();
        self.effects.clear();
        self.tick_accumulator = 0.0;
        self.state = if self.config.system.start_enabled {
            SystemState::Enabled
        } else {
            SystemState::Disabled
        };
        log::info!(
            "Momentum system initialized ({:?}, {:.0} Hz)",
            self.state,
            self.update_frequency
        );
        Ok(())
    }

    /// Drop every effect, restore players to base stats and stop for good.
    /// Any later call returns `MomentumError::SystemShutDown`.
    pub fn shutdown(&mut self, teams: &mut TeamRegistry) -> Result<()> {
        self.ensure_alive("shutdown")?;
        self.effects.clear();
        for team in teams.teams_mut() {
            for player in team.players_mut() {
                player.clear_all_effects();
                player.recompute_stats(&self.effects, 0.0, 0.0);
            }
        }
        self.state = SystemState::ShutDown;
        log::info!("Momentum system shut down");
        Ok(())
    }

    pub fn enable_system(&mut self) -> Result<()> {
        self.ensure_alive("enable_system")?;
        match self.state {
            SystemState::Disabled => {
                self.state = SystemState::Enabled;
                log::info!("Momentum system enabled");
            }
            SystemState::Uninitialized => {
                log::warn!("enable_system called before initialize, ignoring");
            }
            _ => {}
        }
        Ok(())
    }

    /// Suspend ticking; meter and effects are kept as they are
    pub fn disable_system(&mut self) -> Result<()> {
        self.ensure_alive("disable_system")?;
        if self.state == SystemState::Enabled {
            self.state = SystemState::Disabled;
            self.tick_accumulator = 0.0;
            log::info!("Momentum system disabled");
        }
        Ok(())
    }

    pub fn is_system_enabled(&self) -> bool {
        self.state == SystemState::Enabled
    }

    pub fn state(&self) -> SystemState {
        self.state
    }

    /// Ticks per second, clamped to `[MIN_UPDATE_FREQUENCY, MAX_UPDATE_FREQUENCY]`
    pub fn set_update_frequency(&mut self, frequency: f32) -> Result<()> {
        self.ensure_alive("set_update_frequency")?;
        self.update_frequency = frequency.clamp(MIN_UPDATE_FREQUENCY, MAX_UPDATE_FREQUENCY);
        Ok(())
    }

    pub fn update_frequency(&self) -> f32 {
        self.update_frequency
    }

    pub fn tick_interval(&self) -> f32 {
        1.0 / self.update_frequency
    }

    fn ensure_alive(&self, operation: &'static str) -> Result<()> {
        if self.state == SystemState::ShutDown {
            log::error!("{} called after momentum system shutdown", operation);
            return Err(MomentumError::SystemShutDown { operation });
        }
        Ok(())
    }

    // ========================
    // Events
    // ========================

    /// Run one play through the pipeline: impact, meter, crowd, effects.
    ///
    /// Ignored (with `processed == false`) while the system is not enabled or
    /// when the acting team is not playing in `game_state`.
    pub fn process_game_event(
        &mut self,
        event: &mut GameEvent,
        game_state: &GameState,
        stadium: &mut Stadium,
        teams: &mut TeamRegistry,
    ) -> Result<EventOutcome> {
        self.ensure_alive("process_game_event")?;
        if !self.is_system_enabled() {
            log::debug!("Ignoring {:?}: system {:?}", event.event_type(), self.state);
            return Ok(EventOutcome::default());
        }
        let Some(side) = game_state.side_of(event.team()) else {
            log::warn!(
                "Ignoring {:?} for team {} not in this match",
                event.event_type(),
                event.team()
            );
            return Ok(EventOutcome::default());
        };
        if side != event.side() {
            log::warn!(
                "Event for {} flagged {:?}, match says {:?}",
                event.team(),
                event.side(),
                side
            );
        }

        let base = event.calculate_momentum_impact(game_state, &self.config.impact);
        let impact = base * stadium.impact_multiplier(side);
        event.set_momentum_impact(impact);

        let was_surging = [
            self.momentum_meter.is_surging(TeamSide::Home),
            self.momentum_meter.is_surging(TeamSide::Away),
        ];
        let was_level = [
            self.momentum_meter.momentum_level(TeamSide::Home),
            self.momentum_meter.momentum_level(TeamSide::Away),
        ];

        let moved = self.momentum_meter.transfer_momentum(side, impact);
        let (home_delta, away_delta) = match side {
            TeamSide::Home => (moved, -moved),
            TeamSide::Away => (-moved, moved),
        };

        let morale_shift = moved * self.config.impact.morale_per_impact;
        if let Some(team) = teams.get_mut(game_state.team(side)) {
            team.adjust_morale(morale_shift);
        }
        if let Some(team) = teams.get_mut(game_state.team(side.opponent())) {
            team.adjust_morale(-morale_shift);
        }

        stadium.crowd_mut().react_to_event(event);

        let mut scheduled = Vec::new();
        for (idx, surging_side) in [TeamSide::Home, TeamSide::Away].into_iter().enumerate() {
            let level = self.momentum_meter.momentum_level(surging_side);
            let very_high = level == MomentumLevel::VeryHigh;

            if !was_surging[idx] && self.momentum_meter.is_surging(surging_side) {
                let scale = if very_high { self.config.effect.very_high_scale } else { 1.0 };
                let effect = MomentumEffect::new(
                    EffectType::penalty_for(event.event_type()),
                    self.config.effect.base_magnitude * scale,
                    self.config.effect.duration,
                    game_state.team(surging_side.opponent()).clone(),
                );
                scheduled.extend(self.schedule_effect(effect, teams)?);
            }
            if very_high && was_level[idx] != MomentumLevel::VeryHigh {
                let effect = MomentumEffect::new(
                    EffectType::boost_for(event.event_type()),
                    self.config.effect.base_magnitude,
                    self.config.effect.duration,
                    game_state.team(surging_side).clone(),
                );
                scheduled.extend(self.schedule_effect(effect, teams)?);
            }
        }

        log::debug!(
            "{:?} by {}: impact {:.1}, home {:+.1}, away {:+.1}, {} effect(s)",
            event.event_type(),
            event.team(),
            impact,
            home_delta,
            away_delta,
            scheduled.len()
        );

        Ok(EventOutcome {
            processed: true,
            impact,
            home_delta,
            away_delta,
            scheduled_effects: scheduled,
        })
    }

    /// Put `effect` in the arena and attach it to every player of its target
    /// team. Returns `Ok(None)` (and schedules nothing) when the team is unknown.
    pub fn schedule_effect(
        &mut self,
        effect: MomentumEffect,
        teams: &mut TeamRegistry,
    ) -> Result<Option<EffectId>> {
        self.ensure_alive("schedule_effect")?;
        let Some(team) = teams.get_mut(effect.target_team()) else {
            log::warn!("No team {} to receive {:?}", effect.target_team(), effect.effect_type());
            return Ok(None);
        };
        log::info!(
            "Scheduling {:?} ({:.1} for {:.0}s) on {}",
            effect.effect_type(),
            effect.magnitude(),
            effect.duration(),
            team.id()
        );
        let id = self.effects.insert(effect);
        if let Some(effect) = self.effects.get(id) {
            for player in team.players_mut() {
                effect.apply(id, player);
            }
        }
        Ok(Some(id))
    }

    /// Coach of `team` calls composure mode. `Ok(false)` when on cooldown or
    /// the team is unknown.
    pub fn activate_team_composure(&mut self, team_id: &TeamId, teams: &mut TeamRegistry) -> Result<bool> {
        self.ensure_alive("activate_team_composure")?;
        let Some(team) = teams.get_mut(team_id) else {
            log::warn!("activate_team_composure: unknown team {}", team_id);
            return Ok(false);
        };
        Ok(team.activate_composure_mode())
    }

    // ========================
    // Ticking
    // ========================

    /// Decay momentum, age effects, count down composure and settle the crowd
    pub fn update_momentum(
        &mut self,
        delta_time: f32,
        stadium: &mut Stadium,
        teams: &mut TeamRegistry,
    ) -> Result<()> {
        self.ensure_alive("update_momentum")?;
        if !self.is_system_enabled() {
            return Ok(());
        }
        let dt = delta_time.max(0.0);

        self.momentum_meter.decay_momentum(dt);

        let expired = self.effects.update(dt);
        for team in teams.teams_mut() {
            if !expired.is_empty() {
                for player in team.players_mut() {
                    player.update_effects(&self.effects);
                }
            }
            team.update_composure(dt);
        }

        stadium.crowd_mut().update(dt);
        Ok(())
    }

    /// Recompute `current_stats` of every player that holds effects or is
    /// marked dirty. Returns how many players' stats changed.
    ///
    /// Players who joined a roster after an effect was scheduled pick up the
    /// team's active effects here.
    pub fn apply_momentum_effects(&mut self, teams: &mut TeamRegistry) -> Result<usize> {
        self.ensure_alive("apply_momentum_effects")?;
        if !self.is_system_enabled() {
            return Ok(0);
        }
        let resistance = self.config.effect.composure_resistance;
        let mut changed = 0;
        for team in teams.teams_mut() {
            let mitigation = team.composure_mitigation();
            let active: Vec<(EffectId, &MomentumEffect)> = self
                .effects
                .iter()
                .filter(|(_, effect)| effect.is_active() && effect.target_team() == team.id())
                .collect();
            for player in team.players_mut() {
                for (id, effect) in &active {
                    effect.apply(*id, player);
                }
                if player.needs_recompute() && player.recompute_stats(&self.effects, mitigation, resistance) {
                    changed += 1;
                }
            }
        }
        Ok(changed)
    }

    /// One fixed step: update then apply
    pub fn tick(&mut self, delta_time: f32, stadium: &mut Stadium, teams: &mut TeamRegistry) -> Result<()> {
        self.update_momentum(delta_time, stadium, teams)?;
        self.apply_momentum_effects(teams)?;
        Ok(())
    }

    /// Feed wall/frame time; runs as many fixed ticks as fit. Returns ticks run.
    pub fn advance(&mut self, frame_time: f32, stadium: &mut Stadium, teams: &mut TeamRegistry) -> Result<u32> {
        self.ensure_alive("advance")?;
        if !self.is_system_enabled() {
            return Ok(0);
        }
        let interval = self.tick_interval();
        self.tick_accumulator += frame_time.max(0.0);
        let mut ticks = 0;
        while self.tick_accumulator >= interval && ticks < MAX_TICKS_PER_ADVANCE {
            self.tick(interval, stadium, teams)?;
            self.tick_accumulator -= interval;
            ticks += 1;
        }
        if ticks == MAX_TICKS_PER_ADVANCE {
            log::warn!("advance fell behind, dropping {:.2}s", self.tick_accumulator);
            self.tick_accumulator = 0.0;
        }
        Ok(ticks)
    }

    // ========================
    // Queries
    // ========================

    pub fn momentum_meter(&self) -> &MomentumMeter {
        &self.momentum_meter
    }

    pub fn momentum_meter_mut(&mut self) -> &mut MomentumMeter {
        &mut self.momentum_meter
    }

    pub fn effects(&self) -> &EffectArena {
        &self.effects
    }

    pub fn config(&self) -> &MomentumConfig {
        &self.config
    }
}
