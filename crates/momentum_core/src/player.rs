//! Player state under momentum effects
//!
//! `current_stats` is always derived from `base_stats` plus the effects the
//! player holds; outside callers never write it directly.

use serde::{Deserialize, Serialize};

use crate::effect::{EffectArena, EffectId};
use crate::models::{PlayerId, PlayerStats, Position, TeamId};

/// Composure level a player starts with (0-100)
pub const DEFAULT_COMPOSURE_LEVEL: f32 = 50.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    player_id: PlayerId,
    player_name: String,
    team: TeamId,
    position: Position,
    base_stats: PlayerStats,
    current_stats: PlayerStats,
    #[serde(skip)]
    current_effects: Vec<EffectId>,
    composure_level: f32,
    momentum_immune: bool,
    #[serde(skip)]
    stats_dirty: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, team: TeamId, position: Position) -> Self {
        let base_stats = PlayerStats::default();
        Self {
            player_id: id,
            player_name: name.into(),
            team,
            position,
            base_stats,
            current_stats: base_stats,
            current_effects: Vec::new(),
            composure_level: DEFAULT_COMPOSURE_LEVEL,
            momentum_immune: false,
            stats_dirty: false,
        }
    }

    pub fn with_stats(mut self, stats: PlayerStats) -> Self {
        self.set_base_stats(stats);
        self
    }

    // ========================
    // Effects
    // ========================

    pub fn apply_effect(&mut self, id: EffectId) {
        if !self.current_effects.contains(&id) {
            self.current_effects.push(id);
            self.stats_dirty = true;
        }
    }

    pub fn remove_effect(&mut self, id: EffectId) {
        let before = self.current_effects.len();
        self.current_effects.retain(|held| *held != id);
        if self.current_effects.len() != before {
            self.stats_dirty = true;
        }
    }

    /// Drop ids that no longer resolve to an active effect
    pub fn update_effects(&mut self, effects: &EffectArena) {
        let before = self.current_effects.len();
        self.current_effects
            .retain(|id| effects.get(*id).is_some_and(|effect| effect.is_active()));
        if self.current_effects.len() != before {
            self.stats_dirty = true;
        }
    }

    pub fn clear_all_effects(&mut self) {
        if !self.current_effects.is_empty() {
            self.current_effects.clear();
            self.stats_dirty = true;
        }
    }

    pub fn effect_ids(&self) -> &[EffectId] {
        &self.current_effects
    }

    // ========================
    // Stats
    // ========================

    /// Base stats folded with every held effect that is still active and
    /// targets this player's team.
    ///
    /// `mitigation` is the team's composure share (0.0 when composure mode
    /// is off) and only scales adverse effects. The player's own composure
    /// level resists part of adverse effects too, up to `composure_resistance`
    /// (0.0 by default, which leaves the fold exact).
    ///
    /// Deltas are summed first and clamped once, so the result does not
    /// depend on the order the effects were applied in.
    pub fn modified_stats(
        &self,
        effects: &EffectArena,
        mitigation: f32,
        composure_resistance: f32,
    ) -> PlayerStats {
        if self.momentum_immune {
            return self.base_stats;
        }
        let mitigation = mitigation.clamp(0.0, 1.0);
        let resistance = (self.composure_level / 100.0 * composure_resistance).clamp(0.0, 1.0);

        let mut stats = self.base_stats;
        for id in &self.current_effects {
            let Some(effect) = effects.get(*id) else {
                continue;
            };
            if !effect.is_active() || effect.target_team() != &self.team {
                continue;
            }
            let mut strength = effect.signed_strength();
            if !effect.is_positive_effect() {
                strength *= (1.0 - mitigation) * (1.0 - resistance);
            }
            for (kind, weight) in effect.effect_type().stat_weights() {
                stats.shift(*kind, strength * weight);
            }
        }
        stats.clamped()
    }

    /// Refresh `current_stats`. Returns true if they changed.
    pub fn recompute_stats(
        &mut self,
        effects: &EffectArena,
        mitigation: f32,
        composure_resistance: f32,
    ) -> bool {
        let next = self.modified_stats(effects, mitigation, composure_resistance);
        let changed = next != self.current_stats;
        self.current_stats = next;
        self.stats_dirty = false;
        changed
    }

    pub fn needs_recompute(&self) -> bool {
        self.stats_dirty || !self.current_effects.is_empty()
    }

    pub fn current_stats(&self) -> PlayerStats {
        self.current_stats
    }

    pub fn base_stats(&self) -> PlayerStats {
        self.base_stats
    }

    pub fn is_affected_by_momentum(&self) -> bool {
        !self.momentum_immune && !self.current_effects.is_empty()
    }

    // ========================
    // Properties
    // ========================

    pub fn id(&self) -> &PlayerId {
        &self.player_id
    }

    pub fn name(&self) -> &str {
        &self.player_name
    }

    pub fn team(&self) -> &TeamId {
        &self.team
    }

    /// Rosters call this when the player joins a team
    pub(crate) fn set_team(&mut self, team: TeamId) {
        if self.team != team {
            self.team = team;
            self.stats_dirty = true;
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn composure_level(&self) -> f32 {
        self.composure_level
    }

    pub fn is_momentum_immune(&self) -> bool {
        self.momentum_immune
    }

    pub fn set_composure_level(&mut self, level: f32) {
        self.composure_level = level.clamp(0.0, 100.0);
        self.stats_dirty = true;
    }

    pub fn set_momentum_immune(&mut self, immune: bool) {
        self.momentum_immune = immune;
        self.stats_dirty = true;
        if immune {
            self.current_stats = self.base_stats;
        }
    }

    pub fn set_base_stats(&mut self, stats: PlayerStats) {
        self.base_stats = stats.clamped();
        self.current_stats = self.base_stats;
        self.stats_dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EffectConfig;
    use crate::effect::{EffectType, MomentumEffect};

    fn player(team: &str) -> Player {
        Player::new(PlayerId::new("QB1"), "Quarterback", TeamId::new(team), Position::Quarterback)
            .with_stats(PlayerStats::uniform(60.0))
    }

    fn arena_with(effect_type: EffectType, team: &str) -> (EffectArena, EffectId) {
        let mut arena = EffectArena::new();
        let id = arena.insert(MomentumEffect::new(effect_type, 10.0, 30.0, TeamId::new(team)));
        (arena, id)
    }

    #[test]
    fn test_apply_marks_dirty_once() {
        let mut p = player("AWAY");
        let (arena, id) = arena_with(EffectType::FocusReduction, "AWAY");
        arena.get(id).unwrap().apply(id, &mut p);
        arena.get(id).unwrap().apply(id, &mut p);
        assert_eq!(p.effect_ids().len(), 1);
        assert!(p.needs_recompute());
        assert!(p.is_affected_by_momentum());
    }

    #[test]
    fn test_effect_for_other_team_not_attached() {
        let mut p = player("HOME");
        let (arena, id) = arena_with(EffectType::FocusReduction, "AWAY");
        arena.get(id).unwrap().apply(id, &mut p);
        assert!(p.effect_ids().is_empty());
    }

    #[test]
    fn test_negative_effect_lowers_stats() {
        let mut p = player("AWAY");
        p.set_composure_level(0.0);
        let (arena, id) = arena_with(EffectType::FocusReduction, "AWAY");
        p.apply_effect(id);

        let stats = p.modified_stats(&arena, 0.0, 0.3);
        assert!((stats.composure - 50.0).abs() < 0.001);
        assert!((stats.accuracy - 55.0).abs() < 0.001);
        assert!((stats.speed - 60.0).abs() < 0.001);
    }

    #[test]
    fn test_positive_effect_ignores_mitigation() {
        let mut p = player("HOME");
        let (arena, id) = arena_with(EffectType::AccuracyBoost, "HOME");
        p.apply_effect(id);
        let stats = p.modified_stats(&arena, 0.7, 0.3);
        assert!((stats.accuracy - 70.0).abs() < 0.001);
    }

    #[test]
    fn test_immune_player_keeps_base_stats() {
        let mut p = player("AWAY");
        let (arena, id) = arena_with(EffectType::FocusReduction, "AWAY");
        p.apply_effect(id);
        p.set_momentum_immune(true);
        assert_eq!(p.modified_stats(&arena, 0.0, 0.3), p.base_stats());
        p.recompute_stats(&arena, 0.0, 0.3);
        assert_eq!(p.current_stats(), p.base_stats());
        assert!(!p.is_affected_by_momentum());
    }

    #[test]
    fn test_composure_level_resists_adverse_effects() {
        let (arena, id) = arena_with(EffectType::FocusReduction, "AWAY");
        let mut calm = player("AWAY");
        calm.set_composure_level(100.0);
        calm.apply_effect(id);
        let mut rattled = player("AWAY");
        rattled.set_composure_level(0.0);
        rattled.apply_effect(id);

        let calm_drop = 60.0 - calm.modified_stats(&arena, 0.0, 0.3).composure;
        let rattled_drop = 60.0 - rattled.modified_stats(&arena, 0.0, 0.3).composure;
        assert!((calm_drop - 7.0).abs() < 0.001);
        assert!((rattled_drop - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_default_fold_is_exact() {
        let mut p = player("AWAY");
        let (arena, id) = arena_with(EffectType::FocusReduction, "AWAY");
        p.apply_effect(id);

        let resistance = EffectConfig::default().composure_resistance;
        let strength = arena.get(id).unwrap().effect_strength();
        let stats = p.modified_stats(&arena, 0.0, resistance);
        assert!((60.0 - stats.composure - strength * 1.0).abs() < 0.001);
        assert!((60.0 - stats.accuracy - strength * 0.5).abs() < 0.001);
    }

    #[test]
    fn test_fold_ignores_effect_order() {
        let mut arena = EffectArena::new();
        let boost = arena.insert(MomentumEffect::new(EffectType::AccuracyBoost, 10.0, 30.0, TeamId::new("AWAY")));
        let penalty = arena.insert(MomentumEffect::new(EffectType::FocusReduction, 20.0, 30.0, TeamId::new("AWAY")));

        let mut first = player("AWAY").with_stats(PlayerStats::uniform(95.0));
        first.apply_effect(boost);
        first.apply_effect(penalty);
        let mut second = player("AWAY").with_stats(PlayerStats::uniform(95.0));
        second.apply_effect(penalty);
        second.apply_effect(boost);

        let a = first.modified_stats(&arena, 0.0, 0.0);
        let b = second.modified_stats(&arena, 0.0, 0.0);
        assert_eq!(a, b);
        // +10 boost, -20 * 0.5 penalty
        assert!((a.accuracy - 95.0).abs() < 0.001);
        assert!((a.composure - 75.0).abs() < 0.001);
    }

    #[test]
    fn test_expired_ids_are_pruned() {
        let mut p = player("AWAY");
        let (mut arena, id) = arena_with(EffectType::FocusReduction, "AWAY");
        p.apply_effect(id);
        p.recompute_stats(&arena, 0.0, 0.3);

        arena.update(30.0);
        p.update_effects(&arena);
        assert!(p.effect_ids().is_empty());
        assert!(p.recompute_stats(&arena, 0.0, 0.3));
        assert_eq!(p.current_stats(), p.base_stats());
    }

    #[test]
    fn test_clear_all_effects() {
        let mut p = player("AWAY");
        p.apply_effect(EffectId(1));
        p.apply_effect(EffectId(2));
        p.clear_all_effects();
        assert!(!p.is_affected_by_momentum());
    }
}
