//! Timed momentum effects and the arena that owns them
//!
//! Effects are owned by `EffectArena`; players only keep `EffectId`s.
//! Ids are never reused, so an expired effect shows up as an id that no
//! longer resolves.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::event::EventType;
use crate::models::{StatKind, TeamId};
use crate::player::Player;

/// Kinds of momentum modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectType {
    ReactionTimeBoost,
    AccuracyBoost,
    BlockingEfficiency,
    SnapTimingPenalty,
    FocusReduction,
    FalseStartIncrease,
}

impl EffectType {
    pub fn is_positive(self) -> bool {
        matches!(
            self,
            EffectType::ReactionTimeBoost | EffectType::AccuracyBoost | EffectType::BlockingEfficiency
        )
    }

    /// Attributes touched by this effect and the share of strength each gets
    pub fn stat_weights(self) -> &'static [(StatKind, f32)] {
        match self {
            EffectType::ReactionTimeBoost => &[(StatKind::Speed, 1.0), (StatKind::Awareness, 0.5)],
            EffectType::AccuracyBoost => &[(StatKind::Accuracy, 1.0)],
            EffectType::BlockingEfficiency => &[(StatKind::Strength, 1.0)],
            EffectType::SnapTimingPenalty => &[(StatKind::Awareness, 1.0), (StatKind::Speed, 0.5)],
            EffectType::FocusReduction => &[(StatKind::Composure, 1.0), (StatKind::Accuracy, 0.5)],
            EffectType::FalseStartIncrease => &[(StatKind::Composure, 1.0), (StatKind::Awareness, 0.5)],
        }
    }

    /// Penalty handed to the team on the wrong end of `event`
    pub fn penalty_for(event: EventType) -> Self {
        match event {
            EventType::Touchdown | EventType::Interception | EventType::Turnover => {
                EffectType::FocusReduction
            }
            EventType::Sack | EventType::Safety => EffectType::SnapTimingPenalty,
            EventType::FourthDownStop | EventType::Fumble => EffectType::FalseStartIncrease,
            EventType::FieldGoal | EventType::Penalty => EffectType::FocusReduction,
        }
    }

    /// Boost handed to the surging team after `event`
    pub fn boost_for(event: EventType) -> Self {
        match event {
            EventType::Touchdown | EventType::FieldGoal => EffectType::AccuracyBoost,
            EventType::Interception
            | EventType::Sack
            | EventType::FourthDownStop
            | EventType::Safety
            | EventType::Fumble
            | EventType::Turnover => EffectType::ReactionTimeBoost,
            EventType::Penalty => EffectType::BlockingEfficiency,
        }
    }
}

/// Arena key of a scheduled effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EffectId(pub u64);

/// A timed, team-targeted stat modifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MomentumEffect {
    effect_type: EffectType,
    magnitude: f32,
    duration: f32,
    remaining_time: f32,
    target_team: TeamId,
    is_positive_effect: bool,
}

impl MomentumEffect {
    /// Magnitude is stored as a non-negative size; direction comes from the type.
    pub fn new(effect_type: EffectType, magnitude: f32, duration: f32, target_team: TeamId) -> Self {
        let duration = duration.max(0.0);
        Self {
            effect_type,
            magnitude: magnitude.abs(),
            duration,
            remaining_time: duration,
            target_team,
            is_positive_effect: effect_type.is_positive(),
        }
    }

    /// Attach to `player` under `id`
    pub fn apply(&self, id: EffectId, player: &mut Player) {
        if player.team() != &self.target_team {
            log::debug!(
                "Effect {:?} targets {}, not applying to {} of {}",
                self.effect_type,
                self.target_team,
                player.id(),
                player.team()
            );
            return;
        }
        player.apply_effect(id);
    }

    pub fn remove(&self, id: EffectId, player: &mut Player) {
        player.remove_effect(id);
    }

    /// Count down; negative `delta_time` is ignored
    pub fn update(&mut self, delta_time: f32) {
        self.remaining_time = (self.remaining_time - delta_time.max(0.0)).max(0.0);
    }

    pub fn is_active(&self) -> bool {
        self.remaining_time > 0.0
    }

    /// `magnitude * remaining / duration`: linear fade-out
    pub fn effect_strength(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        self.magnitude * (self.remaining_time / self.duration)
    }

    /// Strength with direction: negative for penalties
    pub fn signed_strength(&self) -> f32 {
        if self.is_positive_effect {
            self.effect_strength()
        } else {
            -self.effect_strength()
        }
    }

    pub fn effect_type(&self) -> EffectType {
        self.effect_type
    }

    pub fn magnitude(&self) -> f32 {
        self.magnitude
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn target_team(&self) -> &TeamId {
        &self.target_team
    }

    pub fn is_positive_effect(&self) -> bool {
        self.is_positive_effect
    }

    pub fn remaining_time(&self) -> f32 {
        self.remaining_time
    }
}

/// Owner of every scheduled effect
#[derive(Debug, Clone, Default)]
pub struct EffectArena {
    effects: BTreeMap<EffectId, MomentumEffect>,
    next_id: u64,
}

impl EffectArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, effect: MomentumEffect) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id += 1;
        self.effects.insert(id, effect);
        id
    }

    pub fn get(&self, id: EffectId) -> Option<&MomentumEffect> {
        self.effects.get(&id)
    }

    pub fn contains(&self, id: EffectId) -> bool {
        self.effects.contains_key(&id)
    }

    pub fn remove(&mut self, id: EffectId) -> Option<MomentumEffect> {
        self.effects.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EffectId, &MomentumEffect)> {
        self.effects.iter().map(|(id, effect)| (*id, effect))
    }

    /// Age every effect and drop the ones that ran out. Returns the dropped ids.
    pub fn update(&mut self, delta_time: f32) -> Vec<EffectId> {
        for effect in self.effects.values_mut() {
            effect.update(delta_time);
        }
        let expired: Vec<EffectId> = self
            .effects
            .iter()
            .filter(|(_, effect)| !effect.is_active())
            .map(|(id, _)| *id)
            .collect();
        for id in &expired {
            if let Some(effect) = self.effects.remove(id) {
                log::debug!("Effect {:?} on {} expired", effect.effect_type, effect.target_team);
            }
        }
        expired
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effect() -> MomentumEffect {
        MomentumEffect::new(EffectType::FocusReduction, 10.0, 30.0, TeamId::new("AWAY"))
    }

    #[test]
    fn test_direction_comes_from_type() {
        assert!(!effect().is_positive_effect());
        let boost = MomentumEffect::new(EffectType::AccuracyBoost, -8.0, 10.0, TeamId::new("HOME"));
        assert!(boost.is_positive_effect());
        assert!((boost.magnitude() - 8.0).abs() < 0.001);
    }

    #[test]
    fn test_strength_fades_linearly() {
        let mut e = effect();
        assert!((e.effect_strength() - 10.0).abs() < 0.001);
        e.update(15.0);
        assert!((e.effect_strength() - 5.0).abs() < 0.001);
        assert!((e.signed_strength() + 5.0).abs() < 0.001);
        e.update(7.5);
        assert!((e.effect_strength() - 2.5).abs() < 0.001);
    }

    #[test]
    fn test_inactive_exactly_at_zero() {
        let mut e = effect();
        e.update(29.0);
        assert!(e.is_active());
        e.update(1.0);
        assert!(!e.is_active());
        assert!(e.remaining_time().abs() < 0.001);
        e.update(5.0);
        assert!(e.remaining_time().abs() < 0.001);
    }

    #[test]
    fn test_negative_delta_ignored() {
        let mut e = effect();
        e.update(-10.0);
        assert!((e.remaining_time() - 30.0).abs() < 0.001);
    }

    #[test]
    fn test_zero_duration_is_inert() {
        let e = MomentumEffect::new(EffectType::AccuracyBoost, 10.0, -5.0, TeamId::new("HOME"));
        assert!(!e.is_active());
        assert!(e.effect_strength().abs() < 0.001);
    }

    #[test]
    fn test_arena_expiry_and_id_reuse() {
        let mut arena = EffectArena::new();
        let short = arena.insert(MomentumEffect::new(
            EffectType::SnapTimingPenalty,
            5.0,
            1.0,
            TeamId::new("AWAY"),
        ));
        let long = arena.insert(effect());

        let expired = arena.update(2.0);
        assert_eq!(expired, vec![short]);
        assert!(!arena.contains(short));
        assert!(arena.contains(long));

        let next = arena.insert(effect());
        assert_ne!(next, short);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_tables_match_direction() {
        for event in [
            EventType::Touchdown,
            EventType::Sack,
            EventType::FourthDownStop,
            EventType::Penalty,
            EventType::Turnover,
        ] {
            assert!(!EffectType::penalty_for(event).is_positive());
            assert!(EffectType::boost_for(event).is_positive());
        }
    }
}
