use serde::{Deserialize, Serialize};

/// Upper bound of every player attribute
pub const STAT_MAX: f32 = 100.0;

/// Roster position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    OffensiveLine,
    DefensiveLine,
    Linebacker,
    Cornerback,
    Safety,
    Kicker,
}

/// Single attribute selector, used by effect-to-stat tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    Speed,
    Accuracy,
    Strength,
    Awareness,
    Composure,
}

/// Player attribute bundle (each 0-100)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub speed: f32,
    pub accuracy: f32,
    pub strength: f32,
    pub awareness: f32,
    pub composure: f32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self::uniform(50.0)
    }
}

impl PlayerStats {
    pub fn new(speed: f32, accuracy: f32, strength: f32, awareness: f32, composure: f32) -> Self {
        Self {
            speed,
            accuracy,
            strength,
            awareness,
            composure,
        }
        .clamped()
    }

    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value, value)
    }

    pub fn get(&self, kind: StatKind) -> f32 {
        match kind {
            StatKind::Speed => self.speed,
            StatKind::Accuracy => self.accuracy,
            StatKind::Strength => self.strength,
            StatKind::Awareness => self.awareness,
            StatKind::Composure => self.composure,
        }
    }

    fn slot_mut(&mut self, kind: StatKind) -> &mut f32 {
        match kind {
            StatKind::Speed => &mut self.speed,
            StatKind::Accuracy => &mut self.accuracy,
            StatKind::Strength => &mut self.strength,
            StatKind::Awareness => &mut self.awareness,
            StatKind::Composure => &mut self.composure,
        }
    }

    /// Add `delta` to one attribute, saturating at [0, STAT_MAX]
    pub fn add(&mut self, kind: StatKind, delta: f32) {
        let slot = self.slot_mut(kind);
        *slot = (*slot + delta).clamp(0.0, STAT_MAX);
    }

    /// Add `delta` without saturating; call `clamped()` once all deltas are in
    pub fn shift(&mut self, kind: StatKind, delta: f32) {
        *self.slot_mut(kind) += delta;
    }

    pub fn clamped(self) -> Self {
        Self {
            speed: self.speed.clamp(0.0, STAT_MAX),
            accuracy: self.accuracy.clamp(0.0, STAT_MAX),
            strength: self.strength.clamp(0.0, STAT_MAX),
            awareness: self.awareness.clamp(0.0, STAT_MAX),
            composure: self.composure.clamp(0.0, STAT_MAX),
        }
    }

    pub fn average(&self) -> f32 {
        (self.speed + self.accuracy + self.strength + self.awareness + self.composure) / 5.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_out_of_range() {
        let stats = PlayerStats::new(120.0, -5.0, 50.0, 50.0, 50.0);
        assert!((stats.speed - STAT_MAX).abs() < 0.001);
        assert!(stats.accuracy.abs() < 0.001);
    }

    #[test]
    fn test_add_saturates() {
        let mut stats = PlayerStats::uniform(95.0);
        stats.add(StatKind::Speed, 10.0);
        stats.add(StatKind::Awareness, -200.0);
        assert!((stats.speed - STAT_MAX).abs() < 0.001);
        assert!(stats.awareness.abs() < 0.001);
        assert!((stats.get(StatKind::Accuracy) - 95.0).abs() < 0.001);
    }
}
