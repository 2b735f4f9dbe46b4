//! Ephemeral visual events.
//!
//! Effects are observational only: the simulation appends them and prunes
//! them by age, and nothing in the simulation reads them back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::data::Tuning;

/// Kind of visual effect.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectKind {
    /// A strike or projectile impact.
    Hit,
    /// A strike by a frenzied unit.
    Slash,
    /// A regeneration pulse.
    Heal,
}

impl EffectKind {
    /// Lifetime of this kind in ms.
    #[must_use]
    pub fn duration(self, tuning: &Tuning) -> f64 {
        match self {
            Self::Hit => tuning.hit_effect_ms,
            Self::Slash => tuning.slash_effect_ms,
            Self::Heal => tuning.heal_effect_ms,
        }
    }
}

/// One time-boxed visual event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualEffect {
    /// Identifier, unique within a battle.
    pub id: u64,
    /// Where it is drawn.
    pub position: Vec2,
    /// What is drawn.
    pub kind: EffectKind,
    /// Simulation time of creation.
    pub created_at: f64,
    /// Lifetime in ms.
    pub duration: f64,
}

impl VisualEffect {
    /// Returns `true` once the effect's lifetime has elapsed at `time`.
    #[must_use]
    pub fn expired(&self, time: f64) -> bool {
        time - self.created_at >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_is_inclusive() {
        let effect = VisualEffect {
            id: 0,
            position: Vec2::ZERO,
            kind: EffectKind::Hit,
            created_at: 1000.0,
            duration: 300.0,
        };
        assert!(!effect.expired(1299.0));
        assert!(effect.expired(1300.0));
    }

    #[test]
    fn durations_come_from_tuning() {
        let tuning = Tuning::default();
        assert_eq!(EffectKind::Hit.duration(&tuning), 300.0);
        assert_eq!(EffectKind::Slash.duration(&tuning), 300.0);
        assert_eq!(EffectKind::Heal.duration(&tuning), 600.0);
    }
}
