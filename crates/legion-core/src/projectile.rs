//! Projectiles fired by ranged units.
//!
//! A projectile carries damage computed at launch. Each tick it either hits
//! its target (within the impact radius), homes towards the target's current
//! position, or, once the target is gone, flies on along its last heading
//! while fading out.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::data::Tuning;
use crate::entity::EntityId;

/// Unique identifier for a projectile.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectileId(u64);

impl ProjectileId {
    /// Creates a new `ProjectileId`.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProjectileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A projectile in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Identifier.
    pub id: ProjectileId,
    /// Entity that fired it.
    pub source: EntityId,
    /// Entity it is homing on.
    pub target: Option<EntityId>,
    /// Current position.
    pub position: Vec2,
    /// Damage dealt on impact, fixed at launch.
    pub damage: f32,
    /// Lane units per reference frame.
    pub speed: f32,
    /// Direction of travel in radians.
    pub heading: f32,
    /// 1.0 while homing, decays once the target is gone.
    pub opacity: f32,
}

/// What happened to a projectile during one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flight {
    /// Reached its target; damage should be applied and the projectile removed.
    Impact {
        /// Target hit.
        target: EntityId,
        /// Damage to apply.
        damage: f32,
    },
    /// Moved towards its target.
    Homing,
    /// Target gone; drifted and faded but still visible.
    Fading,
    /// Faded out completely; remove it.
    Spent,
}

impl Projectile {
    /// Advances the projectile by one tick.
    ///
    /// `target_position` is the target's current position, or `None` when the
    /// target is no longer in the entity collection. `frames` is the tick's
    /// delta in reference frames.
    pub fn advance(&mut self, target_position: Option<Vec2>, frames: f32, tuning: &Tuning) -> Flight {
        let step = self.speed * frames;

        match (self.target, target_position) {
            (Some(target), Some(goal)) => {
                let offset = goal - self.position;
                let distance = offset.length();
                if distance < tuning.impact_radius {
                    return Flight::Impact {
                        target,
                        damage: self.damage,
                    };
                }
                self.heading = offset.y.atan2(offset.x);
                self.position += offset / distance * step;
                Flight::Homing
            }
            _ => {
                self.position += Vec2::from_angle(self.heading) * step;
                self.opacity -= tuning.projectile_fade_per_tick;
                if self.opacity > 0.0 {
                    Flight::Fading
                } else {
                    Flight::Spent
                }
            }
        }
    }
}
