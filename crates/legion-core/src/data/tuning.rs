//! Feel constants.
//!
//! Everything here shapes timing and geometry rather than correctness, so it
//! lives in data and can be overridden per game-data file.

use serde::{Deserialize, Serialize};

use super::levels::SpawnBand;
use crate::entity::Team;

/// Timing, geometry and effect constants for the battle core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Delay between the victory latch and its delivery, in ms.
    pub victory_delay_ms: f64,
    /// Length of the reference frame that move speeds are expressed in, in ms.
    pub reference_frame_ms: f32,
    /// Engagement radius for units whose range is at or below `reach_cutoff`.
    pub melee_threshold: f32,
    /// Ranges above this use `range * range_scale` as engagement radius.
    pub reach_cutoff: f32,
    /// Lane units per range stat unit.
    pub range_scale: f32,
    /// Ranges above this fire projectiles instead of striking.
    pub ranged_cutoff: f32,
    /// Projectile speed at 1x, in lane units per reference frame.
    pub projectile_speed: f32,
    /// Distance at which a projectile hits its target.
    pub impact_radius: f32,
    /// Opacity lost per tick by a projectile without a target.
    pub projectile_fade_per_tick: f32,
    /// Speed-scaled wait before a charger starts running, in ms.
    pub charge_wait_ms: f32,
    /// Distance from the far edge at which a charge ends.
    pub charge_edge_tolerance: f32,
    /// x a player charger runs towards.
    pub player_charge_edge: f32,
    /// x an enemy charger runs towards.
    pub enemy_charge_edge: f32,
    /// Lifetime of HIT effects, in ms.
    pub hit_effect_ms: f64,
    /// Lifetime of SLASH effects, in ms.
    pub slash_effect_ms: f64,
    /// Lifetime of HEAL effects, in ms.
    pub heal_effect_ms: f64,
    /// Per-tick chance of a HEAL effect at 1x while regenerating.
    pub heal_effect_chance: f32,
    /// HEAL effects are drawn this far above the unit.
    pub heal_effect_lift: f32,
    /// Window after a hit during which snapshots report a hit flash, in ms.
    pub hit_flash_ms: f64,
    /// Spawn y band.
    pub spawn_y: SpawnBand,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            victory_delay_ms: 1500.0,
            reference_frame_ms: 16.0,
            melee_threshold: 5.0,
            reach_cutoff: 1.5,
            range_scale: 8.0,
            ranged_cutoff: 3.0,
            projectile_speed: 0.08,
            impact_radius: 2.0,
            projectile_fade_per_tick: 0.05,
            charge_wait_ms: 2000.0,
            charge_edge_tolerance: 2.0,
            player_charge_edge: 90.0,
            enemy_charge_edge: 10.0,
            hit_effect_ms: 300.0,
            slash_effect_ms: 300.0,
            heal_effect_ms: 600.0,
            heal_effect_chance: 0.01,
            heal_effect_lift: 2.0,
            hit_flash_ms: 150.0,
            spawn_y: SpawnBand::new(20.0, 60.0),
        }
    }
}

impl Tuning {
    /// x a charger of `team` runs towards.
    #[must_use]
    pub const fn charge_edge(&self, team: Team) -> f32 {
        match team {
            Team::Player => self.player_charge_edge,
            Team::Enemy => self.enemy_charge_edge,
        }
    }

    /// Engagement radius for an effective range.
    #[must_use]
    pub fn engagement_radius(&self, range: f32) -> f32 {
        if range > self.reach_cutoff {
            range * self.range_scale
        } else {
            self.melee_threshold
        }
    }

    /// Returns `true` if an effective range fires projectiles.
    #[must_use]
    pub fn is_ranged(&self, range: f32) -> bool {
        range > self.ranged_cutoff
    }

    /// Converts a frame delta in ms to reference frames.
    #[must_use]
    pub fn frames(&self, delta: f32) -> f32 {
        delta / self.reference_frame_ms
    }

    /// Named non-negative values, for validation.
    pub(crate) fn fields(&self) -> [(&'static str, f64); 20] {
        [
            ("victory_delay_ms", self.victory_delay_ms),
            ("reference_frame_ms", f64::from(self.reference_frame_ms)),
            ("melee_threshold", f64::from(self.melee_threshold)),
            ("reach_cutoff", f64::from(self.reach_cutoff)),
            ("range_scale", f64::from(self.range_scale)),
            ("ranged_cutoff", f64::from(self.ranged_cutoff)),
            ("projectile_speed", f64::from(self.projectile_speed)),
            ("impact_radius", f64::from(self.impact_radius)),
            ("projectile_fade_per_tick", f64::from(self.projectile_fade_per_tick)),
            ("charge_wait_ms", f64::from(self.charge_wait_ms)),
            ("charge_edge_tolerance", f64::from(self.charge_edge_tolerance)),
            ("player_charge_edge", f64::from(self.player_charge_edge)),
            ("enemy_charge_edge", f64::from(self.enemy_charge_edge)),
            ("hit_effect_ms", self.hit_effect_ms),
            ("slash_effect_ms", self.slash_effect_ms),
            ("heal_effect_ms", self.heal_effect_ms),
            ("heal_effect_chance", f64::from(self.heal_effect_chance)),
            ("heal_effect_lift", f64::from(self.heal_effect_lift)),
            ("hit_flash_ms", self.hit_flash_ms),
            ("spawn_y.variance", f64::from(self.spawn_y.variance)),
        ]
    }
}
