//! `WorldView` provides read-only access to the tick's snapshot for behaviors.
//!
//! Behaviors see the state as it was when the tick started (after death
//! filtering and aura sync). They never see each other's writes from the
//! same tick, which makes per-entity behavior order-independent except for
//! the order of emitted outputs.
//!
//! The view also carries the tick's timing: simulation time, frame delta and
//! speed multiplier, with helpers for the two ways time is scaled (raw
//! milliseconds and reference frames).
//!
//! # Example
//!
//! ```
//! use legion_core::arena::Arena;
//! use legion_core::data::GameData;
//! use legion_core::entity::{Team, UnitKind};
//! use legion_core::entity::components::CombatState;
//! use legion_core::world_view::{TickClock, WorldView};
//! use glam::Vec2;
//!
//! let data = GameData::default();
//! let mut arena = Arena::new();
//! let me = arena.spawn(UnitKind::Infantry, Team::Player, Vec2::new(10.0, 50.0), CombatState::with_max_hp(100.0));
//! let near = arena.spawn(UnitKind::Infantry, Team::Enemy, Vec2::new(20.0, 50.0), CombatState::with_max_hp(100.0));
//! arena.spawn(UnitKind::Infantry, Team::Enemy, Vec2::new(80.0, 50.0), CombatState::with_max_hp(100.0));
//!
//! let view = WorldView::new(&arena, &data, TickClock::new(0.0, 16.0, 1.0));
//! let unit = view.get_entity(me).unwrap();
//! assert_eq!(view.nearest_opponent(unit).map(|e| e.id()), Some(near));
//! ```

use crate::arena::Arena;
use crate::data::{GameData, Tuning};
use crate::entity::{Entity, EntityId};
use crate::stats::{effective_stats, EffectiveStats};

/// Timing of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickClock {
    /// Simulation time in ms.
    pub time: f64,
    /// Frame delta in ms.
    pub delta: f32,
    /// Speed multiplier (1, 2 or 3).
    pub speed: f32,
}

impl TickClock {
    /// Creates a clock.
    #[must_use]
    pub const fn new(time: f64, delta: f32, speed: f32) -> Self {
        Self { time, delta, speed }
    }

    /// Speed-scaled delta in ms.
    #[must_use]
    pub fn scaled_ms(&self) -> f32 {
        self.delta * self.speed
    }

    /// Speed-scaled delta in reference frames.
    #[must_use]
    pub fn scaled_frames(&self, tuning: &Tuning) -> f32 {
        tuning.frames(self.delta) * self.speed
    }
}

/// Read-only view of the tick's snapshot.
#[derive(Debug, Clone, Copy)]
pub struct WorldView<'a> {
    arena: &'a Arena,
    data: &'a GameData,
    clock: TickClock,
}

impl<'a> WorldView<'a> {
    /// Creates a view over `arena`.
    #[must_use]
    pub const fn new(arena: &'a Arena, data: &'a GameData, clock: TickClock) -> Self {
        Self { arena, data, clock }
    }

    /// The tick's timing.
    #[must_use]
    pub const fn clock(&self) -> TickClock {
        self.clock
    }

    /// Game data.
    #[must_use]
    pub const fn data(&self) -> &'a GameData {
        self.data
    }

    /// Feel constants.
    #[must_use]
    pub const fn tuning(&self) -> &'a Tuning {
        &self.data.tuning
    }

    /// Returns an entity from the snapshot.
    #[must_use]
    pub fn get_entity(&self, id: EntityId) -> Option<&'a Entity> {
        self.arena.get(id)
    }

    /// Effective stats of `entity` as of the snapshot.
    #[must_use]
    pub fn effective_stats(&self, entity: &Entity) -> EffectiveStats {
        effective_stats(&entity.combat, entity.buffs, self.data)
    }

    /// Nearest living opponent of `unit` by Euclidean distance.
    ///
    /// Ties go to the earliest spawned opponent.
    #[must_use]
    pub fn nearest_opponent(&self, unit: &Entity) -> Option<&'a Entity> {
        let mut best: Option<(f32, &'a Entity)> = None;
        for candidate in self.arena.living(unit.team().opponent()) {
            let distance = unit.distance_to(candidate);
            if best.map_or(true, |(closest, _)| distance < closest) {
                best = Some((distance, candidate));
            }
        }
        best.map(|(_, entity)| entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::components::CombatState;
    use crate::entity::{BuffId, Team, UnitKind};
    use glam::Vec2;

    fn spawn(arena: &mut Arena, team: Team, x: f32, y: f32) -> EntityId {
        arena.spawn(UnitKind::Infantry, team, Vec2::new(x, y), CombatState::with_max_hp(100.0))
    }

    #[test]
    fn ties_go_to_first_spawned() {
        let data = GameData::default();
        let mut arena = Arena::new();
        let me = spawn(&mut arena, Team::Player, 50.0, 50.0);
        let above = spawn(&mut arena, Team::Enemy, 50.0, 40.0);
        let _below = spawn(&mut arena, Team::Enemy, 50.0, 60.0);

        let view = WorldView::new(&arena, &data, TickClock::new(0.0, 16.0, 1.0));
        let unit = view.get_entity(me).unwrap();
        assert_eq!(view.nearest_opponent(unit).map(Entity::id), Some(above));
    }

    #[test]
    fn dead_and_friendly_units_are_skipped() {
        let data = GameData::default();
        let mut arena = Arena::new();
        let me = spawn(&mut arena, Team::Player, 10.0, 50.0);
        spawn(&mut arena, Team::Player, 11.0, 50.0);
        let dead = spawn(&mut arena, Team::Enemy, 12.0, 50.0);
        let far = spawn(&mut arena, Team::Enemy, 90.0, 50.0);
        arena.get_mut(dead).unwrap().combat.hp = 0.0;

        let view = WorldView::new(&arena, &data, TickClock::new(0.0, 16.0, 1.0));
        let unit = view.get_entity(me).unwrap();
        assert_eq!(view.nearest_opponent(unit).map(Entity::id), Some(far));
    }

    #[test]
    fn no_opponents_means_no_target() {
        let data = GameData::default();
        let mut arena = Arena::new();
        let me = spawn(&mut arena, Team::Player, 10.0, 50.0);
        let view = WorldView::new(&arena, &data, TickClock::new(0.0, 16.0, 1.0));
        assert!(view.nearest_opponent(view.get_entity(me).unwrap()).is_none());
    }

    #[test]
    fn effective_stats_read_snapshot_buffs() {
        let data = GameData::default();
        let mut arena = Arena::new();
        let me = spawn(&mut arena, Team::Player, 10.0, 50.0);
        arena.get_mut(me).unwrap().toggle_buff(BuffId::SpearCharge, true);
        let view = WorldView::new(&arena, &data, TickClock::new(0.0, 16.0, 1.0));
        let stats = view.effective_stats(view.get_entity(me).unwrap());
        assert!((stats.defense - 15.0).abs() < 1e-6);
    }

    #[test]
    fn clock_scales_by_speed() {
        let tuning = Tuning::default();
        let clock = TickClock::new(0.0, 16.0, 3.0);
        assert!((clock.scaled_ms() - 48.0).abs() < 1e-6);
        assert!((clock.scaled_frames(&tuning) - 3.0).abs() < 1e-6);
    }
}
