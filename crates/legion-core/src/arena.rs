//! Arena module for the battle simulation.
//!
//! The Arena is the container for everything a battle owns:
//! - Entities with deterministic iteration order (`BTreeMap`)
//! - Projectiles in flight
//! - The visual effect stream
//! - Strikes resolved this tick, drained by the simulation at tick end
//!
//! # Architecture
//!
//! Entity ids are assigned monotonically, so the `BTreeMap` iterates in spawn
//! order. That order is the per-entity processing order of a tick, which keeps
//! battles reproducible for a given seed.
//!
//! The simulation keeps two arenas (`current` and `next`) and swaps them each
//! tick; see [`crate::simulation`].
//!
//! # Example
//!
//! ```
//! use legion_core::arena::Arena;
//! use legion_core::entity::{Team, UnitKind};
//! use legion_core::entity::components::CombatState;
//! use glam::Vec2;
//!
//! let mut arena = Arena::new();
//! let a = arena.spawn(UnitKind::Infantry, Team::Player, Vec2::new(10.0, 50.0), CombatState::with_max_hp(100.0));
//! let b = arena.spawn(UnitKind::Archer, Team::Enemy, Vec2::new(90.0, 50.0), CombatState::with_max_hp(60.0));
//!
//! let ids: Vec<_> = arena.entity_ids_sorted().collect();
//! assert_eq!(ids, vec![a, b]);
//! assert_eq!(arena.living(Team::Enemy).count(), 1);
//! ```

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::data::Tuning;
use crate::effect::{EffectKind, VisualEffect};
use crate::entity::components::CombatState;
use crate::entity::{Entity, EntityId, Team, UnitKind};
use crate::output::StrikeRecord;
use crate::projectile::{Flight, Projectile, ProjectileId};

/// Parameters of a projectile launch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    /// Firing entity.
    pub source: EntityId,
    /// Target entity.
    pub target: EntityId,
    /// Launch position.
    pub origin: Vec2,
    /// Damage on impact.
    pub damage: f32,
    /// Lane units per reference frame.
    pub speed: f32,
    /// Initial heading in radians.
    pub heading: f32,
}

/// Battle container with deterministic iteration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Arena {
    next_entity_id: u64,
    next_projectile_id: u64,
    next_effect_id: u64,
    /// Entity storage, iterated in spawn order.
    entities: BTreeMap<EntityId, Entity>,
    projectiles: BTreeMap<ProjectileId, Projectile>,
    effects: Vec<VisualEffect>,
    journal: Vec<StrikeRecord>,
    tick: u64,
}

impl Arena {
    /// Creates an empty arena at tick 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Entities
    // =========================================================================

    /// Spawns a new entity and returns its id.
    pub fn spawn(&mut self, kind: UnitKind, team: Team, position: Vec2, combat: CombatState) -> EntityId {
        let id = EntityId::new(self.next_entity_id);
        self.next_entity_id += 1;
        self.entities.insert(id, Entity::new(id, kind, team, position, combat));
        id
    }

    /// Returns a reference to an entity by id.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns a mutable reference to an entity by id.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Replaces an existing entity with an updated copy.
    ///
    /// Does nothing if the id is not present.
    pub fn commit(&mut self, entity: Entity) {
        if let Some(slot) = self.entities.get_mut(&entity.id()) {
            *slot = entity;
        }
    }

    /// Entity ids in spawn order.
    pub fn entity_ids_sorted(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    /// Entities in spawn order.
    pub fn entities_sorted(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// Mutable entities in spawn order.
    pub fn entities_sorted_mut(&mut self) -> impl Iterator<Item = &mut Entity> + '_ {
        self.entities.values_mut()
    }

    /// Living entities of `team`, in spawn order.
    pub fn living(&self, team: Team) -> impl Iterator<Item = &Entity> + '_ {
        self.entities
            .values()
            .filter(move |e| e.team() == team && e.is_alive())
    }

    /// Drops every entity with hp at or below zero. Returns how many were dropped.
    pub fn retain_living(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(|_, e| e.is_alive());
        before - self.entities.len()
    }

    /// Number of entities, living or not.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if there are no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    // =========================================================================
    // Projectiles
    // =========================================================================

    /// Adds a projectile in flight and returns its id.
    pub fn launch(&mut self, launch: Launch) -> ProjectileId {
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id += 1;
        self.projectiles.insert(
            id,
            Projectile {
                id,
                source: launch.source,
                target: Some(launch.target),
                position: launch.origin,
                damage: launch.damage,
                speed: launch.speed,
                heading: launch.heading,
                opacity: 1.0,
            },
        );
        id
    }

    /// Projectiles in launch order.
    pub fn projectiles(&self) -> impl Iterator<Item = &Projectile> + '_ {
        self.projectiles.values()
    }

    /// Number of projectiles in flight.
    #[must_use]
    pub fn projectile_count(&self) -> usize {
        self.projectiles.len()
    }

    /// Runs the projectile phase of a tick.
    ///
    /// Impacts damage the target in place, stamp its hit time, emit a HIT
    /// effect and a journal record. Spent projectiles are removed.
    pub fn advance_projectiles(&mut self, time: f64, frames: f32, tuning: &Tuning) {
        let ids: Vec<ProjectileId> = self.projectiles.keys().copied().collect();

        for id in ids {
            let Some(projectile) = self.projectiles.get(&id) else {
                continue;
            };
            let goal = projectile
                .target
                .and_then(|target| self.entities.get(&target))
                .map(|e| e.position);

            let Some(projectile) = self.projectiles.get_mut(&id) else {
                continue;
            };
            let source = projectile.source;

            match projectile.advance(goal, frames, tuning) {
                Flight::Impact { target, damage } => {
                    self.projectiles.remove(&id);
                    let Some(entity) = self.entities.get_mut(&target) else {
                        continue;
                    };
                    entity.combat.take_damage(damage, time);
                    let position = entity.position;
                    self.push_effect(EffectKind::Hit, position, time, EffectKind::Hit.duration(tuning));
                    self.record_strike(StrikeRecord {
                        source,
                        target,
                        amount: damage,
                        ranged: true,
                        time,
                    });
                }
                Flight::Homing | Flight::Fading => {}
                Flight::Spent => {
                    self.projectiles.remove(&id);
                }
            }
        }
    }

    // =========================================================================
    // Effects and journal
    // =========================================================================

    /// Appends a visual effect living `duration` ms from `time`.
    pub fn push_effect(&mut self, kind: EffectKind, position: Vec2, time: f64, duration: f64) -> u64 {
        let id = self.next_effect_id;
        self.next_effect_id += 1;
        self.effects.push(VisualEffect {
            id,
            position,
            kind,
            created_at: time,
            duration,
        });
        id
    }

    /// Live effects in creation order.
    #[must_use]
    pub fn effects(&self) -> &[VisualEffect] {
        &self.effects
    }

    /// Removes every effect whose lifetime has elapsed at `time`.
    pub fn prune_effects(&mut self, time: f64) {
        self.effects.retain(|effect| !effect.expired(time));
    }

    /// Appends a strike to the journal.
    pub fn record_strike(&mut self, record: StrikeRecord) {
        self.journal.push(record);
    }

    /// Strikes recorded since the last drain.
    #[must_use]
    pub fn journal(&self) -> &[StrikeRecord] {
        &self.journal
    }

    /// Takes every journal record, leaving the journal empty.
    pub fn drain_journal(&mut self) -> Vec<StrikeRecord> {
        std::mem::take(&mut self.journal)
    }

    // =========================================================================
    // Ticks
    // =========================================================================

    /// Number of ticks run so far.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Advances the tick counter.
    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }
}

// =============================================================================
// Tests
// =============================================================================
