//! Spawning of enemy and allied units.
//!
//! Enemies are spawned once per level from the level's roster and scaled by
//! its difficulty multiplier. Allies are spawned incrementally from the
//! player's append-only summon queue; [`AllySpawner`] remembers how many
//! queue entries it has already materialized.
//!
//! Neither path applies aura buffs. Auras are synchronized at the start of
//! every tick (see [`crate::aura`]).

use std::collections::BTreeSet;

use glam::Vec2;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::data::GameData;
use crate::entity::components::CombatState;
use crate::entity::{EntityId, Team, UnitKind};

/// Spawns the enemy roster of a 1-based `level`.
///
/// Regular units come first, in kind order, then the level's commanders.
/// Kinds without base stats are skipped.
pub fn spawn_enemies(arena: &mut Arena, data: &GameData, level: u32, rng: &mut ChaCha8Rng) -> Vec<EntityId> {
    let Some(config) = data.level(level) else {
        tracing::warn!(level, "No level configuration; spawning no enemies");
        return Vec::new();
    };
    let mult = config.difficulty_mult;

    let roster = config
        .unit_counts
        .iter()
        .flat_map(|(kind, count)| std::iter::repeat(*kind).take(*count as usize))
        .chain(config.enemy_commanders.iter().copied());

    let mut spawned = Vec::new();
    for kind in roster {
        let Some(base) = data.base_stats(kind) else {
            tracing::warn!(%kind, "Missing base stats; enemy skipped");
            continue;
        };
        let mut combat = CombatState::from_base(base);
        combat.max_hp = (base.hp * mult).floor();
        combat.hp = combat.max_hp;
        combat.attack = (base.attack * mult).floor();
        combat.scale = base.scale * mult;

        let position = spawn_position(data, kind, Team::Enemy, rng);
        spawned.push(arena.spawn(kind, Team::Enemy, position, combat));
    }

    tracing::debug!(level, count = spawned.len(), difficulty = mult, "Enemies spawned");
    spawned
}

/// Materializes newly appended summon queue entries as allied units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllySpawner {
    processed: usize,
}

impl AllySpawner {
    /// Creates a spawner that has processed nothing.
    #[must_use]
    pub const fn new() -> Self {
        Self { processed: 0 }
    }

    /// Number of queue entries already materialized.
    #[must_use]
    pub const fn processed(&self) -> usize {
        self.processed
    }

    /// Spawns every queue entry past the processed count.
    ///
    /// Unlocked upgrades add their bonus to hp, max hp, attack, defense, move
    /// speed and scale before the unit enters the arena.
    pub fn sync(
        &mut self,
        queue: &[UnitKind],
        upgrades: &BTreeSet<UnitKind>,
        arena: &mut Arena,
        data: &GameData,
        rng: &mut ChaCha8Rng,
    ) -> Vec<EntityId> {
        let Some(fresh) = queue.get(self.processed..) else {
            tracing::warn!(queue = queue.len(), processed = self.processed, "Summon queue shrank; ignoring");
            return Vec::new();
        };

        let mut spawned = Vec::new();
        for &kind in fresh {
            let Some(base) = data.base_stats(kind) else {
                tracing::warn!(%kind, "Missing base stats; ally skipped");
                continue;
            };
            let mut combat = CombatState::from_base(base);
            if upgrades.contains(&kind) {
                if let Some(bonus) = data.upgrades.get(&kind) {
                    combat.max_hp += bonus.hp;
                    combat.hp = combat.max_hp;
                    combat.attack += bonus.attack;
                    combat.defense += bonus.defense;
                    combat.move_speed += bonus.move_speed;
                    combat.scale += bonus.scale;
                }
            }

            let position = spawn_position(data, kind, Team::Player, rng);
            let id = arena.spawn(kind, Team::Player, position, combat);
            tracing::debug!(unit = %id, %kind, upgraded = upgrades.contains(&kind), "Ally spawned");
            spawned.push(id);
        }

        self.processed = queue.len();
        spawned
    }
}

fn spawn_position(data: &GameData, kind: UnitKind, team: Team, rng: &mut ChaCha8Rng) -> Vec2 {
    let x = data.spawn.table(team).band_for(kind).sample(rng);
    let y = data.tuning.spawn_y.sample(rng);
    Vec2::new(x, y)
}
