//! Test helper functions for setting up battles and units.
//!
//! This module provides factory functions and setup utilities that make
//! writing tests more ergonomic and consistent.

use glam::Vec2;

use crate::arena::Arena;
use crate::data::GameData;
use crate::entity::components::CombatState;
use crate::entity::{EntityId, Team, UnitKind};
use crate::outcome::BattleOutcome;
use crate::simulation::Simulation;

/// Frame length used by every driver helper.
pub const FRAME_MS: f64 = 16.0;

// =============================================================================
// Battle Setup
// =============================================================================

/// A battle with no level enemies, already in the battle phase.
///
/// Units are added by hand through `sim.arena_mut()`.
pub fn empty_battle(seed: u64) -> Simulation {
    let data = GameData {
        levels: Vec::new(),
        ..GameData::default()
    };
    let mut sim = Simulation::new(data, 1, seed);
    sim.begin_battle();
    sim
}

/// A level battle with `roster` deployed and the battle begun.
pub fn level_battle(level: u32, roster: &[UnitKind], seed: u64) -> Simulation {
    let mut sim = Simulation::new(GameData::default(), level, seed);
    sim.sync_roster(roster);
    sim.begin_battle();
    sim
}

// =============================================================================
// Unit Factory Functions
// =============================================================================

/// A stat line with everything spelled out.
///
/// Range defaults to melee and the interval to one attack per second.
pub fn stat_line(hp: f32, attack: f32, defense: f32) -> CombatState {
    CombatState {
        attack,
        defense,
        ..CombatState::with_max_hp(hp)
    }
}

/// Spawns `kind` with its built-in base stats.
pub fn spawn_unit(arena: &mut Arena, kind: UnitKind, team: Team, position: Vec2) -> EntityId {
    let data = GameData::default();
    let base = data.base_stats(kind).cloned().expect("built-in stats");
    arena.spawn(kind, team, position, CombatState::from_base(&base))
}

/// Spawns an inert enemy obstacle far down the lane, keeping a battle open.
pub fn spawn_anchor(arena: &mut Arena) -> EntityId {
    arena.spawn(
        UnitKind::Obstacle,
        Team::Enemy,
        Vec2::new(99.0, 99.0),
        CombatState {
            range: 0.0,
            ..CombatState::with_max_hp(10_000.0)
        },
    )
}

// =============================================================================
// Accessors
// =============================================================================

/// Hit points of `id`, or `None` once it has left the arena.
pub fn get_hp(arena: &Arena, id: EntityId) -> Option<f32> {
    arena.get(id).map(|entity| entity.combat.hp)
}

/// Position of `id`.
pub fn get_position(arena: &Arena, id: EntityId) -> Option<Vec2> {
    arena.get(id).map(|entity| entity.position)
}

// =============================================================================
// Drivers
// =============================================================================

/// Runs `count` frames of `FRAME_MS` starting at `start`. Returns the time of
/// the next frame.
pub fn run_frames(sim: &mut Simulation, start: f64, count: u32) -> f64 {
    let mut time = start;
    for _ in 0..count {
        sim.frame(time);
        time += FRAME_MS;
    }
    time
}

/// Runs frames until an outcome is delivered or `limit_ms` of simulated time
/// passes.
pub fn run_to_outcome(sim: &mut Simulation, limit_ms: f64) -> Option<BattleOutcome> {
    let mut time = 0.0;
    while time <= limit_ms {
        if let Some(outcome) = sim.frame(time) {
            return Some(outcome);
        }
        time += FRAME_MS;
    }
    None
}
