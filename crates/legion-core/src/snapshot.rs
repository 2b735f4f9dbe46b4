//! Read-only views of a battle for rendering layers and tooling.
//!
//! Snapshots are owned copies. Nothing in them refers back into the arena,
//! so a caller can hold one across ticks or serialize it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::control::{Phase, SpeedMultiplier};
use crate::data::GameData;
use crate::effect::VisualEffect;
use crate::entity::{AiState, BuffId, Entity, EntityId, Team, UnitKind};
use crate::projectile::Projectile;
use crate::stats::{base_stats, effective_stats, EffectiveStats, StatDeltas};

/// One entity as a renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Entity id.
    pub id: EntityId,
    /// Unit kind.
    pub kind: UnitKind,
    /// Side.
    pub team: Team,
    /// Lane position.
    pub position: Vec2,
    /// Current hit points.
    pub hp: f32,
    /// Effective max hit points.
    pub max_hp: f32,
    /// Visual scale.
    pub scale: f32,
    /// Charge state.
    pub ai_state: AiState,
    /// Current target.
    pub target: Option<EntityId>,
    /// Active buffs.
    pub buffs: Vec<BuffId>,
    /// Hit within the flash window.
    pub hit_flash: bool,
}

impl EntitySnapshot {
    fn capture(entity: &Entity, data: &GameData, time: f64) -> Self {
        let stats = effective_stats(&entity.combat, entity.buffs, data);
        let hit_flash = entity
            .combat
            .last_hit_time
            .is_some_and(|hit| time - hit < data.tuning.hit_flash_ms);
        Self {
            id: entity.id(),
            kind: entity.kind(),
            team: entity.team(),
            position: entity.position,
            hp: entity.combat.hp,
            max_hp: stats.max_hp,
            scale: entity.combat.scale,
            ai_state: entity.charge.state,
            target: entity.target,
            buffs: entity.buffs.ids().collect(),
            hit_flash,
        }
    }
}

/// Full battle state at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    /// Simulation time of the capture.
    pub time: f64,
    /// Ticks run so far.
    pub tick: u64,
    /// Battle phase.
    pub phase: Phase,
    /// Pause flag.
    pub paused: bool,
    /// Speed multiplier.
    pub speed: SpeedMultiplier,
    /// Entities in spawn order.
    pub entities: Vec<EntitySnapshot>,
    /// Projectiles in launch order.
    pub projectiles: Vec<Projectile>,
    /// Live visual effects.
    pub effects: Vec<VisualEffect>,
    /// Living player units.
    pub living_players: usize,
    /// Living enemy units.
    pub living_enemies: usize,
}

/// Battle-level fields captured alongside the arena.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SnapshotContext {
    pub time: f64,
    pub phase: Phase,
    pub paused: bool,
    pub speed: SpeedMultiplier,
}

impl BattleSnapshot {
    pub(crate) fn capture(arena: &Arena, data: &GameData, context: SnapshotContext) -> Self {
        Self {
            time: context.time,
            tick: arena.current_tick(),
            phase: context.phase,
            paused: context.paused,
            speed: context.speed,
            entities: arena
                .entities_sorted()
                .map(|entity| EntitySnapshot::capture(entity, data, context.time))
                .collect(),
            projectiles: arena.projectiles().cloned().collect(),
            effects: arena.effects().to_vec(),
            living_players: arena.living(Team::Player).count(),
            living_enemies: arena.living(Team::Enemy).count(),
        }
    }

    /// Looks up an entity by id.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&EntitySnapshot> {
        self.entities.iter().find(|entity| entity.id == id)
    }
}

/// An active buff with its display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuffInfo {
    /// Buff id.
    pub id: BuffId,
    /// Display label, or the id key if undefined.
    pub label: String,
    /// Display description.
    pub description: String,
    /// Granted by a commander.
    pub commander_aura: bool,
}

/// Detailed stat breakdown of one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitInspection {
    /// Entity id.
    pub id: EntityId,
    /// Unit kind.
    pub kind: UnitKind,
    /// Side.
    pub team: Team,
    /// Current hit points.
    pub hp: f32,
    /// Spawn stats, no buffs.
    pub base: EffectiveStats,
    /// Stats with buffs applied.
    pub effective: EffectiveStats,
    /// Buff contribution per stat.
    pub deltas: StatDeltas,
    /// Effective attacks per second at 1x.
    pub attacks_per_second: Option<f32>,
    /// Active buffs.
    pub buffs: Vec<BuffInfo>,
}

impl UnitInspection {
    pub(crate) fn capture(entity: &Entity, data: &GameData) -> Self {
        let base = base_stats(&entity.combat);
        let effective = effective_stats(&entity.combat, entity.buffs, data);
        let buffs = entity
            .buffs
            .ids()
            .map(|id| match data.buff(id) {
                Some(definition) => BuffInfo {
                    id,
                    label: definition.label.clone(),
                    description: definition.description.clone(),
                    commander_aura: definition.commander_aura,
                },
                None => BuffInfo {
                    id,
                    label: id.key().to_string(),
                    description: String::new(),
                    commander_aura: false,
                },
            })
            .collect();

        Self {
            id: entity.id(),
            kind: entity.kind(),
            team: entity.team(),
            hp: entity.combat.hp,
            base,
            effective,
            deltas: effective.deltas_from(&base),
            attacks_per_second: effective.attacks_per_second(),
            buffs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::components::CombatState;

    fn context(time: f64) -> SnapshotContext {
        SnapshotContext {
            time,
            phase: Phase::Battle,
            paused: false,
            speed: SpeedMultiplier::default(),
        }
    }

    mod snapshot_tests {
        use super::*;

        #[test]
        fn hit_flash_window() {
            let data = GameData::default();
            let mut arena = Arena::new();
            let id = arena.spawn(UnitKind::Infantry, Team::Player, Vec2::new(10.0, 50.0), CombatState::with_max_hp(100.0));
            arena.get_mut(id).unwrap().combat.take_damage(10.0, 1000.0);

            let flashing = BattleSnapshot::capture(&arena, &data, context(1100.0));
            assert!(flashing.entity(id).unwrap().hit_flash);

            let faded = BattleSnapshot::capture(&arena, &data, context(1150.0));
            assert!(!faded.entity(id).unwrap().hit_flash);
        }

        #[test]
        fn reports_effective_max_hp_and_counts() {
            let data = GameData::default();
            let mut arena = Arena::new();
            let id = arena.spawn(UnitKind::Infantry, Team::Player, Vec2::ZERO, CombatState::with_max_hp(100.0));
            arena.get_mut(id).unwrap().toggle_buff(BuffId::Frenzy, true);
            arena.spawn(UnitKind::Archer, Team::Enemy, Vec2::ZERO, CombatState::with_max_hp(60.0));

            let snapshot = BattleSnapshot::capture(&arena, &data, context(0.0));
            let infantry = snapshot.entity(id).unwrap();
            assert_eq!(infantry.max_hp, 150.0);
            assert_eq!(infantry.hp, 100.0);
            assert_eq!(infantry.buffs, vec![BuffId::Frenzy]);
            assert_eq!((snapshot.living_players, snapshot.living_enemies), (1, 1));
        }

        #[test]
        fn serializes_to_json() {
            let data = GameData::default();
            let mut arena = Arena::new();
            arena.spawn(UnitKind::Shield, Team::Enemy, Vec2::new(80.0, 30.0), CombatState::with_max_hp(200.0));

            let json = serde_json::to_value(BattleSnapshot::capture(&arena, &data, context(0.0))).unwrap();
            assert_eq!(json["phase"], "BATTLE");
            assert_eq!(json["speed"], 1);
            assert_eq!(json["entities"][0]["team"], "ENEMY");
        }
    }

    mod inspection_tests {
        use super::*;

        #[test]
        fn elf_range_breakdown() {
            let data = GameData::default();
            let base = data.base_stats(UnitKind::Archer).unwrap();
            let mut entity = Entity::new(
                EntityId::new(1),
                UnitKind::Archer,
                Team::Player,
                Vec2::ZERO,
                CombatState::from_base(base),
            );
            entity.toggle_buff(BuffId::ElfRange, true);

            let inspection = UnitInspection::capture(&entity, &data);
            assert_eq!(inspection.base.range, 6.0);
            assert_eq!(inspection.effective.range, 9.0);
            assert_eq!(inspection.deltas.attack_interval, -500.0);
            assert_eq!(inspection.effective.attack_interval, 1500.0);
            let aps = inspection.attacks_per_second.unwrap();
            assert!((aps - 1000.0 / 1500.0).abs() < 1e-6);
            assert_eq!(inspection.buffs[0].label, "Eagle Eye");
            assert!(inspection.buffs[0].commander_aura);
        }

        #[test]
        fn undefined_buff_falls_back_to_key() {
            let mut data = GameData::default();
            data.buffs.remove(&BuffId::SpearCharge);
            let mut entity = Entity::new(
                EntityId::new(1),
                UnitKind::Spear,
                Team::Enemy,
                Vec2::ZERO,
                CombatState::with_max_hp(120.0),
            );
            entity.toggle_buff(BuffId::SpearCharge, true);

            let inspection = UnitInspection::capture(&entity, &data);
            assert_eq!(inspection.buffs[0].label, "SPEAR_CHARGE");
            assert_eq!(inspection.deltas.defense, 0.0);
        }
    }
}
