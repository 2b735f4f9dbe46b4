//! Entity module for the battle simulation.
//!
//! This module provides the core entity types for Legion's combat lane:
//! - [`EntityId`]: Unique identifier for combatants
//! - [`Team`]: Which side of the lane a combatant fights for
//! - [`UnitKind`]: Immutable identity of a combatant (soldier, obstacle, commander)
//! - [`Entity`]: The mutable simulation record for one combatant
//!
//! # Architecture
//!
//! Entities are plain data. Per-kind behavior lives in the behavior dispatch
//! table (see [`crate::behavior`]), selected through [`UnitKind::behavior_class`],
//! rather than in a type hierarchy.
//!
//! # Example
//!
//! ```
//! use legion_core::entity::{Entity, EntityId, Team, UnitKind};
//! use legion_core::entity::components::CombatState;
//! use glam::Vec2;
//!
//! let unit = Entity::new(
//!     EntityId::new(7),
//!     UnitKind::Infantry,
//!     Team::Player,
//!     Vec2::new(10.0, 50.0),
//!     CombatState::with_max_hp(100.0),
//! );
//!
//! assert_eq!(unit.id().as_u64(), 7);
//! assert!(unit.is_alive());
//! ```

pub mod components;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use components::{AiState, BuffId, BuffSet, ChargeState, CombatState};

/// Unique identifier for an entity.
///
/// Ids are assigned monotonically by the [`Arena`](crate::arena::Arena), so
/// ordering by id is the same as ordering by spawn time.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Side of the lane a combatant belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Team {
    /// The player's legion, spawning on the left edge.
    Player,
    /// The level's defenders, spawning on the right edge.
    Enemy,
}

impl Team {
    /// Returns the opposing team.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "PLAYER"),
            Self::Enemy => write!(f, "ENEMY"),
        }
    }
}

/// Commander class tag carried by commander base stats.
///
/// The class decides which aura (if any) a living commander grants to its team.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommanderClass {
    /// Static roster bonus outside the battle core; no aura.
    Centurion,
    /// Ranger aura for archers.
    Elf,
    /// Bloodlust aura for infantry.
    Warlord,
    /// Regeneration aura for shields.
    Guardian,
    /// Blitz aura for spears.
    Vanguard,
}

/// How a unit kind's per-tick behavior is dispatched.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorClass {
    /// Regen, then target/attack/move.
    Line,
    /// Charge stance and charge state machine before target/attack/move.
    Charger,
}

/// Category of a combatant.
///
/// Four soldier kinds, one obstacle kind and five commander kinds. The
/// serialized names match the game data keys.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitKind {
    /// Fast melee soldier.
    Infantry,
    /// Slow ranged soldier.
    Archer,
    /// Heavily armored melee soldier.
    Shield,
    /// Charging melee soldier.
    Spear,
    /// Immobile blocker.
    Obstacle,
    /// Centurion commander.
    CommanderCenturion,
    /// Elven ranger commander.
    CommanderElf,
    /// Iron warlord commander.
    CommanderWarlord,
    /// High guardian commander.
    CommanderGuardian,
    /// Storm vanguard commander.
    CommanderVanguard,
}

impl UnitKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Infantry,
        Self::Archer,
        Self::Shield,
        Self::Spear,
        Self::Obstacle,
        Self::CommanderCenturion,
        Self::CommanderElf,
        Self::CommanderWarlord,
        Self::CommanderGuardian,
        Self::CommanderVanguard,
    ];

    /// Returns `true` for the five commander kinds.
    #[must_use]
    pub const fn is_commander(self) -> bool {
        matches!(
            self,
            Self::CommanderCenturion
                | Self::CommanderElf
                | Self::CommanderWarlord
                | Self::CommanderGuardian
                | Self::CommanderVanguard
        )
    }

    /// Returns the behavior dispatch class for this kind.
    ///
    /// Spears and the vanguard commander use the charge state machine.
    #[must_use]
    pub const fn behavior_class(self) -> BehaviorClass {
        match self {
            Self::Spear | Self::CommanderVanguard => BehaviorClass::Charger,
            _ => BehaviorClass::Line,
        }
    }

    /// AI state a freshly spawned unit of this kind starts in.
    ///
    /// Only the spear soldier opens a battle waiting to charge.
    #[must_use]
    pub const fn initial_ai_state(self) -> AiState {
        match self {
            Self::Spear => AiState::Waiting,
            _ => AiState::Normal,
        }
    }

    /// Returns the game data key for this kind (e.g. `"COMMANDER_ELF"`).
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Infantry => "INFANTRY",
            Self::Archer => "ARCHER",
            Self::Shield => "SHIELD",
            Self::Spear => "SPEAR",
            Self::Obstacle => "OBSTACLE",
            Self::CommanderCenturion => "COMMANDER_CENTURION",
            Self::CommanderElf => "COMMANDER_ELF",
            Self::CommanderWarlord => "COMMANDER_WARLORD",
            Self::CommanderGuardian => "COMMANDER_GUARDIAN",
            Self::CommanderVanguard => "COMMANDER_VANGUARD",
        }
    }

    /// Parses a game data key, ignoring ASCII case.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(key.trim()))
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The mutable simulation record for one combatant.
///
/// Holds identity (id, kind, team), lane position, the spawn-time numeric
/// stats and hit points ([`CombatState`]), the current target, the charge
/// state machine ([`ChargeState`]) and the active buffs ([`BuffSet`]).
///
/// Effective stats are never stored here; see [`crate::stats`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    kind: UnitKind,
    team: Team,
    /// Position in the normalized 0–100 lane space.
    pub position: Vec2,
    /// Spawn stats, hit points and attack/hit timestamps.
    pub combat: CombatState,
    /// Current target (a back-reference, not ownership).
    pub target: Option<EntityId>,
    /// Charge state machine.
    pub charge: ChargeState,
    /// Active buffs.
    pub buffs: BuffSet,
}

impl Entity {
    /// Creates a new entity with no target, no buffs and the kind's initial AI state.
    #[must_use]
    pub fn new(id: EntityId, kind: UnitKind, team: Team, position: Vec2, combat: CombatState) -> Self {
        Self {
            id,
            kind,
            team,
            position,
            combat,
            target: None,
            charge: ChargeState::new(kind.initial_ai_state()),
            buffs: BuffSet::empty(),
        }
    }

    /// Returns the entity's unique identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the entity's kind.
    #[must_use]
    pub const fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Returns the entity's team.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    /// Returns `true` while hit points are above zero.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.combat.hp > 0.0
    }

    /// Returns `true` if `buff` is active.
    #[must_use]
    pub fn has_buff(&self, buff: BuffId) -> bool {
        self.buffs.contains(buff.flag())
    }

    /// Sets `buff` membership to `active`.
    ///
    /// Returns `true` if membership changed.
    pub fn toggle_buff(&mut self, buff: BuffId, active: bool) -> bool {
        if self.has_buff(buff) == active {
            return false;
        }
        self.buffs.set(buff.flag(), active);
        true
    }

    /// Euclidean distance to another entity.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f32 {
        self.position.distance(other.position)
    }
}
