//! # Legion Core
//!
//! Real-time combat simulation core for the Legion auto-battler.
//!
//! Two rosters of autonomous units fight on a 1-D lane until one side is
//! eliminated. This crate owns the battle: spawning, the per-frame tick,
//! targeting, movement, attack resolution, projectiles, commander auras,
//! visual effect events and the terminal outcome. Rendering, input and the
//! puzzle board that recruits units live outside it.
//!
//! ## Architecture
//!
//! - **Entities**: soldiers, obstacles and commanders in an [`arena::Arena`]
//! - **Behaviors**: per-class bundles (regen, charge, engage) run on a
//!   working copy of each unit against a frozen snapshot
//! - **Resolvers**: apply cross-entity outputs (launches, damage, events)
//!
//! ## Usage
//!
//! ```
//! use legion_core::{GameData, Simulation, UnitKind};
//!
//! let mut sim = Simulation::new(GameData::default(), 1, 7);
//! sim.sync_roster(&[UnitKind::CommanderWarlord, UnitKind::Infantry, UnitKind::Infantry]);
//! sim.begin_battle();
//! sim.frame(0.0);
//! sim.frame(16.0);
//!
//! let snapshot = sim.snapshot();
//! assert_eq!(snapshot.tick, 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod aura;
pub mod behavior;
pub mod behaviors;
pub mod control;
pub mod data;
pub mod effect;
pub mod entity;
pub mod error;
pub mod outcome;
pub mod output;
pub mod projectile;
pub mod resolver;
pub mod simulation;
pub mod snapshot;
pub mod spawn;
pub mod stats;
pub mod world_view;

#[cfg(test)]
mod tests;

pub use control::{Phase, SpeedMultiplier};
pub use data::GameData;
pub use entity::{EntityId, Team, UnitKind};
pub use error::ConfigError;
pub use outcome::{BattleOutcome, Verdict};
pub use simulation::Simulation;
pub use snapshot::{BattleSnapshot, UnitInspection};
