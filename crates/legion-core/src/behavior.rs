//! Behavior dispatch for per-entity tick logic.
//!
//! Each unit kind maps to a [`BehaviorClass`]; the [`BehaviorRegistry`]
//! holds the ordered list of behaviors that class runs every tick. Kinds are
//! plain data, and the dispatch table replaces any per-kind type hierarchy.
//!
//! # Execution model
//!
//! A behavior receives:
//! - a [`WorldView`] over the tick's snapshot (other units as they were when the tick started)
//! - `unit`: the entity's own working copy, which it may mutate freely
//! - an [`OutputBuffer`] for anything that touches another entity or the effect stream
//! - the simulation's seeded RNG
//!
//! Behaviors run in registration order. A behavior returns [`Flow::Yield`]
//! to end the unit's turn early (for example, while charging).
//!
//! # Default bundles
//!
//! | Class | Behaviors |
//! |---|---|
//! | `Line` | regen, engage |
//! | `Charger` | charge stance, regen, charge run, engage |
//!
//! # Example
//!
//! ```
//! use legion_core::behavior::{BehaviorId, BehaviorRegistry};
//! use legion_core::entity::BehaviorClass;
//!
//! let registry = BehaviorRegistry::default_bundles();
//! let ids: Vec<_> = registry.behaviors_for(BehaviorClass::Charger).iter().map(|b| b.id()).collect();
//! assert_eq!(ids, vec![BehaviorId::ChargeStance, BehaviorId::Regen, BehaviorId::ChargeRun, BehaviorId::Engage]);
//! ```

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::entity::{BehaviorClass, Entity};
use crate::output::OutputBuffer;
use crate::world_view::WorldView;

/// Identifies a behavior in output provenance.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BehaviorId {
    /// Holds the charge buff while waiting or charging.
    ChargeStance,
    /// Regenerates hit points under a regen buff.
    Regen,
    /// Advances the charge state machine.
    ChargeRun,
    /// Targets, attacks or moves.
    Engage,
}

impl fmt::Display for BehaviorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ChargeStance => "charge_stance",
            Self::Regen => "regen",
            Self::ChargeRun => "charge_run",
            Self::Engage => "engage",
        };
        f.write_str(name)
    }
}

/// Whether the remaining behaviors run this tick.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Run the next behavior.
    Continue,
    /// End this unit's turn.
    Yield,
}

/// One step of a unit's per-tick logic.
pub trait Behavior: Send + Sync {
    /// Identifier used in output provenance.
    fn id(&self) -> BehaviorId;

    /// Runs the behavior on `unit`'s working copy.
    fn run(&self, view: &WorldView<'_>, unit: &mut Entity, out: &mut OutputBuffer, rng: &mut ChaCha8Rng) -> Flow;
}

/// Ordered behavior lists keyed by behavior class.
#[derive(Default)]
pub struct BehaviorRegistry {
    bundles: HashMap<BehaviorClass, Vec<Arc<dyn Behavior>>>,
}

impl fmt::Debug for BehaviorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (class, behaviors) in &self.bundles {
            let ids: Vec<_> = behaviors.iter().map(|b| b.id()).collect();
            map.entry(class, &ids);
        }
        map.finish()
    }
}

impl BehaviorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `behavior` to the bundle of `class`.
    pub fn register(&mut self, class: BehaviorClass, behavior: Arc<dyn Behavior>) {
        self.bundles.entry(class).or_default().push(behavior);
    }

    /// Behaviors for `class`, in run order.
    #[must_use]
    pub fn behaviors_for(&self, class: BehaviorClass) -> &[Arc<dyn Behavior>] {
        self.bundles.get(&class).map_or(&[][..], Vec::as_slice)
    }

    /// Total number of registrations.
    #[must_use]
    pub fn registration_count(&self) -> usize {
        self.bundles.values().map(Vec::len).sum()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bundles.values().all(Vec::is_empty)
    }

    /// Runs `unit`'s bundle until a behavior yields.
    ///
    /// Returns the behavior that yielded, if any.
    pub fn run(
        &self,
        view: &WorldView<'_>,
        unit: &mut Entity,
        out: &mut OutputBuffer,
        rng: &mut ChaCha8Rng,
    ) -> Option<BehaviorId> {
        for behavior in self.behaviors_for(unit.kind().behavior_class()) {
            if behavior.run(view, unit, out, rng) == Flow::Yield {
                return Some(behavior.id());
            }
        }
        None
    }

    /// Registry with the built-in bundles.
    #[must_use]
    pub fn default_bundles() -> Self {
        use crate::behaviors::{ChargeRun, ChargeStance, Engage, Regen};

        let regen: Arc<dyn Behavior> = Arc::new(Regen);
        let engage: Arc<dyn Behavior> = Arc::new(Engage);

        let mut registry = Self::new();

        registry.register(BehaviorClass::Line, Arc::clone(&regen));
        registry.register(BehaviorClass::Line, Arc::clone(&engage));

        registry.register(BehaviorClass::Charger, Arc::new(ChargeStance));
        registry.register(BehaviorClass::Charger, regen);
        registry.register(BehaviorClass::Charger, Arc::new(ChargeRun));
        registry.register(BehaviorClass::Charger, engage);

        registry
    }
}
