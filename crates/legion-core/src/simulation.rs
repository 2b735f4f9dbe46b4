//! Battle simulation with the double-buffered tick.
//!
//! The `Simulation` struct owns one battle from deployment to outcome. Each
//! tick runs these phases in order:
//!
//! 1. **BOOKKEEPING**: count enemy deaths, drop dead units, judge the outcome
//! 2. **AURAS**: toggle commander aura buffs on the living
//! 3. **BEHAVIOR**: each unit, in spawn order, runs its behavior bundle on a
//!    working copy against the frozen `current` arena and emits outputs
//! 4. **RESOLUTION**: working copies are committed to `next`, resolvers apply
//!    outputs to `next`, hit points are clamped to effective max hp
//! 5. **APPLY**: swap buffers, advance the tick counter
//! 6. **PROJECTILES / EFFECTS**: projectiles fly and impact, expired effects
//!    are pruned, the tick's strikes move to the simulation's journal
//!
//! # Determinism
//!
//! Entities are iterated in id order (via `BTreeMap`) and every random draw
//! comes from one `ChaCha8Rng` seeded at construction. The same seed, data
//! and inputs produce identical snapshots.
//!
//! # Example
//!
//! ```
//! use legion_core::data::GameData;
//! use legion_core::entity::UnitKind;
//! use legion_core::simulation::Simulation;
//!
//! let mut sim = Simulation::new(GameData::default(), 1, 42);
//! sim.sync_roster(&[UnitKind::CommanderCenturion, UnitKind::Infantry]);
//! assert!(sim.begin_battle());
//!
//! let mut time = 0.0;
//! while sim.outcome().is_none() && time < 600_000.0 {
//!     sim.frame(time);
//!     time += 16.0;
//! }
//! assert!(sim.outcome().is_some());
//! ```

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;
use std::fmt;

use crate::arena::Arena;
use crate::aura::sync_auras;
use crate::behavior::BehaviorRegistry;
use crate::control::{FrameClock, Phase, SpeedMultiplier};
use crate::data::GameData;
use crate::entity::{EntityId, Team, UnitKind};
use crate::outcome::{judge, BattleOutcome, KillTally, OutcomeLatch, Verdict};
use crate::output::{OutputBuffer, StrikeRecord};
use crate::resolver::{default_resolvers, Resolver};
use crate::snapshot::{BattleSnapshot, SnapshotContext, UnitInspection};
use crate::spawn::{spawn_enemies, AllySpawner};
use crate::stats::effective_stats;
use crate::world_view::{TickClock, WorldView};

/// Callback invoked once when the outcome is delivered.
pub type OutcomeListener = Box<dyn FnOnce(&BattleOutcome) + Send>;

/// One battle, from deployment to delivered outcome.
///
/// # Double Buffering
///
/// The simulation uses two arenas:
/// - `current`: read-only snapshot for the behavior phase
/// - `next`: mutable state that commits and resolvers write to
///
/// After each tick the buffers are swapped.
pub struct Simulation {
    /// Current arena state (read-only during the behavior phase).
    current: Arena,
    /// Next arena state (written by commits and resolvers).
    next: Arena,
    /// Behavior bundles by behavior class.
    behaviors: BehaviorRegistry,
    /// Resolvers, run in order.
    resolvers: Vec<Box<dyn Resolver>>,
    data: GameData,
    level: u32,
    seed: u64,
    rng: ChaCha8Rng,
    allies: AllySpawner,
    upgrades: BTreeSet<UnitKind>,
    kills: KillTally,
    /// Strikes collected from the arena at the end of each tick.
    journal: Vec<StrikeRecord>,
    latch: OutcomeLatch,
    listener: Option<OutcomeListener>,
    phase: Phase,
    paused: bool,
    speed: SpeedMultiplier,
    clock: FrameClock,
    /// Time of the most recent tick or frame.
    time: f64,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("current", &self.current)
            .field("behaviors", &self.behaviors)
            .field("resolvers", &format!("[{} resolvers]", self.resolvers.len()))
            .field("level", &self.level)
            .field("seed", &self.seed)
            .field("kills", &self.kills)
            .field("journal", &self.journal.len())
            .field("latch", &self.latch)
            .field("listener", &self.listener.is_some())
            .field("phase", &self.phase)
            .field("paused", &self.paused)
            .field("speed", &self.speed)
            .field("time", &self.time)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Creates a battle for a 1-based `level` and spawns its enemies.
    ///
    /// The battle starts in [`Phase::Deploying`] with the default behavior
    /// bundles and resolvers (Launch, Combat, Event).
    #[must_use]
    pub fn new(data: GameData, level: u32, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut current = Arena::new();
        let enemies = spawn_enemies(&mut current, &data, level, &mut rng);
        tracing::info!(level, seed, enemies = enemies.len(), "Battle created");

        Self {
            current,
            next: Arena::new(),
            behaviors: BehaviorRegistry::default_bundles(),
            resolvers: default_resolvers(),
            data,
            level,
            seed,
            rng,
            allies: AllySpawner::new(),
            upgrades: BTreeSet::new(),
            kills: KillTally::new(),
            journal: Vec::new(),
            latch: OutcomeLatch::new(),
            listener: None,
            phase: Phase::Deploying,
            paused: false,
            speed: SpeedMultiplier::default(),
            clock: FrameClock::new(),
            time: 0.0,
        }
    }

    /// Replaces the behavior registry.
    #[must_use]
    pub fn with_behaviors(mut self, behaviors: BehaviorRegistry) -> Self {
        self.behaviors = behaviors;
        self
    }

    // =========================================================================
    // Inputs
    // =========================================================================

    /// Spawns the summon queue entries appended since the last call.
    ///
    /// `queue` is the full append-only queue, commander first. Ignored once
    /// the battle is finished.
    pub fn sync_roster(&mut self, queue: &[UnitKind]) -> Vec<EntityId> {
        if self.phase == Phase::Finished {
            tracing::debug!(queue = queue.len(), "Roster growth after battle end ignored");
            return Vec::new();
        }
        self.allies
            .sync(queue, &self.upgrades, &mut self.current, &self.data, &mut self.rng)
    }

    /// Sets which kinds have their upgrade unlocked. Affects later spawns only.
    pub fn set_upgrades(&mut self, upgrades: BTreeSet<UnitKind>) {
        self.upgrades = upgrades;
    }

    /// Leaves deployment and starts ticking.
    ///
    /// Returns `false` if the battle already started.
    pub fn begin_battle(&mut self) -> bool {
        if self.phase != Phase::Deploying {
            return false;
        }
        self.phase = Phase::Battle;
        tracing::info!(
            players = self.living_count(Team::Player),
            enemies = self.living_count(Team::Enemy),
            "Battle started"
        );
        true
    }

    /// Registers the outcome listener, replacing any previous one.
    ///
    /// If the outcome was already delivered the listener runs immediately.
    pub fn on_outcome(&mut self, listener: impl FnOnce(&BattleOutcome) + Send + 'static) {
        match self.latch.delivered() {
            Some(outcome) => listener(outcome),
            None => self.listener = Some(Box::new(listener)),
        }
    }

    // =========================================================================
    // Controls
    // =========================================================================

    /// Freezes ticking. Deferred outcome delivery is not held.
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            tracing::debug!(time = self.time, "Paused");
        }
    }

    /// Resumes ticking.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            tracing::debug!(time = self.time, "Resumed");
        }
    }

    /// Returns `true` while paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Sets the speed multiplier. Projectiles in flight keep their speed.
    pub fn set_speed(&mut self, speed: SpeedMultiplier) {
        if self.speed != speed {
            tracing::debug!(from = %self.speed, to = %speed, "Speed changed");
            self.speed = speed;
        }
    }

    /// Advances to the next speed in the 1, 2, 3 cycle and returns it.
    pub fn cycle_speed(&mut self) -> SpeedMultiplier {
        self.set_speed(self.speed.cycle());
        self.speed
    }

    /// Current speed multiplier.
    #[must_use]
    pub const fn speed(&self) -> SpeedMultiplier {
        self.speed
    }

    /// Forces an immediate defeat.
    ///
    /// Returns `false` and does nothing if an outcome is already latched.
    pub fn surrender(&mut self) -> bool {
        if self.latch.is_latched() {
            return false;
        }
        tracing::info!(time = self.time, "Surrendered");
        self.latch
            .latch(BattleOutcome::defeat(self.kills.counts().clone()), self.time);
        self.poll_outcome(self.time);
        true
    }

    // =========================================================================
    // Driving
    // =========================================================================

    /// Animation-frame entry point.
    ///
    /// Derives the frame delta from the previous frame's time, ticks when in
    /// battle and unpaused, then delivers a due outcome. Returns the outcome
    /// if it was delivered during this frame.
    pub fn frame(&mut self, time: f64) -> Option<BattleOutcome> {
        let delta = self.clock.advance(time);
        self.time = time;
        if let Some(outcome) = self.tick(time, delta) {
            return Some(outcome);
        }
        self.poll_outcome(time)
    }

    /// Runs one tick at `time` with a frame `delta` in ms.
    ///
    /// Does nothing outside [`Phase::Battle`] or while paused. Returns the
    /// outcome if it was delivered during this tick.
    pub fn tick(&mut self, time: f64, delta: f32) -> Option<BattleOutcome> {
        if self.phase != Phase::Battle || self.paused {
            return None;
        }
        self.time = time;
        let clock = TickClock::new(time, delta, self.speed.as_f32());

        // BOOKKEEPING: deaths are counted before the dead are dropped
        for entity in self.current.entities_sorted() {
            if self.kills.record(entity) {
                tracing::debug!(unit = %entity.id(), kind = %entity.kind(), "Enemy kill recorded");
            }
        }
        let had_entities = !self.current.is_empty();
        let dropped = self.current.retain_living();
        self.evaluate_outcome(time, had_entities);
        if let Some(outcome) = self.poll_outcome(time) {
            return Some(outcome);
        }

        // AURAS
        sync_auras(&mut self.current, &self.data);

        // BEHAVIOR: working copies against the frozen current arena
        let mut out = OutputBuffer::new(time);
        self.next.clone_from(&self.current);
        {
            let view = WorldView::new(&self.current, &self.data, clock);
            for entity in self.current.entities_sorted() {
                let mut unit = entity.clone();
                self.behaviors.run(&view, &mut unit, &mut out, &mut self.rng);
                self.next.commit(unit);
            }
        }

        // RESOLUTION
        for resolver in &self.resolvers {
            let routed = out.of_kind(resolver.handles());
            resolver.resolve(&routed, &self.current, &mut self.next);
        }
        clamp_to_max_hp(&mut self.next, &self.data);

        // APPLY
        std::mem::swap(&mut self.current, &mut self.next);
        self.current.advance_tick();

        // PROJECTILES / EFFECTS
        let tuning = &self.data.tuning;
        self.current
            .advance_projectiles(time, tuning.frames(delta), tuning);
        self.current.prune_effects(time);
        self.journal.append(&mut self.current.drain_journal());

        tracing::trace!(
            tick = self.current.current_tick(),
            time,
            delta,
            dropped,
            outputs = out.len(),
            entities = self.current.entity_count(),
            projectiles = self.current.projectile_count(),
            "Tick complete"
        );
        None
    }

    /// Delivers the latched outcome if it is due at `time`.
    ///
    /// Delivery enters [`Phase::Finished`] and runs the listener.
    pub fn poll_outcome(&mut self, time: f64) -> Option<BattleOutcome> {
        let outcome = self.latch.poll(time)?;
        self.phase = Phase::Finished;
        if let Some(listener) = self.listener.take() {
            listener(&outcome);
        }
        Some(outcome)
    }

    fn evaluate_outcome(&mut self, time: f64, had_entities: bool) {
        if self.latch.is_latched() {
            return;
        }
        let players = self.current.living(Team::Player).count();
        let enemies = self.current.living(Team::Enemy).count();

        let (outcome, deliver_at) = match judge(players, enemies, had_entities) {
            None => return,
            Some(Verdict::Defeat) => (BattleOutcome::defeat(self.kills.counts().clone()), time),
            Some(Verdict::Victory) => {
                let survivors = self
                    .current
                    .living(Team::Player)
                    .map(|unit| unit.kind())
                    .filter(|kind| !kind.is_commander())
                    .collect();
                (
                    BattleOutcome::victory(survivors, self.kills.counts().clone()),
                    time + self.data.tuning.victory_delay_ms,
                )
            }
        };
        self.latch.latch(outcome, deliver_at);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Read-only view for rendering.
    #[must_use]
    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot::capture(
            &self.current,
            &self.data,
            SnapshotContext {
                time: self.time,
                phase: self.phase,
                paused: self.paused,
                speed: self.speed,
            },
        )
    }

    /// Stat breakdown of one unit.
    #[must_use]
    pub fn inspect(&self, id: EntityId) -> Option<UnitInspection> {
        self.current
            .get(id)
            .map(|entity| UnitInspection::capture(entity, &self.data))
    }

    /// Takes every strike recorded since the last drain.
    pub fn drain_journal(&mut self) -> Vec<StrikeRecord> {
        std::mem::take(&mut self.journal)
    }

    /// The delivered outcome.
    #[must_use]
    pub fn outcome(&self) -> Option<&BattleOutcome> {
        self.latch.delivered()
    }

    /// The latched outcome still awaiting delivery.
    #[must_use]
    pub fn pending_outcome(&self) -> Option<&BattleOutcome> {
        self.latch.pending()
    }

    /// Enemy kills so far.
    #[must_use]
    pub fn kills(&self) -> &KillTally {
        &self.kills
    }

    /// Living units of `team`.
    #[must_use]
    pub fn living_count(&self, team: Team) -> usize {
        self.current.living(team).count()
    }

    /// The current arena.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.current
    }

    /// Mutable access to the current arena, for test setup.
    ///
    /// Avoid mutating the arena during a tick; use behaviors and resolvers.
    #[must_use]
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.current
    }

    /// Game data in use.
    #[must_use]
    pub fn data(&self) -> &GameData {
        &self.data
    }

    /// Battle phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Level number this battle was created for.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Seed of the battle's RNG.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Ticks run so far.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.current.current_tick()
    }

    /// Time of the most recent tick or frame.
    #[must_use]
    pub const fn time(&self) -> f64 {
        self.time
    }
}

/// Lowers hp to effective max hp. Removing a max-hp buff can leave hp above it.
fn clamp_to_max_hp(arena: &mut Arena, data: &GameData) {
    for entity in arena.entities_sorted_mut() {
        let max_hp = effective_stats(&entity.combat, entity.buffs, data).max_hp;
        if entity.combat.hp > max_hp {
            entity.combat.hp = max_hp;
        }
    }
}
