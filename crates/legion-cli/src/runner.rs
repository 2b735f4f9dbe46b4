//! Single battle runner.
//!
//! Drives a [`Simulation`] with fixed 16 ms frames from deployment to
//! outcome, surrendering if the battle outlasts its time limit, and
//! aggregates the combat journal into per-team damage totals.

use std::collections::{BTreeMap, BTreeSet};

use legion_core::output::StrikeRecord;
use legion_core::{
    BattleOutcome, EntityId, GameData, Simulation, SpeedMultiplier, Team, UnitKind, Verdict,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Frame length of the headless driver.
pub const FRAME_MS: f64 = 16.0;

/// Everything needed to reproduce one battle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleConfig {
    /// 1-based level number.
    pub level: u32,
    /// Summon queue, commander first.
    pub roster: Vec<UnitKind>,
    /// Kinds with the upgrade unlocked.
    pub upgrades: BTreeSet<UnitKind>,
    /// RNG seed.
    pub seed: u64,
    /// Speed multiplier.
    pub speed: SpeedMultiplier,
    /// Simulated time after which the battle is surrendered.
    pub max_ms: f64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            level: 1,
            roster: vec![UnitKind::CommanderCenturion, UnitKind::Infantry, UnitKind::Archer],
            upgrades: BTreeSet::new(),
            seed: 0,
            speed: SpeedMultiplier::default(),
            max_ms: 300_000.0,
        }
    }
}

impl BattleConfig {
    /// Same battle with another seed.
    pub fn with_seed(&self, seed: u64) -> Self {
        Self { seed, ..self.clone() }
    }

    /// Builds the simulation, deploys the roster and begins the battle.
    pub fn start(&self, data: &GameData) -> Simulation {
        let mut sim = Simulation::new(data.clone(), self.level, self.seed);
        sim.set_upgrades(self.upgrades.clone());
        sim.set_speed(self.speed);
        sim.sync_roster(&self.roster);
        sim.begin_battle();
        sim
    }
}

/// Damage dealt by one team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamDamage {
    /// Melee damage.
    pub melee: f32,
    /// Projectile damage.
    pub ranged: f32,
    /// Number of strikes.
    pub strikes: u32,
}

impl TeamDamage {
    /// Melee plus ranged.
    pub fn total(&self) -> f32 {
        self.melee + self.ranged
    }
}

/// Aggregates journal records by the striker's team.
#[derive(Debug, Clone, Default)]
pub struct DamageLedger {
    teams: BTreeMap<EntityId, Team>,
    totals: BTreeMap<Team, TeamDamage>,
}

impl DamageLedger {
    /// Learns the team of every entity currently in the arena.
    pub fn observe(&mut self, sim: &Simulation) {
        for entity in sim.arena().entities_sorted() {
            self.teams.entry(entity.id()).or_insert(entity.team());
        }
    }

    /// Adds strikes to the totals. Strikes from unknown sources are skipped.
    pub fn absorb(&mut self, strikes: impl IntoIterator<Item = StrikeRecord>) {
        for strike in strikes {
            let Some(team) = self.teams.get(&strike.source) else {
                debug!(source = %strike.source, "Strike from unknown source");
                continue;
            };
            let totals = self.totals.entry(*team).or_default();
            if strike.ranged {
                totals.ranged += strike.amount;
            } else {
                totals.melee += strike.amount;
            }
            totals.strikes += 1;
        }
    }

    /// Totals by team.
    pub fn totals(&self) -> &BTreeMap<Team, TeamDamage> {
        &self.totals
    }
}

/// Result of one headless battle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleReport {
    /// RNG seed.
    pub seed: u64,
    /// Level number.
    pub level: u32,
    /// Outcome as delivered.
    pub outcome: BattleOutcome,
    /// The battle hit its time limit and was surrendered.
    pub timed_out: bool,
    /// Ticks run.
    pub ticks: u64,
    /// Simulated time at delivery.
    pub duration_ms: f64,
    /// Damage dealt per team.
    pub damage: BTreeMap<Team, TeamDamage>,
}

impl BattleReport {
    /// Returns `true` for a victory.
    pub fn is_victory(&self) -> bool {
        self.outcome.verdict == Verdict::Victory
    }
}

/// Runs one battle to its outcome.
pub fn run_battle(data: &GameData, config: &BattleConfig) -> BattleReport {
    let mut sim = config.start(data);
    let mut ledger = DamageLedger::default();
    ledger.observe(&sim);

    let mut time = 0.0;
    let (outcome, timed_out) = loop {
        if let Some(outcome) = sim.frame(time) {
            break (outcome, false);
        }
        ledger.absorb(sim.drain_journal());
        // A latched outcome is left to deliver on schedule
        if time >= config.max_ms && sim.pending_outcome().is_none() {
            info!(seed = config.seed, time, "Time limit reached; surrendering");
            sim.surrender();
            let outcome = sim
                .outcome()
                .cloned()
                .unwrap_or_else(|| BattleOutcome::defeat(sim.kills().counts().clone()));
            break (outcome, true);
        }
        time += FRAME_MS;
    };
    ledger.absorb(sim.drain_journal());

    debug!(
        seed = config.seed,
        verdict = %outcome.verdict,
        ticks = sim.tick_count(),
        time,
        "Battle finished"
    );

    BattleReport {
        seed: config.seed,
        level: config.level,
        outcome,
        timed_out,
        ticks: sim.tick_count(),
        duration_ms: time,
        damage: ledger.totals().clone(),
    }
}

/// Runs a battle until `at_ms` or its outcome, whichever comes first.
pub fn run_until(data: &GameData, config: &BattleConfig, at_ms: f64) -> Simulation {
    let mut sim = config.start(data);
    let mut time = 0.0;
    while time <= at_ms && sim.outcome().is_none() {
        sim.frame(time);
        time += FRAME_MS;
    }
    sim
}
