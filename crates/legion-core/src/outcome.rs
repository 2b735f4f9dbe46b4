//! Battle outcome: kill tally, terminal judgement and the delivery latch.
//!
//! The latch moves through three states. It starts `Idle`, becomes `Pending`
//! when a terminal condition is first seen, and becomes `Delivered` once the
//! delivery time is reached. Only the first latch call has any effect, so an
//! outcome is delivered at most once per battle.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId, Team, UnitKind};

/// Which side won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Every enemy died while at least one player unit lived.
    Victory,
    /// The player side was wiped out, or surrendered.
    Defeat,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Victory => write!(f, "VICTORY"),
            Self::Defeat => write!(f, "DEFEAT"),
        }
    }
}

/// Terminal result of one battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleOutcome {
    /// Which side won.
    pub verdict: Verdict,
    /// Kinds of living non-commander player units, duplicates preserved.
    /// Empty on defeat.
    pub survivors: Vec<UnitKind>,
    /// Enemy deaths by kind.
    pub kills: BTreeMap<UnitKind, u32>,
}

impl BattleOutcome {
    /// A victory with the given survivors.
    #[must_use]
    pub fn victory(survivors: Vec<UnitKind>, kills: BTreeMap<UnitKind, u32>) -> Self {
        Self { verdict: Verdict::Victory, survivors, kills }
    }

    /// A defeat. Survivors are always empty.
    #[must_use]
    pub fn defeat(kills: BTreeMap<UnitKind, u32>) -> Self {
        Self { verdict: Verdict::Defeat, survivors: Vec::new(), kills }
    }

    /// Returns `true` for a victory.
    #[must_use]
    pub fn is_victory(&self) -> bool {
        self.verdict == Verdict::Victory
    }
}

/// Enemy deaths, each counted once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillTally {
    recorded: BTreeSet<EntityId>,
    counts: BTreeMap<UnitKind, u32>,
}

impl KillTally {
    /// Creates an empty tally.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts `entity` if it is a dead enemy not counted before.
    ///
    /// Returns `true` if the tally changed.
    pub fn record(&mut self, entity: &Entity) -> bool {
        if entity.team() != Team::Enemy || entity.is_alive() {
            return false;
        }
        if !self.recorded.insert(entity.id()) {
            return false;
        }
        *self.counts.entry(entity.kind()).or_insert(0) += 1;
        true
    }

    /// Kills by kind.
    #[must_use]
    pub fn counts(&self) -> &BTreeMap<UnitKind, u32> {
        &self.counts
    }

    /// Total kills.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }
}

/// Evaluates the terminal condition from living counts.
///
/// `had_entities` is whether the arena held anyone before dead units were
/// dropped this tick; an empty arena that was always empty is not a result.
#[must_use]
pub fn judge(players: usize, enemies: usize, had_entities: bool) -> Option<Verdict> {
    match (players, enemies) {
        (0, e) if e > 0 => Some(Verdict::Defeat),
        (p, 0) if p > 0 => Some(Verdict::Victory),
        (0, 0) if had_entities => Some(Verdict::Defeat),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
enum LatchState {
    #[default]
    Idle,
    Pending {
        outcome: BattleOutcome,
        deliver_at: f64,
    },
    Delivered(BattleOutcome),
}

/// Holds a battle's outcome from the moment it is decided until delivery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomeLatch {
    state: LatchState,
}

impl OutcomeLatch {
    /// Creates an idle latch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latches `outcome` for delivery at `deliver_at`.
    ///
    /// Returns `false` and changes nothing if an outcome was already latched.
    pub fn latch(&mut self, outcome: BattleOutcome, deliver_at: f64) -> bool {
        if self.is_latched() {
            return false;
        }
        tracing::info!(
            verdict = %outcome.verdict,
            survivors = outcome.survivors.len(),
            deliver_at,
            "Battle outcome latched"
        );
        self.state = LatchState::Pending { outcome, deliver_at };
        true
    }

    /// Delivers the pending outcome once `time` reaches its delivery time.
    ///
    /// Returns the outcome exactly once; later polls return `None`.
    pub fn poll(&mut self, time: f64) -> Option<BattleOutcome> {
        let LatchState::Pending { outcome, deliver_at } = &self.state else {
            return None;
        };
        if time < *deliver_at {
            return None;
        }
        let outcome = outcome.clone();
        tracing::info!(verdict = %outcome.verdict, time, "Battle outcome delivered");
        self.state = LatchState::Delivered(outcome.clone());
        Some(outcome)
    }

    /// Returns `true` once an outcome has been latched, delivered or not.
    #[must_use]
    pub fn is_latched(&self) -> bool {
        !matches!(self.state, LatchState::Idle)
    }

    /// The latched outcome awaiting delivery.
    #[must_use]
    pub fn pending(&self) -> Option<&BattleOutcome> {
        match &self.state {
            LatchState::Pending { outcome, .. } => Some(outcome),
            _ => None,
        }
    }

    /// The delivered outcome.
    #[must_use]
    pub fn delivered(&self) -> Option<&BattleOutcome> {
        match &self.state {
            LatchState::Delivered(outcome) => Some(outcome),
            _ => None,
        }
    }
}
