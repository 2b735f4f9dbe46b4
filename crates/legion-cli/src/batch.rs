//! Batch runner for balance testing.
//!
//! Runs one battle per seed across the rayon pool and summarises how the
//! roster fared.

use std::collections::BTreeMap;

use legion_core::{GameData, Team, UnitKind};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::runner::{run_battle, BattleConfig, BattleReport};

/// Batch settings.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Battle template; its seed is the first seed of the batch.
    pub battle: BattleConfig,
    /// Number of battles.
    pub count: u32,
    /// Worker threads (0 = rayon default).
    pub parallel: usize,
}

/// Aggregate over a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Battles run.
    pub games: u32,
    /// Victories.
    pub wins: u32,
    /// `wins / games`, 0 for an empty batch.
    pub win_rate: f64,
    /// Mean simulated duration.
    pub mean_duration_ms: f64,
    /// Mean ticks per battle.
    pub mean_ticks: f64,
    /// Battles surrendered at the time limit.
    pub timeouts: u32,
    /// Enemy kills summed over the batch.
    pub kills: BTreeMap<UnitKind, u32>,
    /// Mean damage dealt per battle, by team.
    pub mean_damage: BTreeMap<Team, f64>,
}

impl BatchSummary {
    /// Folds reports into a summary.
    pub fn from_reports(reports: &[BattleReport]) -> Self {
        let mut summary = Self::default();
        if reports.is_empty() {
            return summary;
        }

        let mut duration = 0.0;
        let mut ticks = 0.0;
        let mut damage: BTreeMap<Team, f64> = BTreeMap::new();
        for report in reports {
            summary.games += 1;
            if report.is_victory() {
                summary.wins += 1;
            }
            if report.timed_out {
                summary.timeouts += 1;
            }
            duration += report.duration_ms;
            ticks += report.ticks as f64;
            for (kind, count) in &report.outcome.kills {
                *summary.kills.entry(*kind).or_default() += count;
            }
            for (team, dealt) in &report.damage {
                *damage.entry(*team).or_default() += f64::from(dealt.total());
            }
        }

        let games = f64::from(summary.games);
        summary.win_rate = f64::from(summary.wins) / games;
        summary.mean_duration_ms = duration / games;
        summary.mean_ticks = ticks / games;
        summary.mean_damage = damage.into_iter().map(|(team, total)| (team, total / games)).collect();
        summary
    }
}

/// Runs the batch. Seeds are consecutive from the template seed.
pub fn run_batch(data: &GameData, config: &BatchConfig) -> Vec<BattleReport> {
    if config.parallel > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.parallel)
            .build_global()
            .ok(); // Ignore if already set
    }

    info!(
        count = config.count,
        level = config.battle.level,
        first_seed = config.battle.seed,
        "Starting batch"
    );

    let mut reports: Vec<BattleReport> = (0..config.count)
        .into_par_iter()
        .map(|i| {
            let seed = config.battle.seed.wrapping_add(u64::from(i));
            let report = run_battle(data, &config.battle.with_seed(seed));
            debug!(seed, verdict = %report.outcome.verdict, "Battle complete");
            report
        })
        .collect();

    // collect() keeps index order, but sort anyway so output never depends on it
    reports.sort_by_key(|r| r.seed);
    reports
}

#[cfg(test)]
mod tests {
    use legion_core::{BattleOutcome, Verdict};

    use super::*;
    use crate::runner::TeamDamage;

    fn report(seed: u64, verdict: Verdict, duration_ms: f64, timed_out: bool) -> BattleReport {
        let kills = BTreeMap::from([(UnitKind::Archer, 2)]);
        let outcome = match verdict {
            Verdict::Victory => BattleOutcome::victory(vec![UnitKind::Infantry], kills),
            Verdict::Defeat => BattleOutcome::defeat(kills),
        };
        BattleReport {
            seed,
            level: 1,
            outcome,
            timed_out,
            ticks: 100,
            duration_ms,
            damage: BTreeMap::from([(Team::Player, TeamDamage { melee: 30.0, ranged: 10.0, strikes: 3 })]),
        }
    }

    #[test]
    fn summary_of_nothing_is_empty() {
        assert_eq!(BatchSummary::from_reports(&[]), BatchSummary::default());
    }

    #[test]
    fn summary_averages_reports() {
        let summary = BatchSummary::from_reports(&[
            report(0, Verdict::Victory, 1000.0, false),
            report(1, Verdict::Defeat, 3000.0, true),
        ]);

        assert_eq!(summary.games, 2);
        assert_eq!(summary.wins, 1);
        assert_eq!(summary.timeouts, 1);
        assert!((summary.win_rate - 0.5).abs() < 1e-9);
        assert!((summary.mean_duration_ms - 2000.0).abs() < 1e-9);
        assert!((summary.mean_ticks - 100.0).abs() < 1e-9);
        assert_eq!(summary.kills[&UnitKind::Archer], 4);
        assert!((summary.mean_damage[&Team::Player] - 40.0).abs() < 1e-9);
    }

    #[test]
    fn batch_covers_consecutive_seeds() {
        let mut data = GameData::default();
        data.tuning.victory_delay_ms = 0.0;
        let config = BatchConfig {
            battle: BattleConfig {
                seed: 10,
                max_ms: 2_000.0,
                ..BattleConfig::default()
            },
            count: 3,
            parallel: 0,
        };

        let reports = run_batch(&data, &config);
        let seeds: Vec<u64> = reports.iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![10, 11, 12]);
    }
}
