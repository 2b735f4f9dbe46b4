//! Level configuration and spawn bands.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entity::{Team, UnitKind};

/// Enemy roster for one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// How many of each kind to spawn.
    #[serde(default)]
    pub unit_counts: BTreeMap<UnitKind, u32>,
    /// Commander kinds spawned after the regular units.
    #[serde(default)]
    pub enemy_commanders: Vec<UnitKind>,
    /// Scales hp, attack and scale of every enemy.
    #[serde(default = "default_difficulty")]
    pub difficulty_mult: f32,
}

const fn default_difficulty() -> f32 {
    1.0
}

impl LevelConfig {
    /// Total number of enemies this level spawns.
    #[must_use]
    pub fn enemy_total(&self) -> u32 {
        self.unit_counts.values().sum::<u32>() + self.enemy_commanders.len() as u32
    }
}

/// A uniform interval `[base, base + variance)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnBand {
    /// Lower bound.
    pub base: f32,
    /// Width of the interval.
    pub variance: f32,
}

impl SpawnBand {
    /// Creates a band.
    #[must_use]
    pub const fn new(base: f32, variance: f32) -> Self {
        Self { base, variance }
    }

    /// Draws a value from the band.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        self.base + self.variance * rng.gen::<f32>()
    }

    /// Returns `true` if `value` lies within the band.
    #[must_use]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.base && value <= self.base + self.variance
    }
}

/// Spawn x bands for one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnTable {
    /// Band for kinds without an entry.
    pub default: SpawnBand,
    /// Band for commander kinds.
    pub commanders: SpawnBand,
    /// Per-kind overrides.
    #[serde(default)]
    pub by_kind: BTreeMap<UnitKind, SpawnBand>,
}

impl SpawnTable {
    /// Returns the x band for `kind`.
    #[must_use]
    pub fn band_for(&self, kind: UnitKind) -> SpawnBand {
        if let Some(band) = self.by_kind.get(&kind) {
            return *band;
        }
        if kind.is_commander() {
            self.commanders
        } else {
            self.default
        }
    }
}

/// Spawn x bands for both teams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnLayout {
    /// Left edge of the lane.
    pub player: SpawnTable,
    /// Right edge of the lane.
    pub enemy: SpawnTable,
}

impl SpawnLayout {
    /// Returns the table for `team`.
    #[must_use]
    pub const fn table(&self, team: Team) -> &SpawnTable {
        match team {
            Team::Player => &self.player,
            Team::Enemy => &self.enemy,
        }
    }
}

impl Default for SpawnLayout {
    fn default() -> Self {
        Self {
            player: SpawnTable {
                default: SpawnBand::new(8.0, 10.0),
                commanders: SpawnBand::new(2.0, 4.0),
                by_kind: BTreeMap::from([
                    (UnitKind::Archer, SpawnBand::new(2.0, 6.0)),
                    (UnitKind::Shield, SpawnBand::new(16.0, 6.0)),
                    (UnitKind::Spear, SpawnBand::new(12.0, 6.0)),
                ]),
            },
            enemy: SpawnTable {
                default: SpawnBand::new(82.0, 10.0),
                commanders: SpawnBand::new(94.0, 4.0),
                by_kind: BTreeMap::from([
                    (UnitKind::Archer, SpawnBand::new(92.0, 6.0)),
                    (UnitKind::Shield, SpawnBand::new(78.0, 6.0)),
                    (UnitKind::Spear, SpawnBand::new(82.0, 6.0)),
                ]),
            },
        }
    }
}

/// The built-in campaign: eight levels of escalating size and difficulty.
#[must_use]
pub fn default_levels() -> Vec<LevelConfig> {
    use UnitKind::{Archer, CommanderElf, CommanderGuardian, CommanderVanguard, CommanderWarlord, Infantry, Obstacle, Shield, Spear};

    let level = |counts: &[(UnitKind, u32)], commanders: &[UnitKind], difficulty_mult: f32| LevelConfig {
        unit_counts: counts.iter().copied().collect(),
        enemy_commanders: commanders.to_vec(),
        difficulty_mult,
    };

    vec![
        level(&[(Infantry, 3)], &[], 1.0),
        level(&[(Infantry, 4), (Archer, 2)], &[], 1.05),
        level(&[(Infantry, 4), (Archer, 2), (Shield, 2)], &[], 1.1),
        level(&[(Infantry, 5), (Archer, 3), (Shield, 2)], &[CommanderWarlord], 1.15),
        level(&[(Infantry, 5), (Archer, 3), (Shield, 2), (Spear, 2), (Obstacle, 1)], &[CommanderGuardian], 1.25),
        level(&[(Infantry, 6), (Archer, 4), (Shield, 3), (Spear, 3)], &[CommanderElf], 1.35),
        level(&[(Infantry, 6), (Archer, 4), (Shield, 4), (Spear, 4), (Obstacle, 2)], &[CommanderVanguard, CommanderWarlord], 1.45),
        level(&[(Infantry, 8), (Archer, 5), (Shield, 4), (Spear, 5), (Obstacle, 2)], &[CommanderWarlord, CommanderGuardian, CommanderElf], 1.6),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn samples_stay_inside_band() {
        let band = SpawnBand::new(82.0, 10.0);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..200 {
            assert!(band.contains(band.sample(&mut rng)));
        }
    }

    #[test]
    fn commanders_use_commander_band() {
        let layout = SpawnLayout::default();
        assert_eq!(layout.player.band_for(UnitKind::CommanderElf), SpawnBand::new(2.0, 4.0));
        assert_eq!(layout.enemy.band_for(UnitKind::Infantry), SpawnBand::new(82.0, 10.0));
        assert_eq!(layout.enemy.band_for(UnitKind::Shield), SpawnBand::new(78.0, 6.0));
    }

    #[test]
    fn campaign_difficulty_escalates() {
        let levels = default_levels();
        assert_eq!(levels.len(), 8);
        assert!((levels[0].difficulty_mult - 1.0).abs() < f32::EPSILON);
        assert!((levels[7].difficulty_mult - 1.6).abs() < f32::EPSILON);
        assert!(levels.windows(2).all(|w| w[0].difficulty_mult < w[1].difficulty_mult));
        assert!(levels[..3].iter().all(|l| l.enemy_commanders.is_empty()));
        assert!(levels[3..].iter().all(|l| !l.enemy_commanders.is_empty()));
    }

    #[test]
    fn enemy_total_counts_commanders() {
        assert_eq!(default_levels()[3].enemy_total(), 11);
    }
}
