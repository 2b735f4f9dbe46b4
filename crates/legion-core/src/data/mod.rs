//! Static game data: unit stats, upgrades, buffs, aura rules, levels,
//! spawn bands and tuning.
//!
//! Everything in this module is plain data. [`GameData::default`] carries the
//! built-in tables; a JSON document can override any subset of sections,
//! since every section falls back to its default when absent.
//!
//! # Example
//!
//! ```
//! use legion_core::data::GameData;
//!
//! let data = GameData::from_json_str(r#"{ "tuning": { "victory_delay_ms": 0.0 } }"#).unwrap();
//! assert_eq!(data.tuning.victory_delay_ms, 0.0);
//! assert_eq!(data.levels.len(), 8);
//! ```

mod buffs;
mod levels;
mod tuning;
mod units;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::entity::{BuffId, CommanderClass, UnitKind};
use crate::error::{ConfigError, Result};

pub use buffs::{AuraRule, BuffDefinition};
pub use levels::{default_levels, LevelConfig, SpawnBand, SpawnLayout, SpawnTable};
pub use tuning::Tuning;
pub use units::{BaseStats, UpgradeBonus};

/// The complete configuration consumed by the battle core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameData {
    /// Base stats per kind.
    pub units: BTreeMap<UnitKind, BaseStats>,
    /// Upgrade bonus per kind.
    pub upgrades: BTreeMap<UnitKind, UpgradeBonus>,
    /// Buff definitions.
    pub buffs: BTreeMap<BuffId, BuffDefinition>,
    /// Commander aura policy.
    pub auras: Vec<AuraRule>,
    /// Campaign levels, first level at index 0.
    pub levels: Vec<LevelConfig>,
    /// Spawn x bands.
    pub spawn: SpawnLayout,
    /// Feel constants.
    pub tuning: Tuning,
}

impl Default for GameData {
    fn default() -> Self {
        Self {
            units: default_units(),
            upgrades: default_upgrades(),
            buffs: default_buffs(),
            auras: default_auras(),
            levels: default_levels(),
            spawn: SpawnLayout::default(),
            tuning: Tuning::default(),
        }
    }
}

impl GameData {
    /// Parses a JSON document. Missing sections keep their built-in values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::InvalidValue`] if validation fails.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let data: Self = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }

    /// Reads and parses a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`GameData::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let data = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), levels = data.levels.len(), "Loaded game data");
        Ok(data)
    }

    /// Checks every numeric value for finiteness and range.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::InvalidValue`] found.
    pub fn validate(&self) -> Result<()> {
        for (kind, stats) in &self.units {
            let fields = [
                ("hp", stats.hp),
                ("attack", stats.attack),
                ("defense", stats.defense),
                ("range", stats.range),
                ("attack_interval", stats.attack_interval),
                ("move_speed", stats.move_speed),
                ("scale", stats.scale),
            ];
            for (name, value) in fields {
                non_negative(&format!("units.{kind}.{name}"), f64::from(value))?;
            }
        }

        for (kind, bonus) in &self.upgrades {
            let fields = [
                ("hp", bonus.hp),
                ("attack", bonus.attack),
                ("defense", bonus.defense),
                ("move_speed", bonus.move_speed),
                ("scale", bonus.scale),
            ];
            for (name, value) in fields {
                finite(&format!("upgrades.{kind}.{name}"), f64::from(value))?;
            }
        }

        for (id, buff) in &self.buffs {
            let fields = [
                ("max_hp", buff.max_hp),
                ("attack", buff.attack),
                ("defense", buff.defense),
                ("range", buff.range),
                ("move_speed", buff.move_speed),
                ("attack_interval", buff.attack_interval),
            ];
            for (name, value) in fields {
                finite(&format!("buffs.{id}.{name}"), f64::from(value))?;
            }
            if let Some(regen) = buff.regen_per_sec {
                non_negative(&format!("buffs.{id}.regen_per_sec"), f64::from(regen))?;
            }
        }

        for (index, level) in self.levels.iter().enumerate() {
            let field = format!("levels[{index}].difficulty_mult");
            non_negative(&field, f64::from(level.difficulty_mult))?;
            if level.difficulty_mult == 0.0 {
                return Err(ConfigError::invalid(field, "must be greater than zero"));
            }
        }

        for (team, table) in [("player", &self.spawn.player), ("enemy", &self.spawn.enemy)] {
            let bands = [("default", table.default), ("commanders", table.commanders)]
                .into_iter()
                .map(|(name, band)| (name.to_string(), band))
                .chain(table.by_kind.iter().map(|(kind, band)| (kind.to_string(), *band)));
            for (name, band) in bands {
                finite(&format!("spawn.{team}.{name}.base"), f64::from(band.base))?;
                non_negative(&format!("spawn.{team}.{name}.variance"), f64::from(band.variance))?;
            }
        }

        for (name, value) in self.tuning.fields() {
            non_negative(&format!("tuning.{name}"), value)?;
        }
        finite("tuning.spawn_y.base", f64::from(self.tuning.spawn_y.base))?;
        if self.tuning.reference_frame_ms == 0.0 {
            return Err(ConfigError::invalid("tuning.reference_frame_ms", "must be greater than zero"));
        }
        if self.tuning.heal_effect_chance > 1.0 {
            return Err(ConfigError::invalid("tuning.heal_effect_chance", "must be at most 1"));
        }

        Ok(())
    }

    /// Level config for a 1-based level number.
    ///
    /// Levels past the end of the table clamp to the last level; level 0 is
    /// treated as level 1. Returns `None` only if the table is empty.
    #[must_use]
    pub fn level(&self, level: u32) -> Option<&LevelConfig> {
        let last = self.levels.len().checked_sub(1)?;
        let index = usize::try_from(level.saturating_sub(1)).unwrap_or(usize::MAX).min(last);
        self.levels.get(index)
    }

    /// Base stats for `kind`, if configured.
    #[must_use]
    pub fn base_stats(&self, kind: UnitKind) -> Option<&BaseStats> {
        self.units.get(&kind)
    }

    /// Buff definition for `id`, if configured.
    #[must_use]
    pub fn buff(&self, id: BuffId) -> Option<&BuffDefinition> {
        self.buffs.get(&id)
    }
}

fn finite(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} is not finite")))
    }
}

fn non_negative(field: &str, value: f64) -> Result<()> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::invalid(field, format!("{value} is negative")));
    }
    Ok(())
}

// ============================================================================
// Built-in tables
// ============================================================================

fn default_units() -> BTreeMap<UnitKind, BaseStats> {
    use CommanderClass as C;
    BTreeMap::from([
        (UnitKind::Infantry, BaseStats::soldier(100.0, 15.0, 1.0, 5.0, 800.0, 0.05, 1.0)),
        (UnitKind::Archer, BaseStats::soldier(60.0, 20.0, 6.0, 1.0, 2000.0, 0.025, 0.8)),
        (UnitKind::Shield, BaseStats::soldier(200.0, 8.0, 1.0, 10.0, 1500.0, 0.02, 1.1)),
        (UnitKind::Spear, BaseStats::soldier(120.0, 25.0, 2.0, 8.0, 900.0, 0.04, 1.0)),
        (UnitKind::Obstacle, BaseStats::soldier(500.0, 0.0, 0.0, 0.0, 99_999.0, 0.0, 1.0)),
        (
            UnitKind::CommanderCenturion,
            BaseStats::soldier(500.0, 22.0, 1.0, 7.0, 1000.0, 0.025, 1.2).commanded_by(C::Centurion),
        ),
        (
            UnitKind::CommanderElf,
            BaseStats::soldier(400.0, 30.0, 5.0, 3.0, 1500.0, 0.03, 1.1).commanded_by(C::Elf),
        ),
        (
            UnitKind::CommanderWarlord,
            BaseStats::soldier(600.0, 28.0, 1.0, 5.0, 800.0, 0.04, 1.3).commanded_by(C::Warlord),
        ),
        (
            UnitKind::CommanderGuardian,
            BaseStats::soldier(800.0, 15.0, 1.0, 15.0, 1800.0, 0.015, 1.25).commanded_by(C::Guardian),
        ),
        (
            UnitKind::CommanderVanguard,
            BaseStats::soldier(450.0, 35.0, 2.0, 6.0, 900.0, 0.06, 1.2).commanded_by(C::Vanguard),
        ),
    ])
}

fn default_upgrades() -> BTreeMap<UnitKind, UpgradeBonus> {
    BTreeMap::from([
        (
            UnitKind::Infantry,
            UpgradeBonus { hp: 50.0, attack: 10.0, defense: 1.0, move_speed: 0.01, scale: 0.3 },
        ),
        (
            UnitKind::Archer,
            UpgradeBonus { hp: 30.0, attack: 15.0, scale: 0.3, ..UpgradeBonus::default() },
        ),
        (
            UnitKind::Shield,
            UpgradeBonus { hp: 100.0, defense: 4.0, scale: 0.3, ..UpgradeBonus::default() },
        ),
        (
            UnitKind::Spear,
            UpgradeBonus { hp: 90.0, attack: 15.0, scale: 0.3, ..UpgradeBonus::default() },
        ),
    ])
}

fn default_buffs() -> BTreeMap<BuffId, BuffDefinition> {
    let text = |label: &str, description: &str, commander_aura: bool| BuffDefinition {
        label: label.to_string(),
        description: description.to_string(),
        commander_aura,
        ..BuffDefinition::default()
    };

    BTreeMap::from([
        (
            BuffId::Frenzy,
            BuffDefinition {
                max_hp: 50.0,
                range: 1.5,
                ..text("Bloodlust", "Increase MaxHP and Melee range.", true)
            },
        ),
        (
            BuffId::Heal,
            BuffDefinition {
                regen_per_sec: Some(0.02),
                ..text("Regeneration", "Restores 2% HP per second.", true)
            },
        ),
        (
            BuffId::ElfRange,
            BuffDefinition {
                range: 3.0,
                attack_interval: -500.0,
                ..text("Eagle Eye", "Massively increase Attack Range and Attack Speed.", true)
            },
        ),
        (
            BuffId::SpearCharge,
            BuffDefinition {
                defense: 15.0,
                move_speed: 0.25,
                ..text("Phalanx Charge", "Massively increase Defense and MoveSpeed.", false)
            },
        ),
        (
            BuffId::VanguardPassive,
            BuffDefinition {
                max_hp: 120.0,
                move_speed: 0.04,
                ..text("Blitzkrieg", "Massively increase MaxHP and MoveSpeed.", true)
            },
        ),
    ])
}

fn default_auras() -> Vec<AuraRule> {
    vec![
        AuraRule::new(CommanderClass::Warlord, BuffId::Frenzy, UnitKind::Infantry),
        AuraRule::new(CommanderClass::Guardian, BuffId::Heal, UnitKind::Shield),
        AuraRule::new(CommanderClass::Elf, BuffId::ElfRange, UnitKind::Archer),
        AuraRule::new(CommanderClass::Vanguard, BuffId::VanguardPassive, UnitKind::Spear),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    mod defaults_tests {
        use super::*;

        #[test]
        fn every_kind_has_base_stats() {
            let data = GameData::default();
            for kind in UnitKind::ALL {
                assert!(data.base_stats(kind).is_some(), "missing {kind}");
            }
        }

        #[test]
        fn commander_tags_match_kinds() {
            let data = GameData::default();
            for kind in UnitKind::ALL {
                let tagged = data.base_stats(kind).and_then(|s| s.commander).is_some();
                assert_eq!(tagged, kind.is_commander(), "{kind}");
            }
        }

        #[test]
        fn every_buff_is_defined() {
            let data = GameData::default();
            for id in BuffId::ALL {
                assert!(data.buff(id).is_some(), "missing {id}");
            }
            assert!(!data.buff(BuffId::SpearCharge).map_or(true, |b| b.commander_aura));
        }

        #[test]
        fn centurion_grants_no_aura() {
            let data = GameData::default();
            assert!(data.auras.iter().all(|rule| rule.commander != CommanderClass::Centurion));
            assert_eq!(data.auras.len(), 4);
        }

        #[test]
        fn defaults_validate() {
            assert!(GameData::default().validate().is_ok());
        }
    }

    mod level_lookup_tests {
        use super::*;

        #[test]
        fn levels_are_one_based() {
            let data = GameData::default();
            assert_eq!(data.level(1), data.levels.first());
            assert_eq!(data.level(0), data.levels.first());
        }

        #[test]
        fn overflow_clamps_to_last_level() {
            let data = GameData::default();
            assert_eq!(data.level(99), data.levels.last());
        }

        #[test]
        fn empty_table_has_no_level() {
            let data = GameData { levels: Vec::new(), ..GameData::default() };
            assert!(data.level(1).is_none());
        }
    }

    mod loading_tests {
        use super::*;

        #[test]
        fn json_round_trip_preserves_tables() {
            let data = GameData::default();
            let json = serde_json::to_string(&data).unwrap();
            let parsed = GameData::from_json_str(&json).unwrap();
            assert_eq!(parsed, data);
        }

        #[test]
        fn partial_document_overrides_one_section() {
            let json = r#"{ "levels": [ { "unit_counts": { "ARCHER": 2 }, "difficulty_mult": 2.0 } ] }"#;
            let data = GameData::from_json_str(json).unwrap();
            assert_eq!(data.levels.len(), 1);
            assert_eq!(data.levels[0].unit_counts.get(&UnitKind::Archer), Some(&2));
            assert_eq!(data.units.len(), 10);
        }

        #[test]
        fn negative_stat_is_rejected() {
            let json = r#"{ "units": { "INFANTRY": { "hp": -1, "attack": 1, "defense": 1, "range": 1,
                "attack_interval": 100, "move_speed": 0.1, "scale": 1 } } }"#;
            let err = GameData::from_json_str(json).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "units.INFANTRY.hp"));
        }

        #[test]
        fn zero_difficulty_is_rejected() {
            let json = r#"{ "levels": [ { "difficulty_mult": 0.0 } ] }"#;
            assert!(matches!(
                GameData::from_json_str(json),
                Err(ConfigError::InvalidValue { .. })
            ));
        }

        #[test]
        fn malformed_json_is_a_parse_error() {
            assert!(matches!(GameData::from_json_str("{ nope"), Err(ConfigError::Parse(_))));
        }

        #[test]
        fn missing_file_is_an_io_error() {
            let err = GameData::load("/definitely/not/here.json").unwrap_err();
            assert!(matches!(err, ConfigError::Io { .. }));
        }
    }
}
