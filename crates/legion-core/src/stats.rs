//! Effective stats: spawn stats plus the sum of active buff deltas.
//!
//! Effective stats are never cached on the entity. They are recomputed on
//! demand, so a buff's deltas disappear the moment the buff leaves the set.

use serde::{Deserialize, Serialize};

use crate::data::GameData;
use crate::entity::{BuffSet, CombatState};

/// Stats read during a tick after applying buffs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveStats {
    /// Max hit points.
    pub max_hp: f32,
    /// Attack.
    pub attack: f32,
    /// Defense.
    pub defense: f32,
    /// Range in stat units.
    pub range: f32,
    /// Lane units per reference frame.
    pub move_speed: f32,
    /// Milliseconds between attacks, never below zero.
    pub attack_interval: f32,
    /// Summed regen fraction per second, if any active buff regenerates.
    pub regen_per_sec: Option<f32>,
}

impl EffectiveStats {
    /// Attacks per second at 1x, or `None` for a zero interval.
    #[must_use]
    pub fn attacks_per_second(&self) -> Option<f32> {
        (self.attack_interval > 0.0).then(|| 1000.0 / self.attack_interval)
    }

    /// Per-stat difference from `base`.
    #[must_use]
    pub fn deltas_from(&self, base: &Self) -> StatDeltas {
        StatDeltas {
            max_hp: self.max_hp - base.max_hp,
            attack: self.attack - base.attack,
            defense: self.defense - base.defense,
            range: self.range - base.range,
            move_speed: self.move_speed - base.move_speed,
            attack_interval: self.attack_interval - base.attack_interval,
        }
    }
}

/// Buff contribution per stat, as shown by unit inspection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatDeltas {
    /// Max hit points.
    pub max_hp: f32,
    /// Attack.
    pub attack: f32,
    /// Defense.
    pub defense: f32,
    /// Range.
    pub range: f32,
    /// Move speed.
    pub move_speed: f32,
    /// Attack interval in ms.
    pub attack_interval: f32,
}

/// Spawn stats with no buffs applied.
#[must_use]
pub fn base_stats(combat: &CombatState) -> EffectiveStats {
    EffectiveStats {
        max_hp: combat.max_hp,
        attack: combat.attack,
        defense: combat.defense,
        range: combat.range,
        move_speed: combat.move_speed,
        attack_interval: combat.attack_interval.max(0.0),
        regen_per_sec: None,
    }
}

/// Spawn stats plus the deltas of every buff in `buffs`.
///
/// Buff ids without a definition in `data` contribute nothing.
#[must_use]
pub fn effective_stats(combat: &CombatState, buffs: BuffSet, data: &GameData) -> EffectiveStats {
    let mut stats = base_stats(combat);
    let mut interval = combat.attack_interval;

    for id in buffs.ids() {
        let Some(buff) = data.buff(id) else {
            continue;
        };
        stats.max_hp += buff.max_hp;
        stats.attack += buff.attack;
        stats.defense += buff.defense;
        stats.range += buff.range;
        stats.move_speed += buff.move_speed;
        interval += buff.attack_interval;
        if let Some(regen) = buff.regen_per_sec {
            stats.regen_per_sec = Some(stats.regen_per_sec.unwrap_or(0.0) + regen);
        }
    }

    stats.attack_interval = interval.max(0.0);
    stats
}

/// Damage of one strike: attack minus defense, never below 1.
#[must_use]
pub fn strike_damage(attack: f32, defense: f32) -> f32 {
    (attack - defense).max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::BuffId;

    fn archer() -> CombatState {
        let data = GameData::default();
        let base = data.base_stats(crate::entity::UnitKind::Archer).unwrap();
        CombatState::from_base(base)
    }

    #[test]
    fn no_buffs_means_base() {
        let data = GameData::default();
        let combat = archer();
        assert_eq!(effective_stats(&combat, BuffSet::empty(), &data), base_stats(&combat));
    }

    #[test]
    fn buff_deltas_are_summed() {
        let data = GameData::default();
        let combat = archer();
        let stats = effective_stats(&combat, BuffId::ElfRange.flag() | BuffId::Frenzy.flag(), &data);
        assert!((stats.range - (6.0 + 3.0 + 1.5)).abs() < 1e-6);
        assert!((stats.attack_interval - 1500.0).abs() < 1e-6);
        assert!((stats.max_hp - 110.0).abs() < 1e-6);
    }

    #[test]
    fn attack_interval_is_floored() {
        let data = GameData::default();
        let mut combat = archer();
        combat.attack_interval = 200.0;
        let stats = effective_stats(&combat, BuffId::ElfRange.flag(), &data);
        assert_eq!(stats.attack_interval, 0.0);
        assert_eq!(stats.attacks_per_second(), None);
    }

    #[test]
    fn undefined_buff_is_ignored() {
        let mut data = GameData::default();
        data.buffs.remove(&BuffId::Frenzy);
        let combat = archer();
        assert_eq!(effective_stats(&combat, BuffId::Frenzy.flag(), &data), base_stats(&combat));
    }

    #[test]
    fn regen_only_from_regen_buffs() {
        let data = GameData::default();
        let combat = archer();
        assert_eq!(effective_stats(&combat, BuffId::Frenzy.flag(), &data).regen_per_sec, None);
        let healed = effective_stats(&combat, BuffId::Heal.flag(), &data);
        assert_eq!(healed.regen_per_sec, Some(0.02));
    }

    #[test]
    fn deltas_report_buff_contribution() {
        let data = GameData::default();
        let combat = archer();
        let effective = effective_stats(&combat, BuffId::ElfRange.flag(), &data);
        let deltas = effective.deltas_from(&base_stats(&combat));
        assert!((deltas.range - 3.0).abs() < 1e-6);
        assert!((deltas.attack_interval + 500.0).abs() < 1e-6);
        assert_eq!(deltas.attack, 0.0);
    }

    #[test]
    fn damage_floor_scenarios() {
        assert_eq!(strike_damage(20.0, 4.0), 16.0);
        assert_eq!(strike_damage(15.0, 10.0), 5.0);
        assert_eq!(strike_damage(8.0, 200.0), 1.0);
    }
}
