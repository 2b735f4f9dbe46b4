//! Per-kind base stats and upgrade bonuses.

use serde::{Deserialize, Serialize};

use crate::entity::CommanderClass;

/// Base statistics for one unit kind.
///
/// Source of truth for spawning; never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    /// Maximum hit points.
    pub hp: f32,
    /// Attack.
    pub attack: f32,
    /// Defense.
    pub defense: f32,
    /// Range in stat units. Above 1.5 it scales the engagement radius, above 3 the unit fires projectiles.
    pub range: f32,
    /// Milliseconds between attacks.
    pub attack_interval: f32,
    /// Lane units per 16 ms reference frame.
    pub move_speed: f32,
    /// Visual scale.
    pub scale: f32,
    /// Commander class tag, present only for commander kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commander: Option<CommanderClass>,
}

impl BaseStats {
    /// Builds a soldier (non-commander) stat line.
    #[must_use]
    pub const fn soldier(
        hp: f32,
        attack: f32,
        range: f32,
        defense: f32,
        attack_interval: f32,
        move_speed: f32,
        scale: f32,
    ) -> Self {
        Self {
            hp,
            attack,
            defense,
            range,
            attack_interval,
            move_speed,
            scale,
            commander: None,
        }
    }

    /// Tags this stat line with a commander class.
    #[must_use]
    pub const fn commanded_by(mut self, class: CommanderClass) -> Self {
        self.commander = Some(class);
        self
    }
}

/// Additive deltas unlocked by a per-kind upgrade.
///
/// Applied once at spawn to both current and max hit points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeBonus {
    /// Added to hp and max hp.
    pub hp: f32,
    /// Added to attack.
    pub attack: f32,
    /// Added to defense.
    pub defense: f32,
    /// Added to move speed.
    pub move_speed: f32,
    /// Added to visual scale.
    pub scale: f32,
}
