//! Buff definitions and commander aura rules.

use serde::{Deserialize, Serialize};

use crate::entity::{BuffId, CommanderClass, UnitKind};

/// Additive stat deltas granted by one buff, plus its display text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuffDefinition {
    /// Added to max hit points.
    pub max_hp: f32,
    /// Added to attack.
    pub attack: f32,
    /// Added to defense.
    pub defense: f32,
    /// Added to range.
    pub range: f32,
    /// Added to move speed.
    pub move_speed: f32,
    /// Added to the attack interval in ms; negative means faster.
    pub attack_interval: f32,
    /// Fraction of effective max hp restored per second.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regen_per_sec: Option<f32>,
    /// Display label.
    pub label: String,
    /// Display description.
    pub description: String,
    /// Marks a commander-granted aura. Display grouping only.
    pub commander_aura: bool,
}

/// Grants `buff` to every living `recipient` of a team while a living
/// commander of class `commander` is on that team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuraRule {
    /// Granting commander class.
    pub commander: CommanderClass,
    /// Granted buff.
    pub buff: BuffId,
    /// Unit kind that receives the buff.
    pub recipient: UnitKind,
}

impl AuraRule {
    /// Creates a new rule.
    #[must_use]
    pub const fn new(commander: CommanderClass, buff: BuffId, recipient: UnitKind) -> Self {
        Self {
            commander,
            buff,
            recipient,
        }
    }
}
