//! State components carried by every combatant.
//!
//! - [`CombatState`]: spawn-time numeric stats, hit points and timestamps
//! - [`ChargeState`]: the WAITING → CHARGING → NORMAL state machine
//! - [`BuffId`] / [`BuffSet`]: the enumerated buff ids and their set container

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::data::BaseStats;

/// Numeric combat state of a unit.
///
/// `attack`, `defense`, `range`, `attack_interval`, `move_speed`, `max_hp`
/// and `scale` are copied from base stats plus upgrade (or difficulty) at
/// spawn and never change afterwards. Buff deltas are applied on top of
/// them by [`crate::stats::effective_stats`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatState {
    /// Current hit points, clamped to `[0, effective max hp]`.
    pub hp: f32,
    /// Spawn max hit points.
    pub max_hp: f32,
    /// Spawn attack.
    pub attack: f32,
    /// Spawn defense.
    pub defense: f32,
    /// Spawn range, in stat units (not lane units).
    pub range: f32,
    /// Spawn attack interval in milliseconds.
    pub attack_interval: f32,
    /// Spawn move speed in lane units per 16 ms reference frame.
    pub move_speed: f32,
    /// Visual scale.
    pub scale: f32,
    /// Simulation time of the last attack, if any.
    pub last_attack_time: Option<f64>,
    /// Simulation time this unit was last hit, if ever.
    pub last_hit_time: Option<f64>,
}

impl CombatState {
    /// Builds combat state from base stats with full hit points.
    #[must_use]
    pub fn from_base(base: &BaseStats) -> Self {
        Self {
            hp: base.hp,
            max_hp: base.hp,
            attack: base.attack,
            defense: base.defense,
            range: base.range,
            attack_interval: base.attack_interval,
            move_speed: base.move_speed,
            scale: base.scale,
            last_attack_time: None,
            last_hit_time: None,
        }
    }

    /// Bare combat state with only hit points set; mostly useful in tests.
    #[must_use]
    pub fn with_max_hp(max_hp: f32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            attack: 0.0,
            defense: 0.0,
            range: 1.0,
            attack_interval: 1000.0,
            move_speed: 0.0,
            scale: 1.0,
            last_attack_time: None,
            last_hit_time: None,
        }
    }

    /// Returns `true` if the attack cooldown has elapsed at `time`.
    ///
    /// `interval` is the (already speed-scaled) cooldown; the comparison is strict.
    #[must_use]
    pub fn cooldown_ready(&self, time: f64, interval: f32) -> bool {
        self.last_attack_time
            .map_or(true, |last| time - last > f64::from(interval))
    }

    /// Subtracts `amount` from hit points, never going below zero, and stamps the hit time.
    pub fn take_damage(&mut self, amount: f32, time: f64) {
        self.hp = (self.hp - amount).max(0.0);
        self.last_hit_time = Some(time);
    }
}

/// AI state of a unit.
///
/// Only meaningful for kinds that run the charge state machine.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AiState {
    /// Regular targeting and combat.
    #[default]
    Normal,
    /// Holding position while the charge timer fills.
    Waiting,
    /// Running at the far edge of the lane.
    Charging,
}

impl AiState {
    /// Returns `true` while the charge buff should be held.
    #[must_use]
    pub const fn holds_charge(self) -> bool {
        matches!(self, Self::Waiting | Self::Charging)
    }
}

/// Charge state machine: current state plus the accumulated wait timer (ms).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChargeState {
    /// Current AI state.
    pub state: AiState,
    /// Accumulated, speed-scaled time spent waiting.
    pub timer: f32,
}

impl ChargeState {
    /// Creates a state machine in `state` with an empty timer.
    #[must_use]
    pub const fn new(state: AiState) -> Self {
        Self { state, timer: 0.0 }
    }
}

/// Enumerated buff identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuffId {
    /// Bloodlust: warlord aura for infantry.
    Frenzy,
    /// Regeneration: guardian aura for shields.
    Heal,
    /// Eagle eye: elf aura for archers.
    ElfRange,
    /// Phalanx charge: self-granted by the charge state machine.
    SpearCharge,
    /// Blitzkrieg: vanguard aura for spears.
    VanguardPassive,
}

impl BuffId {
    /// Every buff id, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Frenzy,
        Self::Heal,
        Self::ElfRange,
        Self::SpearCharge,
        Self::VanguardPassive,
    ];

    /// Returns the single-bit set for this id.
    #[must_use]
    pub const fn flag(self) -> BuffSet {
        match self {
            Self::Frenzy => BuffSet::FRENZY,
            Self::Heal => BuffSet::HEAL,
            Self::ElfRange => BuffSet::ELF_RANGE,
            Self::SpearCharge => BuffSet::SPEAR_CHARGE,
            Self::VanguardPassive => BuffSet::VANGUARD_PASSIVE,
        }
    }

    /// Returns the game data key for this id.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Frenzy => "FRENZY",
            Self::Heal => "HEAL",
            Self::ElfRange => "ELF_RANGE",
            Self::SpearCharge => "SPEAR_CHARGE",
            Self::VanguardPassive => "VANGUARD_PASSIVE",
        }
    }
}

impl fmt::Display for BuffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

bitflags! {
    /// Set of active buffs.
    ///
    /// Membership is a bit, so duplicates are impossible and toggling is idempotent.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct BuffSet: u8 {
        /// Bloodlust.
        const FRENZY = 1 << 0;
        /// Regeneration.
        const HEAL = 1 << 1;
        /// Eagle eye.
        const ELF_RANGE = 1 << 2;
        /// Phalanx charge.
        const SPEAR_CHARGE = 1 << 3;
        /// Blitzkrieg.
        const VANGUARD_PASSIVE = 1 << 4;
    }
}

impl BuffSet {
    /// Iterates the active buff ids in declaration order.
    pub fn ids(self) -> impl Iterator<Item = BuffId> {
        BuffId::ALL.into_iter().filter(move |id| self.contains(id.flag()))
    }
}
