//! Battle phase, speed multiplier and the frame clock.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle phase of one battle.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// The roster may grow; ticks do not run.
    #[default]
    Deploying,
    /// Ticks run every unpaused frame.
    Battle,
    /// The outcome has been delivered.
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deploying => write!(f, "DEPLOYING"),
            Self::Battle => write!(f, "BATTLE"),
            Self::Finished => write!(f, "FINISHED"),
        }
    }
}

/// Discrete speed-up factor, 1x to 3x.
///
/// Speed scales time-dependent quantities (regen, movement, charge timers,
/// cooldowns), not how often ticks run.
///
/// ```
/// use legion_core::control::SpeedMultiplier;
///
/// let speed = SpeedMultiplier::default();
/// assert_eq!(speed.cycle().cycle().cycle(), speed);
/// assert!(SpeedMultiplier::new(4).is_none());
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SpeedMultiplier(u8);

impl SpeedMultiplier {
    /// Lowest speed.
    pub const MIN: u8 = 1;
    /// Highest speed.
    pub const MAX: u8 = 3;

    /// Validates a multiplier in `1..=3`.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value >= Self::MIN && value <= Self::MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Next speed in the 1, 2, 3, 1 cycle.
    #[must_use]
    pub const fn cycle(self) -> Self {
        if self.0 >= Self::MAX {
            Self(Self::MIN)
        } else {
            Self(self.0 + 1)
        }
    }

    /// The raw multiplier.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// The multiplier as a float factor.
    #[must_use]
    pub fn as_f32(self) -> f32 {
        f32::from(self.0)
    }
}

impl Default for SpeedMultiplier {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl TryFrom<u8> for SpeedMultiplier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("speed multiplier {value} outside 1..=3"))
    }
}

impl From<SpeedMultiplier> for u8 {
    fn from(speed: SpeedMultiplier) -> Self {
        speed.0
    }
}

impl fmt::Display for SpeedMultiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.0)
    }
}

/// Derives frame deltas from successive animation-frame times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    /// Creates a clock that has seen no frame.
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Records `time` and returns the elapsed milliseconds since the
    /// previous frame. The first frame, and any frame earlier than the
    /// previous one, yield zero.
    #[allow(clippy::cast_possible_truncation)]
    pub fn advance(&mut self, time: f64) -> f32 {
        let delta = self.last.map_or(0.0, |last| (time - last).max(0.0));
        self.last = Some(time);
        delta as f32
    }

    /// Time of the previous frame.
    #[must_use]
    pub const fn last(&self) -> Option<f64> {
        self.last
    }
}
