//! Output system for the behavior/resolver tick.
//!
//! Behaviors never write to other entities. Anything that crosses entity
//! boundaries is emitted as an output and applied by a resolver after every
//! entity has acted:
//! - [`Command`]: spawn requests (`LaunchProjectile`)
//! - [`Modifier`]: value changes to another entity (`ApplyDamage`)
//! - [`Event`]: observations (`Effect`, `Strike`)
//!
//! Every output travels in an [`OutputEnvelope`] that records which entity
//! and which behavior emitted it, the simulation time, and a per-tick
//! sequence number.
//!
//! # Example
//!
//! ```
//! use legion_core::behavior::BehaviorId;
//! use legion_core::entity::EntityId;
//! use legion_core::output::{Modifier, Output, OutputEnvelope, OutputKind};
//!
//! let envelope = OutputEnvelope::new(
//!     Output::Modifier(Modifier::ApplyDamage { target: EntityId::new(2), amount: 16.0 }),
//!     EntityId::new(1),
//!     BehaviorId::Engage,
//!     1_000.0,
//!     0,
//! );
//!
//! assert_eq!(envelope.kind(), OutputKind::Modifier);
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::behavior::BehaviorId;
use crate::effect::EffectKind;
use crate::entity::EntityId;

// =============================================================================
// Output Categories
// =============================================================================

/// Requests to create new simulation objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Put a projectile in flight.
    LaunchProjectile {
        /// Firing entity.
        source: EntityId,
        /// Target entity.
        target: EntityId,
        /// Launch position.
        origin: Vec2,
        /// Damage on impact, computed at launch.
        damage: f32,
        /// Lane units per reference frame.
        speed: f32,
        /// Heading in radians.
        heading: f32,
    },
}

/// Value changes to an entity other than the emitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Modifier {
    /// Subtract hit points and stamp the hit time.
    ApplyDamage {
        /// Entity to damage.
        target: EntityId,
        /// Damage amount (at least 1).
        amount: f32,
    },
}

impl Modifier {
    /// Returns the target entity.
    #[must_use]
    pub const fn target(&self) -> EntityId {
        match self {
            Self::ApplyDamage { target, .. } => *target,
        }
    }
}

/// One resolved strike, melee or ranged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrikeRecord {
    /// Attacker.
    pub source: EntityId,
    /// Defender.
    pub target: EntityId,
    /// Damage dealt.
    pub amount: f32,
    /// `true` for projectile impacts.
    pub ranged: bool,
    /// Simulation time of the strike.
    pub time: f64,
}

/// Things that happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// A visual effect to show.
    Effect {
        /// Effect kind.
        kind: EffectKind,
        /// Where to show it.
        position: Vec2,
        /// Lifetime in ms.
        duration: f64,
    },
    /// A melee strike landed.
    Strike(StrikeRecord),
}

// =============================================================================
// Top-Level Output Enum
// =============================================================================

/// Output kind for resolver routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputKind {
    /// Command outputs.
    Command,
    /// Modifier outputs.
    Modifier,
    /// Event outputs.
    Event,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command => write!(f, "Command"),
            Self::Modifier => write!(f, "Modifier"),
            Self::Event => write!(f, "Event"),
        }
    }
}

/// A behavior output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// A command output.
    Command(Command),
    /// A modifier output.
    Modifier(Modifier),
    /// An event output.
    Event(Event),
}

impl Output {
    /// Returns the kind of this output for resolver routing.
    #[must_use]
    pub const fn kind(&self) -> OutputKind {
        match self {
            Self::Command(_) => OutputKind::Command,
            Self::Modifier(_) => OutputKind::Modifier,
            Self::Event(_) => OutputKind::Event,
        }
    }

    /// Returns the command if this is a command output.
    #[must_use]
    pub const fn as_command(&self) -> Option<&Command> {
        match self {
            Self::Command(cmd) => Some(cmd),
            _ => None,
        }
    }

    /// Returns the modifier if this is a modifier output.
    #[must_use]
    pub const fn as_modifier(&self) -> Option<&Modifier> {
        match self {
            Self::Modifier(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the event if this is an event output.
    #[must_use]
    pub const fn as_event(&self) -> Option<&Event> {
        match self {
            Self::Event(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Command> for Output {
    fn from(cmd: Command) -> Self {
        Self::Command(cmd)
    }
}

impl From<Modifier> for Output {
    fn from(m: Modifier) -> Self {
        Self::Modifier(m)
    }
}

impl From<Event> for Output {
    fn from(e: Event) -> Self {
        Self::Event(e)
    }
}

// =============================================================================
// Output Envelope
// =============================================================================

/// Wrapper for outputs with provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEnvelope {
    output: Output,
    source: EntityId,
    behavior: BehaviorId,
    time: f64,
    sequence: u32,
}

impl OutputEnvelope {
    /// Creates a new output envelope.
    #[must_use]
    pub fn new(output: Output, source: EntityId, behavior: BehaviorId, time: f64, sequence: u32) -> Self {
        Self {
            output,
            source,
            behavior,
            time,
            sequence,
        }
    }

    /// Returns a reference to the wrapped output.
    #[must_use]
    pub fn output(&self) -> &Output {
        &self.output
    }

    /// Returns the emitting entity.
    #[must_use]
    pub const fn source(&self) -> EntityId {
        self.source
    }

    /// Returns the emitting behavior.
    #[must_use]
    pub const fn behavior(&self) -> BehaviorId {
        self.behavior
    }

    /// Returns the simulation time the output was emitted at.
    #[must_use]
    pub const fn time(&self) -> f64 {
        self.time
    }

    /// Returns the sequence number within the tick.
    #[must_use]
    pub const fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Returns the kind of the wrapped output.
    #[must_use]
    pub const fn kind(&self) -> OutputKind {
        self.output.kind()
    }
}

// =============================================================================
// Output Buffer
// =============================================================================

/// Collects outputs for one tick, stamping provenance and sequence numbers.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    envelopes: Vec<OutputEnvelope>,
    time: f64,
}

impl OutputBuffer {
    /// Creates an empty buffer for a tick at `time`.
    #[must_use]
    pub fn new(time: f64) -> Self {
        Self {
            envelopes: Vec::new(),
            time,
        }
    }

    /// Simulation time of the tick.
    #[must_use]
    pub const fn time(&self) -> f64 {
        self.time
    }

    /// Appends an output.
    pub fn emit(&mut self, source: EntityId, behavior: BehaviorId, output: impl Into<Output>) {
        let sequence = u32::try_from(self.envelopes.len()).unwrap_or(u32::MAX);
        self.envelopes
            .push(OutputEnvelope::new(output.into(), source, behavior, self.time, sequence));
    }

    /// Envelopes of `kind`, in emission order.
    #[must_use]
    pub fn of_kind(&self, kinds: &[OutputKind]) -> Vec<&OutputEnvelope> {
        self.envelopes
            .iter()
            .filter(|envelope| kinds.contains(&envelope.kind()))
            .collect()
    }

    /// All envelopes, in emission order.
    #[must_use]
    pub fn envelopes(&self) -> &[OutputEnvelope] {
        &self.envelopes
    }

    /// Number of collected outputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.envelopes.len()
    }

    /// Returns `true` if nothing was emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.envelopes.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_route_by_category() {
        let damage = Output::from(Modifier::ApplyDamage { target: EntityId::new(1), amount: 3.0 });
        let effect = Output::from(Event::Effect { kind: EffectKind::Hit, position: Vec2::ZERO, duration: 300.0 });
        assert_eq!(damage.kind(), OutputKind::Modifier);
        assert_eq!(effect.kind(), OutputKind::Event);
        assert!(damage.as_modifier().is_some());
        assert!(effect.as_command().is_none());
    }

    #[test]
    fn buffer_stamps_sequence_and_time() {
        let mut buffer = OutputBuffer::new(250.0);
        buffer.emit(EntityId::new(1), BehaviorId::Engage, Modifier::ApplyDamage { target: EntityId::new(2), amount: 5.0 });
        buffer.emit(EntityId::new(2), BehaviorId::Regen, Event::Effect { kind: EffectKind::Heal, position: Vec2::ZERO, duration: 600.0 });

        let all = buffer.envelopes();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].sequence(), 0);
        assert_eq!(all[1].sequence(), 1);
        assert_eq!(all[1].time(), 250.0);
        assert_eq!(all[1].behavior(), BehaviorId::Regen);
    }

    #[test]
    fn of_kind_filters_and_keeps_order() {
        let mut buffer = OutputBuffer::new(0.0);
        let source = EntityId::new(1);
        buffer.emit(source, BehaviorId::Engage, Modifier::ApplyDamage { target: EntityId::new(2), amount: 1.0 });
        buffer.emit(source, BehaviorId::Engage, Event::Effect { kind: EffectKind::Hit, position: Vec2::ZERO, duration: 300.0 });
        buffer.emit(source, BehaviorId::Engage, Modifier::ApplyDamage { target: EntityId::new(3), amount: 2.0 });

        let modifiers = buffer.of_kind(&[OutputKind::Modifier]);
        assert_eq!(modifiers.len(), 2);
        assert_eq!(modifiers[1].output().as_modifier().map(Modifier::target), Some(EntityId::new(3)));
    }
}
