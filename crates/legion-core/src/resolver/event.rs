//! Event resolver for the effect stream and the combat journal.
//!
//! Events never change simulation state. `Effect` events become visual
//! effects stamped with the output's time; `Strike` events are appended to
//! the journal.

use crate::arena::Arena;
use crate::output::{Event, OutputEnvelope, OutputKind};

use super::Resolver;

/// Resolver that records event outputs.
#[derive(Debug, Clone, Default)]
pub struct EventResolver;

impl EventResolver {
    /// Creates a new event resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Resolver for EventResolver {
    fn handles(&self) -> &[OutputKind] {
        &[OutputKind::Event]
    }

    fn resolve(&self, outputs: &[&OutputEnvelope], _current: &Arena, next: &mut Arena) {
        for envelope in outputs {
            match envelope.output().as_event() {
                Some(Event::Effect { kind, position, duration }) => {
                    next.push_effect(*kind, *position, envelope.time(), *duration);
                }
                Some(Event::Strike(record)) => {
                    tracing::trace!(
                        source = %envelope.source(),
                        behavior = %envelope.behavior(),
                        sequence = envelope.sequence(),
                        target = %record.target,
                        amount = record.amount,
                        "Strike recorded"
                    );
                    next.record_strike(*record);
                }
                None => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::BehaviorId;
    use crate::effect::EffectKind;
    use crate::entity::EntityId;
    use crate::output::{OutputBuffer, StrikeRecord};
    use glam::Vec2;

    #[test]
    fn effects_and_strikes_land_in_next() {
        let current = Arena::new();
        let mut next = Arena::new();
        let mut buffer = OutputBuffer::new(750.0);
        let source = EntityId::new(1);
        buffer.emit(
            source,
            BehaviorId::Engage,
            Event::Effect { kind: EffectKind::Slash, position: Vec2::new(3.0, 4.0), duration: 300.0 },
        );
        buffer.emit(
            source,
            BehaviorId::Engage,
            Event::Strike(StrikeRecord {
                source,
                target: EntityId::new(2),
                amount: 9.0,
                ranged: false,
                time: 750.0,
            }),
        );

        EventResolver::new().resolve(&buffer.of_kind(&[OutputKind::Event]), &current, &mut next);

        assert_eq!(next.effects().len(), 1);
        assert_eq!(next.effects()[0].kind, EffectKind::Slash);
        assert_eq!(next.effects()[0].created_at, 750.0);
        assert_eq!(next.journal().len(), 1);
        assert!(current.effects().is_empty());
    }
}
