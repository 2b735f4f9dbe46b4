//! Combat resolver for strike damage.
//!
//! `ApplyDamage` subtracts from the target's hit points in `next`, clamping
//! at zero, and stamps the hit time. A target already at zero stays at zero;
//! dead units are dropped by the next tick's filter, not here.

use crate::arena::Arena;
use crate::output::{Modifier, OutputEnvelope, OutputKind};

use super::Resolver;

/// Resolver for damage modifiers.
///
/// # Example
///
/// ```
/// use legion_core::resolver::{CombatResolver, Resolver};
/// use legion_core::output::OutputKind;
///
/// let resolver = CombatResolver::new();
/// assert!(resolver.handles().contains(&OutputKind::Modifier));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CombatResolver;

impl CombatResolver {
    /// Creates a new combat resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Resolver for CombatResolver {
    fn handles(&self) -> &[OutputKind] {
        &[OutputKind::Modifier]
    }

    fn resolve(&self, outputs: &[&OutputEnvelope], _current: &Arena, next: &mut Arena) {
        for envelope in outputs {
            let Some(Modifier::ApplyDamage { target, amount }) = envelope.output().as_modifier() else {
                continue;
            };
            let Some(entity) = next.get_mut(*target) else {
                tracing::debug!(
                    source = %envelope.source(),
                    behavior = %envelope.behavior(),
                    target = %target,
                    "Damage target gone"
                );
                continue;
            };
            entity.combat.take_damage(*amount, envelope.time());
            tracing::trace!(
                source = %envelope.source(),
                behavior = %envelope.behavior(),
                sequence = envelope.sequence(),
                target = %target,
                amount,
                hp = entity.combat.hp,
                "Damage applied"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::BehaviorId;
    use crate::entity::components::CombatState;
    use crate::entity::{EntityId, Team, UnitKind};
    use crate::output::{Output, OutputBuffer};
    use glam::Vec2;

    fn setup() -> (Arena, EntityId) {
        let mut arena = Arena::new();
        let id = arena.spawn(UnitKind::Archer, Team::Enemy, Vec2::new(50.0, 50.0), CombatState::with_max_hp(60.0));
        (arena, id)
    }

    fn damage(buffer: &mut OutputBuffer, target: EntityId, amount: f32) {
        buffer.emit(EntityId::new(99), BehaviorId::Engage, Output::Modifier(Modifier::ApplyDamage { target, amount }));
    }

    #[test]
    fn damage_reduces_hp_and_stamps_hit() {
        let (current, id) = setup();
        let mut next = current.clone();
        let mut buffer = OutputBuffer::new(2000.0);
        damage(&mut buffer, id, 16.0);

        CombatResolver::new().resolve(&buffer.of_kind(&[OutputKind::Modifier]), &current, &mut next);

        let archer = next.get(id).unwrap();
        assert_eq!(archer.combat.hp, 44.0);
        assert_eq!(archer.combat.last_hit_time, Some(2000.0));
        assert_eq!(current.get(id).unwrap().combat.hp, 60.0);
    }

    #[test]
    fn multiple_hits_stack_and_clamp_at_zero() {
        let (current, id) = setup();
        let mut next = current.clone();
        let mut buffer = OutputBuffer::new(0.0);
        damage(&mut buffer, id, 40.0);
        damage(&mut buffer, id, 40.0);

        CombatResolver::new().resolve(&buffer.of_kind(&[OutputKind::Modifier]), &current, &mut next);
        assert_eq!(next.get(id).unwrap().combat.hp, 0.0);
    }

    #[test]
    fn missing_target_is_ignored() {
        let (current, _) = setup();
        let mut next = current.clone();
        let mut buffer = OutputBuffer::new(0.0);
        damage(&mut buffer, EntityId::new(500), 40.0);

        CombatResolver::new().resolve(&buffer.of_kind(&[OutputKind::Modifier]), &current, &mut next);
        assert_eq!(next.entity_count(), 1);
    }
}
