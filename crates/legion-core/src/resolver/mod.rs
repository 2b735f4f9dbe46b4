//! Resolver module for the behavior/resolver tick.
//!
//! Resolvers apply the outputs collected during the behavior phase to the
//! `next` arena, after every unit's own working copy has been committed.
//!
//! # Architecture
//!
//! Each resolver declares which output kinds it handles via [`Resolver::handles()`].
//! During resolution:
//! 1. Outputs are collected from all behaviors, in entity order
//! 2. Outputs are routed to resolvers based on their kind
//! 3. Each resolver applies its outputs to `next`
//!
//! # Invariants
//!
//! - Resolvers read lookups from `current` and write only to `next`
//! - Resolvers process outputs in emission order
//!
//! # Available Resolvers
//!
//! - [`LaunchResolver`]: puts projectiles in flight
//! - [`CombatResolver`]: applies strike damage
//! - [`EventResolver`]: appends visual effects and journal records

mod combat;
mod event;
mod launch;

pub use combat::CombatResolver;
pub use event::EventResolver;
pub use launch::LaunchResolver;

use crate::arena::Arena;
use crate::output::{OutputEnvelope, OutputKind};

/// Applies routed outputs to the next arena.
///
/// # Example
///
/// ```
/// use legion_core::arena::Arena;
/// use legion_core::output::{OutputEnvelope, OutputKind};
/// use legion_core::resolver::Resolver;
///
/// struct Discard;
///
/// impl Resolver for Discard {
///     fn handles(&self) -> &[OutputKind] {
///         &[OutputKind::Event]
///     }
///
///     fn resolve(&self, _outputs: &[&OutputEnvelope], _current: &Arena, _next: &mut Arena) {}
/// }
///
/// assert_eq!(Discard.handles(), &[OutputKind::Event]);
/// ```
pub trait Resolver: Send + Sync {
    /// Output kinds routed to this resolver.
    fn handles(&self) -> &[OutputKind];

    /// Applies `outputs` (already filtered by [`Resolver::handles`]) to `next`.
    fn resolve(&self, outputs: &[&OutputEnvelope], current: &Arena, next: &mut Arena);
}

/// The built-in resolvers, in run order.
#[must_use]
pub fn default_resolvers() -> Vec<Box<dyn Resolver>> {
    vec![
        Box::new(LaunchResolver::new()),
        Box::new(CombatResolver::new()),
        Box::new(EventResolver::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolver_is_object_safe() {
        fn _accepts_boxed(_resolver: Box<dyn Resolver>) {}
        fn _accepts_slice(_resolvers: &[Box<dyn Resolver>]) {}
    }

    #[test]
    fn defaults_cover_every_output_kind() {
        let resolvers = default_resolvers();
        for kind in [OutputKind::Command, OutputKind::Modifier, OutputKind::Event] {
            assert!(resolvers.iter().any(|r| r.handles().contains(&kind)), "{kind}");
        }
    }
}
