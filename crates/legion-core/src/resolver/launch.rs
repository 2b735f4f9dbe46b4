//! Launch resolver: turns `LaunchProjectile` commands into projectiles.

use crate::arena::{Arena, Launch};
use crate::output::{Command, OutputEnvelope, OutputKind};

use super::Resolver;

/// Resolver for projectile launches.
#[derive(Debug, Clone, Default)]
pub struct LaunchResolver;

impl LaunchResolver {
    /// Creates a new launch resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Resolver for LaunchResolver {
    fn handles(&self) -> &[OutputKind] {
        &[OutputKind::Command]
    }

    fn resolve(&self, outputs: &[&OutputEnvelope], _current: &Arena, next: &mut Arena) {
        for envelope in outputs {
            let Some(Command::LaunchProjectile {
                source,
                target,
                origin,
                damage,
                speed,
                heading,
            }) = envelope.output().as_command()
            else {
                continue;
            };
            let id = next.launch(Launch {
                source: *source,
                target: *target,
                origin: *origin,
                damage: *damage,
                speed: *speed,
                heading: *heading,
            });
            tracing::trace!(
                projectile = %id,
                source = %source,
                target = %target,
                behavior = %envelope.behavior(),
                sequence = envelope.sequence(),
                damage,
                "Projectile launched"
            );
        }
    }
}
