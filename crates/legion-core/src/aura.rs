//! Commander aura synchronization.
//!
//! Every tick, before units act, each team's living commanders decide which
//! aura buffs that team's units hold. Membership is toggled to match, so an
//! aura disappears the tick its last granting commander dies and comes back
//! as soon as a qualifying commander is alive again.

use std::collections::BTreeSet;

use crate::arena::Arena;
use crate::data::GameData;
use crate::entity::{CommanderClass, Team};

/// Commander classes present among `team`'s living units.
#[must_use]
pub fn commander_classes(arena: &Arena, team: Team, data: &GameData) -> BTreeSet<CommanderClass> {
    arena
        .living(team)
        .filter_map(|unit| data.base_stats(unit.kind()).and_then(|stats| stats.commander))
        .collect()
}

/// Toggles aura buffs on every living unit to match commander presence.
///
/// Returns the number of buff memberships that changed. Hit points are not
/// touched; granting max hp does not heal.
pub fn sync_auras(arena: &mut Arena, data: &GameData) -> usize {
    let mut changes = 0;

    for team in [Team::Player, Team::Enemy] {
        let present = commander_classes(arena, team, data);

        for unit in arena
            .entities_sorted_mut()
            .filter(|unit| unit.team() == team && unit.is_alive())
        {
            let kind = unit.kind();
            for rule in data.auras.iter().filter(|rule| rule.recipient == kind) {
                let granted = data.auras.iter().any(|other| {
                    other.recipient == rule.recipient
                        && other.buff == rule.buff
                        && present.contains(&other.commander)
                });
                if unit.toggle_buff(rule.buff, granted) {
                    changes += 1;
                    tracing::debug!(
                        unit = %unit.id(),
                        kind = %unit.kind(),
                        %team,
                        buff = %rule.buff,
                        granted,
                        "Aura toggled"
                    );
                }
            }
        }
    }

    changes
}
