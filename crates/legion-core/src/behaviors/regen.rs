//! Hit point regeneration under a regen buff.

use glam::Vec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::behavior::{Behavior, BehaviorId, Flow};
use crate::effect::EffectKind;
use crate::entity::Entity;
use crate::output::{Event, OutputBuffer};
use crate::world_view::WorldView;

/// Restores `max_hp * regen * seconds * speed` per tick, capped at effective
/// max hp, and occasionally shows a HEAL effect above the unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct Regen;

impl Behavior for Regen {
    fn id(&self) -> BehaviorId {
        BehaviorId::Regen
    }

    fn run(&self, view: &WorldView<'_>, unit: &mut Entity, out: &mut OutputBuffer, rng: &mut ChaCha8Rng) -> Flow {
        let stats = view.effective_stats(unit);
        let Some(regen) = stats.regen_per_sec else {
            return Flow::Continue;
        };
        if unit.combat.hp >= stats.max_hp {
            return Flow::Continue;
        }

        let clock = view.clock();
        let tuning = view.tuning();
        let amount = stats.max_hp * regen * (clock.delta / 1000.0) * clock.speed;
        unit.combat.hp = (unit.combat.hp + amount).min(stats.max_hp);

        if rng.gen::<f32>() < tuning.heal_effect_chance * clock.speed {
            out.emit(
                unit.id(),
                self.id(),
                Event::Effect {
                    kind: EffectKind::Heal,
                    position: unit.position - Vec2::new(0.0, tuning.heal_effect_lift),
                    duration: EffectKind::Heal.duration(tuning),
                },
            );
        }

        Flow::Continue
    }
}
