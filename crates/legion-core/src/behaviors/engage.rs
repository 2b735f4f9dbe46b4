//! Targeting, attack resolution and movement.
//!
//! The unit picks the nearest living opponent. Inside its engagement radius
//! it attacks when the cooldown allows and otherwise holds position; outside
//! it walks straight at the target.
//!
//! Attacks with an effective range above the ranged cutoff launch a
//! projectile whose damage is fixed against the defender's defense at launch.
//! Anything else strikes immediately through an `ApplyDamage` modifier.

use rand_chacha::ChaCha8Rng;

use crate::behavior::{Behavior, BehaviorId, Flow};
use crate::effect::EffectKind;
use crate::entity::{BuffId, Entity};
use crate::output::{Command, Event, Modifier, OutputBuffer, StrikeRecord};
use crate::stats::strike_damage;
use crate::world_view::WorldView;

/// Target, then attack or move.
#[derive(Debug, Clone, Copy, Default)]
pub struct Engage;

impl Behavior for Engage {
    fn id(&self) -> BehaviorId {
        BehaviorId::Engage
    }

    fn run(&self, view: &WorldView<'_>, unit: &mut Entity, out: &mut OutputBuffer, _rng: &mut ChaCha8Rng) -> Flow {
        let target = view.nearest_opponent(unit);
        unit.target = target.map(Entity::id);
        let Some(target) = target else {
            return Flow::Yield;
        };

        let tuning = view.tuning();
        let clock = view.clock();
        let stats = view.effective_stats(unit);
        let distance = unit.distance_to(target);

        if distance <= tuning.engagement_radius(stats.range) {
            let cooldown = stats.attack_interval / clock.speed;
            if !unit.combat.cooldown_ready(clock.time, cooldown) {
                return Flow::Continue;
            }
            unit.combat.last_attack_time = Some(clock.time);

            let defense = view.effective_stats(target).defense;
            let damage = strike_damage(stats.attack, defense);

            if tuning.is_ranged(stats.range) {
                let aim = target.position - unit.position;
                out.emit(
                    unit.id(),
                    self.id(),
                    Command::LaunchProjectile {
                        source: unit.id(),
                        target: target.id(),
                        origin: unit.position,
                        damage,
                        speed: tuning.projectile_speed * clock.speed,
                        heading: aim.y.atan2(aim.x),
                    },
                );
            } else {
                let kind = if unit.has_buff(BuffId::Frenzy) {
                    EffectKind::Slash
                } else {
                    EffectKind::Hit
                };
                out.emit(
                    unit.id(),
                    self.id(),
                    Modifier::ApplyDamage {
                        target: target.id(),
                        amount: damage,
                    },
                );
                out.emit(
                    unit.id(),
                    self.id(),
                    Event::Effect {
                        kind,
                        position: target.position,
                        duration: kind.duration(tuning),
                    },
                );
                out.emit(
                    unit.id(),
                    self.id(),
                    Event::Strike(StrikeRecord {
                        source: unit.id(),
                        target: target.id(),
                        amount: damage,
                        ranged: false,
                        time: clock.time,
                    }),
                );
            }
        } else if distance > 0.0 {
            let step = stats.move_speed * clock.scaled_frames(tuning);
            unit.position += (target.position - unit.position) / distance * step;
        }

        Flow::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviors::fixture::Bench;
    use crate::entity::{EntityId, Team, UnitKind};
    use crate::output::{Output, OutputKind};
    use crate::world_view::TickClock;
    use glam::Vec2;

    fn engage(bench: &mut Bench, id: EntityId, time: f64, speed: f32) -> (Entity, OutputBuffer) {
        let mut unit = bench.arena.get(id).cloned().unwrap();
        let view = WorldView::new(&bench.arena, &bench.data, TickClock::new(time, 16.0, speed));
        let mut out = OutputBuffer::new(time);
        Engage.run(&view, &mut unit, &mut out, &mut bench.rng);
        (unit, out)
    }

    mod targeting_tests {
        use super::*;

        #[test]
        fn no_opponents_yields_and_clears_target() {
            let mut bench = Bench::new();
            let id = bench.spawn(UnitKind::Infantry, Team::Player, 10.0, 50.0);
            bench.arena.get_mut(id).unwrap().target = Some(EntityId::new(42));

            let mut unit = bench.arena.get(id).cloned().unwrap();
            let view = WorldView::new(&bench.arena, &bench.data, TickClock::new(0.0, 16.0, 1.0));
            let mut out = OutputBuffer::new(0.0);
            assert_eq!(Engage.run(&view, &mut unit, &mut out, &mut bench.rng), Flow::Yield);
            assert!(unit.target.is_none());
        }

        #[test]
        fn moves_straight_towards_target() {
            let mut bench = Bench::new();
            let id = bench.spawn(UnitKind::Infantry, Team::Player, 10.0, 50.0);
            let foe = bench.spawn(UnitKind::Infantry, Team::Enemy, 90.0, 50.0);

            let (unit, out) = engage(&mut bench, id, 0.0, 2.0);
            assert_eq!(unit.target, Some(foe));
            assert!((unit.position.x - 10.1).abs() < 1e-5);
            assert_eq!(unit.position.y, 50.0);
            assert!(out.is_empty());
        }
    }

    mod melee_tests {
        use super::*;

        #[test]
        fn strike_emits_damage_effect_and_record() {
            let mut bench = Bench::new();
            let id = bench.spawn(UnitKind::Infantry, Team::Player, 10.0, 50.0);
            let foe = bench.spawn(UnitKind::Archer, Team::Enemy, 13.0, 50.0);
            bench.arena.get_mut(id).unwrap().combat.attack = 20.0;

            let (unit, out) = engage(&mut bench, id, 1000.0, 1.0);
            assert_eq!(unit.combat.last_attack_time, Some(1000.0));
            let outputs: Vec<_> = out.envelopes().iter().map(|e| e.output().clone()).collect();
            assert_eq!(
                outputs[0],
                Output::Modifier(Modifier::ApplyDamage { target: foe, amount: 19.0 })
            );
            assert!(matches!(outputs[1], Output::Event(Event::Effect { kind: EffectKind::Hit, .. })));
            assert!(matches!(outputs[2], Output::Event(Event::Strike(StrikeRecord { ranged: false, .. }))));
        }

        #[test]
        fn frenzy_strikes_slash() {
            let mut bench = Bench::new();
            let id = bench.spawn(UnitKind::Infantry, Team::Player, 10.0, 50.0);
            bench.spawn(UnitKind::Infantry, Team::Enemy, 13.0, 50.0);
            bench.arena.get_mut(id).unwrap().toggle_buff(BuffId::Frenzy, true);

            let (_, out) = engage(&mut bench, id, 1000.0, 1.0);
            assert!(out
                .envelopes()
                .iter()
                .any(|e| matches!(e.output(), Output::Event(Event::Effect { kind: EffectKind::Slash, .. }))));
        }

        #[test]
        fn holds_position_on_cooldown() {
            let mut bench = Bench::new();
            let id = bench.spawn(UnitKind::Infantry, Team::Player, 10.0, 50.0);
            bench.spawn(UnitKind::Infantry, Team::Enemy, 13.0, 50.0);
            bench.arena.get_mut(id).unwrap().combat.last_attack_time = Some(1000.0);

            let (unit, out) = engage(&mut bench, id, 1500.0, 1.0);
            assert!(out.is_empty());
            assert_eq!(unit.position, Vec2::new(10.0, 50.0));
        }

        #[test]
        fn speed_shortens_cooldown() {
            let mut bench = Bench::new();
            let id = bench.spawn(UnitKind::Infantry, Team::Player, 10.0, 50.0);
            bench.spawn(UnitKind::Infantry, Team::Enemy, 13.0, 50.0);
            bench.arena.get_mut(id).unwrap().combat.last_attack_time = Some(1000.0);

            let (_, out) = engage(&mut bench, id, 1500.0, 2.0);
            assert_eq!(out.of_kind(&[OutputKind::Modifier]).len(), 1);
        }

        #[test]
        fn damage_uses_defender_buffs() {
            let mut bench = Bench::new();
            let id = bench.spawn(UnitKind::Infantry, Team::Player, 10.0, 50.0);
            let foe = bench.spawn(UnitKind::Spear, Team::Enemy, 13.0, 50.0);
            bench.arena.get_mut(foe).unwrap().toggle_buff(BuffId::SpearCharge, true);

            let (_, out) = engage(&mut bench, id, 1000.0, 1.0);
            let damage = out.envelopes()[0].output().clone();
            assert_eq!(damage, Output::Modifier(Modifier::ApplyDamage { target: foe, amount: 1.0 }));
        }
    }

    mod ranged_tests {
        use super::*;

        #[test]
        fn archer_launches_projectile_with_launch_time_damage() {
            let mut bench = Bench::new();
            let id = bench.spawn(UnitKind::Archer, Team::Player, 10.0, 50.0);
            let foe = bench.spawn(UnitKind::Shield, Team::Enemy, 40.0, 50.0);

            let (_, out) = engage(&mut bench, id, 3000.0, 2.0);
            let commands = out.of_kind(&[OutputKind::Command]);
            assert_eq!(commands.len(), 1);
            match commands[0].output() {
                Output::Command(Command::LaunchProjectile { target, damage, speed, heading, .. }) => {
                    assert_eq!(*target, foe);
                    assert_eq!(*damage, 10.0);
                    assert!((speed - 0.16).abs() < 1e-6);
                    assert!(heading.abs() < 1e-6);
                }
                other => panic!("unexpected output {other:?}"),
            }
            assert!(out.of_kind(&[OutputKind::Modifier]).is_empty());
        }

        #[test]
        fn spear_reach_is_melee() {
            let mut bench = Bench::new();
            let id = bench.spawn(UnitKind::Spear, Team::Player, 10.0, 50.0);
            bench.spawn(UnitKind::Infantry, Team::Enemy, 25.0, 50.0);

            let (_, out) = engage(&mut bench, id, 1000.0, 1.0);
            assert_eq!(out.of_kind(&[OutputKind::Modifier]).len(), 1);
            assert!(out.of_kind(&[OutputKind::Command]).is_empty());
        }
    }
}
