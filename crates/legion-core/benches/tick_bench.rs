use criterion::{black_box, criterion_group, criterion_main, Criterion};
use legion_core::{GameData, Simulation, UnitKind};

const ROSTER: [UnitKind; 12] = [
    UnitKind::CommanderWarlord,
    UnitKind::Infantry,
    UnitKind::Infantry,
    UnitKind::Infantry,
    UnitKind::Archer,
    UnitKind::Archer,
    UnitKind::Archer,
    UnitKind::Shield,
    UnitKind::Shield,
    UnitKind::Spear,
    UnitKind::Spear,
    UnitKind::Spear,
];

fn battle(level: u32) -> Simulation {
    let mut sim = Simulation::new(GameData::default(), level, 42);
    sim.sync_roster(&ROSTER);
    sim.begin_battle();
    sim
}

fn bench_opening_tick(c: &mut Criterion) {
    // Last level: the largest built-in enemy roster
    let mut sim = battle(8);
    let mut time = 0.0;

    c.bench_function("tick_opening", |b| {
        b.iter(|| {
            sim.tick(black_box(time), black_box(16.0));
            time += 16.0;
        })
    });
}

fn bench_engaged_snapshot(c: &mut Criterion) {
    // Run into the melee so projectiles and effects are live
    let mut engaged = battle(8);
    let mut time = 0.0;
    for _ in 0..600 {
        engaged.frame(time);
        time += 16.0;
    }

    c.bench_function("snapshot_engaged", |b| b.iter(|| black_box(engaged.snapshot())));
}

fn bench_full_battle(c: &mut Criterion) {
    let mut group = c.benchmark_group("battle");
    group.sample_size(10);
    group.bench_function("level_4_to_outcome", |b| {
        b.iter(|| {
            let mut sim = battle(4);
            let mut time = 0.0;
            while sim.outcome().is_none() && time < 600_000.0 {
                sim.frame(time);
                time += 16.0;
            }
            black_box(sim.tick_count())
        })
    });
    group.finish();
}

criterion_group!(benches, bench_opening_tick, bench_engaged_snapshot, bench_full_battle);
criterion_main!(benches);
