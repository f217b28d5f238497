use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use habitat_core::config::WorldConfig;
use habitat_core::{AppConfig, Landscape, SimulationClock};
use habitat_data::Coord;

fn seeded_config(width: u16, height: u16) -> AppConfig {
    AppConfig {
        world: WorldConfig {
            width,
            height,
            seed: Some(42),
            log_interval: 0,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn bench_tick_default_world(c: &mut Criterion) {
    c.bench_function("tick_default_world", |b| {
        b.iter_batched(
            || SimulationClock::new(seeded_config(40, 30)).expect("valid config"),
            |mut clock| {
                for _ in 0..10 {
                    black_box(clock.tick());
                }
                clock
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_nearest_of_kind(c: &mut Criterion) {
    let landscape = Landscape::generate(100, 100, 7, 4, 0.25, 0.62, 20);
    c.bench_function("nearest_water_radius_10", |b| {
        b.iter(|| {
            black_box(landscape.nearest_of_kind(
                Coord::new(50, 50),
                |_, t| t.ground() == habitat_data::GroundType::Water,
                10,
            ))
        })
    });
}

fn bench_find_path(c: &mut Criterion) {
    let landscape = Landscape::generate(100, 100, 7, 4, 0.25, 0.62, 20);
    c.bench_function("find_path_20_cells", |b| {
        b.iter(|| {
            black_box(landscape.find_path(Coord::new(40, 40), Coord::new(60, 60), 20, |g| {
                g != habitat_data::GroundType::Rock
            }))
        })
    });
}

criterion_group!(
    benches,
    bench_tick_default_world,
    bench_nearest_of_kind,
    bench_find_path
);
criterion_main!(benches);
