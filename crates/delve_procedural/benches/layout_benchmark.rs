//! Benchmark for whole-map layout generation.
//!
//! TARGET: default irregular map (plan + build) in under 5ms
//!
//! Run with: cargo bench --package delve_procedural --bench layout_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use delve_procedural::grid::{Bounds, Cell, CellGrid, Coordinate};
use delve_procedural::{prune, LayoutBuilder, MapConfig, WorldSeed};

fn benchmark_default_layout(c: &mut Criterion) {
    let builder = LayoutBuilder::new(MapConfig::default(), WorldSeed::new(42))
        .expect("default config is valid");
    let mut rng = WorldSeed::new(7).rng();

    c.bench_function("default_irregular_layout", |b| {
        b.iter(|| black_box(builder.generate(&mut rng)));
    });
}

fn benchmark_rectangular_layout(c: &mut Criterion) {
    let config = MapConfig::rectangular(Coordinate::new(-128, -128), 256, 256);
    let builder = LayoutBuilder::new(config, WorldSeed::new(42)).expect("rectangular config is valid");
    let mut rng = WorldSeed::new(7).rng();

    c.bench_function("rectangular_256x256_layout", |b| {
        b.iter(|| black_box(builder.generate(&mut rng)));
    });
}

fn benchmark_prune_checkerboard(c: &mut Criterion) {
    // Worst case for the pruner: every tile is its own component.
    let bounds = Bounds::new(Coordinate::ORIGIN, 256, 256);
    let mut checker = CellGrid::filled(bounds, Cell::Present);
    for j in 0..256 {
        for i in 0..256 {
            if (i + j) % 2 == 0 {
                checker.set(i, j, Cell::Absent);
            }
        }
    }

    c.bench_function("prune_256x256_checkerboard", |b| {
        b.iter(|| {
            let mut grid = checker.clone();
            black_box(prune(&mut grid, Cell::Absent, 100))
        });
    });
}

criterion_group!(
    benches,
    benchmark_default_layout,
    benchmark_rectangular_layout,
    benchmark_prune_checkerboard
);
criterion_main!(benches);
