//! Benchmark for noise sampling performance.
//!
//! TARGET: a default-sized region (~185x185) sampled in under 2ms
//!
//! Run with: cargo bench --package delve_procedural --bench noise_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use delve_procedural::noise::{NoiseField, SimplexNoise, WorldSeed};

fn benchmark_single_sample(c: &mut Criterion) {
    let noise = SimplexNoise::new(WorldSeed::new(42));

    c.bench_function("single_noise_sample", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.15;
            black_box(noise.sample_unit(black_box(x), black_box(x * 0.7)))
        });
    });
}

fn benchmark_region_field(c: &mut Criterion) {
    let noise = SimplexNoise::new(WorldSeed::new(42));

    let mut group = c.benchmark_group("noise_field");
    group.throughput(Throughput::Elements(185 * 185));

    group.bench_function("185x185_single_octave", |b| {
        b.iter(|| black_box(NoiseField::sample(&noise, black_box(-4_321.0), 0.15, 185, 185)));
    });

    group.bench_function("185x185_four_octaves", |b| {
        b.iter(|| {
            black_box(NoiseField::sample_layered(
                &noise,
                black_box(-4_321.0),
                0.15,
                185,
                185,
                4,
            ))
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_single_sample, benchmark_region_field);
criterion_main!(benches);
