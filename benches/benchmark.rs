//! Benchmarks for Cardano grille operations.
//!
//! Measures grille construction across dimensions, full sealing of a
//! message, and decoding a sealed grid with an operator label set.

use cardano_grille::random::MersenneTwister64;
use cardano_grille::{build_grille, decode, CardanoCipher, Dimension, LabelSet};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Message used consistently across the sealing benchmarks.
const BENCH_MESSAGE: &str = "Benchmark message for the rotating grille, 2024";

/// Benchmarks `build_grille()` for growing grid sizes.
fn bench_build_grille(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_grille");

    for side in [4usize, 16, 64] {
        let dimension = Dimension::new(side).unwrap();
        group.throughput(Throughput::Elements(dimension.num_cells() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(side), &dimension, |b, &d| {
            b.iter(|| build_grille(black_box(d)));
        });
    }

    group.finish();
}

/// Benchmarks the full plan/build/generate/encode pipeline.
fn bench_seal(c: &mut Criterion) {
    let cipher = CardanoCipher::new();
    let mut rng = MersenneTwister64::with_seed(2024);

    let mut group = c.benchmark_group("seal");
    group.throughput(Throughput::Elements(BENCH_MESSAGE.chars().count() as u64));
    group.bench_function("default", |b| {
        b.iter(|| cipher.seal(black_box(BENCH_MESSAGE), &mut rng));
    });
    group.finish();
}

/// Benchmarks decoding with the code's labels versus its holes.
fn bench_decode(c: &mut Criterion) {
    let cipher = CardanoCipher::new();
    let sealed = cipher.seal(BENCH_MESSAGE, &mut MersenneTwister64::with_seed(7));
    let labels: LabelSet = sealed.code().labels();

    c.bench_function("decode_labels", |b| {
        b.iter(|| decode(black_box(sealed.characters()), sealed.label_grid(), &labels));
    });
    c.bench_function("decode_holes", |b| {
        b.iter(|| decode(black_box(sealed.characters()), sealed.label_grid(), sealed.code()));
    });
    c.bench_function("open_holes", |b| {
        b.iter(|| black_box(&sealed).open());
    });
}

criterion_group!(benches, bench_build_grille, bench_seal, bench_decode);
criterion_main!(benches);
