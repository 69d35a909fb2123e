//! Block matching benchmarks
//!
//! Run with: cargo bench --bench block_matching

use block_motion::motion::{compensate, difference, BlockMatcher, SearchParams};
use block_motion::source::{FrameSource, SyntheticSource};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

/// Benchmark exhaustive search on a CIF frame pair
fn bench_estimate(c: &mut Criterion) {
    let mut source = SyntheticSource::new(352, 288, 1).unwrap().with_motion(2, -3);
    let reference = source.frame_at(0).unwrap();
    let current = source.frame_at(1).unwrap();

    let mut group = c.benchmark_group("estimate");
    group.sample_size(10);

    for (block_size, radius) in [(16, 4), (16, 8), (32, 16)] {
        let matcher = BlockMatcher::new(SearchParams::new(block_size, radius)).unwrap();
        group.throughput(Throughput::Elements((352 / block_size as u64) * (288 / block_size as u64)));

        group.bench_function(format!("sequential_b{}_s{}", block_size, radius), |b| {
            b.iter(|| matcher.estimate(black_box(&current), black_box(&reference)).unwrap())
        });
        group.bench_function(format!("parallel_b{}_s{}", block_size, radius), |b| {
            b.iter(|| matcher.estimate_par(black_box(&current), black_box(&reference)).unwrap())
        });
    }

    group.finish();
}

/// Benchmark compensation and naive differencing
fn bench_compensate(c: &mut Criterion) {
    let mut source = SyntheticSource::new(352, 288, 1).unwrap().with_motion(2, -3);
    let reference = source.frame_at(0).unwrap();
    let current = source.frame_at(1).unwrap();
    let field = BlockMatcher::new(SearchParams::new(16, 8))
        .unwrap()
        .estimate(&current, &reference)
        .unwrap();

    let mut group = c.benchmark_group("compensate");
    group.throughput(Throughput::Bytes(352 * 288));

    group.bench_function("compensate", |b| {
        b.iter(|| compensate(black_box(&current), black_box(&reference), black_box(&field)).unwrap())
    });
    group.bench_function("difference", |b| {
        b.iter(|| difference(black_box(&current), black_box(&reference)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_estimate, bench_compensate);
criterion_main!(benches);
