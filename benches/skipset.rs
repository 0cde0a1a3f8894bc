//! Benchmarks for this crate's [`SkipSet`].

use criterion::{AxisScale, BenchmarkId, Criterion, PlotConfiguration, black_box};
use rand::{Rng, SeedableRng, rngs::StdRng};
use skipset::SkipSet;

/// Benchmarking sizes.
const SIZES: [usize; 6] = [1, 10, 100, 1000, 10_000, 100_000];

/// Benchmarking insertion.
#[inline]
pub fn insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("SkipSet Insert");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let mut sl: SkipSet = std::iter::repeat_with(|| rng.random()).take(size).collect();

            b.iter(|| {
                sl.insert(rng.random());
            });
        });
    }
}

/// Benchmarking search.
#[inline]
pub fn search(c: &mut Criterion) {
    let mut group = c.benchmark_group("SkipSet Search");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let keys: Vec<i64> = std::iter::repeat_with(|| rng.random()).take(size).collect();
            let sl: SkipSet = keys.iter().copied().collect();
            let probes: Vec<i64> = std::iter::repeat_with(|| keys[rng.random_range(0..keys.len())])
                .take(10)
                .collect();

            b.iter(|| {
                for &key in &probes {
                    black_box(sl.search(key));
                }
            });
        });
    }
}

/// Benchmarking deletion followed by re-insertion of the same key.
#[inline]
pub fn delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("SkipSet Delete");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let keys: Vec<i64> = std::iter::repeat_with(|| rng.random()).take(size).collect();
            let mut sl: SkipSet = keys.iter().copied().collect();

            b.iter(|| {
                let key = keys[rng.random_range(0..keys.len())];
                sl.delete(key);
                sl.insert(key);
            });
        });
    }
}

/// Benchmarking iteration.
#[inline]
pub fn iter(c: &mut Criterion) {
    c.bench_function("SkipSet Iter", |b| {
        let mut rng = StdRng::seed_from_u64(0x1234_abcd);
        let sl: SkipSet = std::iter::repeat_with(|| rng.random())
            .take(100_000)
            .collect();

        b.iter(|| {
            for key in &sl {
                black_box(key);
            }
        });
    });
}
