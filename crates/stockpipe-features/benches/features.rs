//! Benchmarks for the rolling-feature implementations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stockpipe_features::{rolling_mean, rolling_std, FeatureEngine};

fn generate_closes(size: usize) -> Vec<Option<f64>> {
    (0..size)
        .map(|i| Some(100.0 + (i as f64 * 0.1).sin() * 10.0))
        .collect()
}

fn benchmark_rolling_mean(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling_mean");

    for size in [1000, 10000, 100000].iter() {
        let data = generate_closes(*size);

        group.bench_with_input(BenchmarkId::new("window20", size), &data, |b, data| {
            b.iter(|| rolling_mean(black_box(data), black_box(20)))
        });
    }

    group.finish();
}

fn benchmark_rolling_std(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling_std");

    for size in [1000, 10000, 100000].iter() {
        let data = generate_closes(*size);

        group.bench_with_input(BenchmarkId::new("window10", size), &data, |b, data| {
            b.iter(|| rolling_std(black_box(data), black_box(10)))
        });
    }

    group.finish();
}

fn benchmark_full_engine(c: &mut Criterion) {
    use chrono::NaiveDate;
    use stockpipe_core::PriceBar;

    let bars: Vec<PriceBar> = (0..5000)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            let date =
                NaiveDate::from_ymd_opt(2005, 1, 1).unwrap() + chrono::Duration::days(i as i64);
            PriceBar::new("BENCH", date, close, close + 1.0, close - 1.0, close, 1_000_000)
        })
        .collect();

    c.bench_function("feature_engine_5000_bars", |b| {
        let engine = FeatureEngine::default();
        b.iter(|| engine.compute(black_box(&bars)))
    });
}

criterion_group!(
    benches,
    benchmark_rolling_mean,
    benchmark_rolling_std,
    benchmark_full_engine
);
criterion_main!(benches);
