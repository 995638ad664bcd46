//! Benchmarks for indicator implementations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use meanrev_core::traits::{Indicator, IndicatorProvider};
use meanrev_core::types::Bar;
use meanrev_indicators::{Atr, Ema, Rsi, StandardIndicators};

fn generate_bars(size: usize) -> Vec<Bar> {
    (0..size)
        .map(|i| {
            let price = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            Bar::new(i as i64 * 900_000, price, price + 0.8, price - 0.8, price)
        })
        .collect()
}

fn benchmark_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("single");

    for size in [1000, 10000, 100000].iter() {
        let bars = generate_bars(*size);
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        group.bench_with_input(BenchmarkId::new("ema50", size), &closes, |b, data| {
            let ema = Ema::new(50);
            b.iter(|| ema.calculate(black_box(data)))
        });

        group.bench_with_input(BenchmarkId::new("rsi14", size), &closes, |b, data| {
            let rsi = Rsi::new(14);
            b.iter(|| rsi.calculate(black_box(data)))
        });

        group.bench_with_input(BenchmarkId::new("atr14", size), &bars, |b, bars| {
            let atr = Atr::new(14);
            b.iter(|| atr.calculate_bars(black_box(bars)))
        });
    }

    group.finish();
}

fn benchmark_provider(c: &mut Criterion) {
    let mut group = c.benchmark_group("provider");
    let provider = StandardIndicators::default();

    for size in [1000, 10000, 100000].iter() {
        let bars = generate_bars(*size);
        group.bench_with_input(BenchmarkId::new("standard", size), &bars, |b, bars| {
            b.iter(|| provider.compute(black_box(bars)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_single, benchmark_provider);
criterion_main!(benches);
