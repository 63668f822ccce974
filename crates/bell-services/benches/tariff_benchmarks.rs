//! Benchmarks for the tariff engine
//!
//! Run with: cargo bench --package bell-services

use bell_core::{config::FeesConfig, models::CallInterval};
use bell_services::tariff::price;
use chrono::{DateTime, Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn interval(start: &str, length: Duration) -> CallInterval {
    let started_at: DateTime<Utc> = start.parse().unwrap();
    CallInterval::new(started_at, started_at + length).unwrap()
}

/// Benchmark a short single-tier call
fn bench_short_call(c: &mut Criterion) {
    let schedule = FeesConfig::default().schedule().unwrap();
    let call = interval("2016-01-01T15:00:01Z", Duration::seconds(3036));

    c.bench_function("price_short_call", |b| {
        b.iter(|| price(black_box(&call), black_box(&schedule)));
    });
}

/// Benchmark calls spanning an increasing number of days
fn bench_multi_day(c: &mut Criterion) {
    let schedule = FeesConfig::default().schedule().unwrap();
    let mut group = c.benchmark_group("price_multi_day");

    for days in [1i64, 7, 30] {
        let call = interval("2017-12-13T21:57:13Z", Duration::days(days));
        group.throughput(Throughput::Elements(days as u64));
        group.bench_with_input(BenchmarkId::from_parameter(days), &call, |b, call| {
            b.iter(|| price(black_box(call), &schedule));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_short_call, bench_multi_day);

criterion_main!(benches);
