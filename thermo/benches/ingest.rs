//! Microbenchmarks for ingestion and report generation.
//!
//! Run with: `cargo bench -p thermo`

#![allow(missing_docs)]

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use thermo::{Day, FixedClock, ReadConsistency, ReportBuilder, Store};

/// Creates a store with `sensor_count` sensors, each holding `per_day`
/// readings on every day of the week ending at `as_of`.
fn setup_store(sensor_count: u32, per_day: i64, as_of: Day) -> Store {
    let store = Store::with_clock(Arc::new(FixedClock::new(as_of)));

    for sensor in 0..sensor_count {
        let name = format!("sensor_{sensor}");
        for back in 0..8 {
            let day = as_of.days_before(back).unwrap();
            for reading in 0..per_day {
                store.ingest_on(&name, day, reading - 20);
            }
        }
    }

    store
}

fn bench_ingest_existing_bucket(c: &mut Criterion) {
    let as_of = Day::parse("2024-03-10").unwrap();
    let store = setup_store(1, 1, as_of);

    c.bench_function("ingest/existing_bucket", |b| {
        b.iter(|| {
            store.ingest(black_box("sensor_0"), black_box(21));
        });
    });
}

fn bench_ingest_many_sensors(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest/sensor_count");
    let as_of = Day::parse("2024-03-10").unwrap();

    for count in [1u32, 10, 100] {
        let store = setup_store(count, 1, as_of);
        let names: Vec<String> = (0..count).map(|i| format!("sensor_{i}")).collect();

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                for name in &names {
                    store.ingest(black_box(name), black_box(18));
                }
            });
        });
    }

    group.finish();
}

fn bench_reports(c: &mut Criterion) {
    let mut group = c.benchmark_group("report");
    let as_of = Day::parse("2024-03-10").unwrap();
    let store = setup_store(30, 24, as_of);

    for (label, consistency) in [
        ("per_lookup", ReadConsistency::PerLookup),
        ("snapshot", ReadConsistency::Snapshot),
    ] {
        let builder = ReportBuilder::new(&store).consistency(consistency);

        group.bench_function(BenchmarkId::new("daily", label), |b| {
            b.iter(|| builder.daily(black_box("2024-03-10")));
        });
        group.bench_function(BenchmarkId::new("weekly", label), |b| {
            b.iter(|| builder.weekly(black_box("2024-03-10")));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_ingest_existing_bucket,
    bench_ingest_many_sensors,
    bench_reports,
);
criterion_main!(benches);
