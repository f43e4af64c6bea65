//! Benchmarks for the schedule projector
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use cyclefit::schedule::{month_load, parse_date, project, CyclePlan};

fn bench_project(c: &mut Criterion) {
    let mut group = c.benchmark_group("project");
    let start = parse_date("2026-02-01");

    for horizon in [21u32, 365, 3650] {
        group.throughput(Throughput::Elements(u64::from(horizon)));

        group.bench_function(format!("horizon_{}", horizon), |b| {
            b.iter(|| project(black_box(start), black_box(3), black_box(2), horizon))
        });
    }

    group.finish();
}

fn bench_month_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("month_load");

    for count in [1usize, 10, 100] {
        let plans: Vec<CyclePlan> = (0..count)
            .filter_map(|i| {
                let start = parse_date("2026-01-01")?;
                Some(CyclePlan::new(start, 1 + (i % 5) as u32, (i % 3) as u32))
            })
            .collect();

        group.bench_function(format!("plans_{}", count), |b| {
            b.iter(|| month_load(black_box(&plans), 2026, 3))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_project, bench_month_load);
criterion_main!(benches);
