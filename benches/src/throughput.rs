use std::convert::Infallible;
use std::thread;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use orderly::prelude::*;
use rayon::prelude::*;

const ITEMS: u64 = 64;

/// Stand-in for a call that mostly waits, such as a subprocess
fn blocking_work(n: u64) -> u64 {
    thread::sleep(Duration::from_micros(200));
    n * 2
}

/// Sequential loop vs orderly vs rayon on wait-bound work
fn bench_sleep_bound_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("sleep_bound_map");
    group.sample_size(20);

    group.bench_function("sequential", |b| {
        b.iter(|| {
            let mapped: Vec<u64> = (0..ITEMS).map(blocking_work).collect();
            black_box(mapped)
        })
    });

    for workers in [2, 4, 8, 16] {
        group.bench_with_input(BenchmarkId::new("orderly_map", workers), &workers, |b, &workers| {
            b.iter(|| {
                let mapped = (0..ITEMS)
                    .in_threads(workers)
                    .unwrap()
                    .map(|n| Ok::<_, Infallible>(blocking_work(n)))
                    .unwrap()
                    .into_value();
                black_box(mapped)
            })
        });

        group.bench_with_input(BenchmarkId::new("orderly_each", workers), &workers, |b, &workers| {
            b.iter(|| {
                (0..ITEMS)
                    .in_threads(workers)
                    .unwrap()
                    .each(|n| {
                        black_box(blocking_work(n));
                        Ok::<_, Infallible>(())
                    })
                    .unwrap()
            })
        });

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .unwrap();
        group.bench_with_input(BenchmarkId::new("rayon", workers), &workers, |b, _| {
            b.iter(|| {
                let mapped: Vec<u64> =
                    pool.install(|| (0..ITEMS).into_par_iter().map(blocking_work).collect());
                black_box(mapped)
            })
        });
    }

    group.finish();
}

/// Cost of an early exit: how quickly `any` returns once a hit is found
fn bench_short_circuit(c: &mut Criterion) {
    let mut group = c.benchmark_group("short_circuit");
    group.sample_size(20);

    for hit in [0, 16, 48] {
        group.bench_with_input(BenchmarkId::new("orderly_any", hit), &hit, |b, &hit| {
            b.iter(|| {
                (0..ITEMS)
                    .in_threads(8)
                    .unwrap()
                    .any(|n| Ok::<_, Infallible>(blocking_work(n) == hit * 2))
                    .unwrap()
                    .into_value()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sleep_bound_map, bench_short_circuit);
criterion_main!(benches);
