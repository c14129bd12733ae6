//! Submission and stealing throughput benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use taskloom::{Priority, ThreadPool};

/// Submits `n` trivial tasks to `pool` and waits for all of them.
fn submit_and_wait(pool: &ThreadPool, n: u64) {
    let counter = Arc::new(AtomicU64::new(0));
    for _ in 0..n {
        let counter = Arc::clone(&counter);
        pool.submit(move || {
            counter.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
    }
    pool.wait_all();
    black_box(counter.load(Ordering::Relaxed));
}

fn bench_submission_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("submission_throughput");
    group.throughput(Throughput::Elements(1000));

    for workers in [1, 2, 4, 8] {
        let pool = ThreadPool::new(workers).unwrap();
        group.bench_function(format!("{workers}_workers"), |b| {
            b.iter(|| submit_and_wait(&pool, 1000));
        });
    }

    group.finish();
}

/// Deliberately funnels every submission through worker 0's local deque (by
/// submitting from a single caller, which is what `submit`'s round-robin
/// counter already does across calls) so every other worker must steal to
/// find work, isolating the cost of the steal path.
fn bench_steal_heavy_workload(c: &mut Criterion) {
    let mut group = c.benchmark_group("steal_heavy_workload");
    group.throughput(Throughput::Elements(500));

    let pool = ThreadPool::new(8).unwrap();
    group.bench_function("8_workers", |b| {
        b.iter(|| {
            let counter = Arc::new(AtomicU64::new(0));
            for _ in 0..500u32 {
                let counter = Arc::clone(&counter);
                pool.submit_priority(Priority::Low, move || {
                    counter.fetch_add(1, Ordering::Relaxed);
                })
                .unwrap();
            }
            pool.wait_all();
            black_box(counter.load(Ordering::Relaxed));
        });
    });

    group.finish();
}

fn bench_high_priority_latency(c: &mut Criterion) {
    let pool = ThreadPool::new(4).unwrap();
    let mut group = c.benchmark_group("high_priority_latency");
    group.throughput(Throughput::Elements(1));

    group.bench_function("single_high_task", |b| {
        b.iter(|| {
            let handle = pool.submit_priority(Priority::High, || 1u64).unwrap();
            black_box(handle.join().unwrap());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_submission_throughput,
    bench_steal_heavy_workload,
    bench_high_priority_latency
);
criterion_main!(benches);
