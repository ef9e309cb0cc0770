//! Benchmarks for the idle task queue.
//!
//! Benchmarks cover:
//! - Registration and removal
//! - Partitioning and dispatch through `run`
//! - Multi-slice draining with a constrained budget
//! - Synchronous flush

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use idle_task_queue::core::{
    task_fn, FixedDeadline, IdleTaskQueue, SliceDeadline, TaskFn, TaskOptions,
};
use idle_task_queue::runtime::ManualIdleScheduler;

// ============================================================================
// Helper Functions
// ============================================================================

fn work(counter: &Arc<AtomicU64>) -> TaskFn {
    let counter = Arc::clone(counter);
    task_fn(move |_| {
        counter.fetch_add(1, Ordering::Relaxed);
    })
}

fn filled_queue(size: u64, deadline_every: u64) -> (IdleTaskQueue, Arc<ManualIdleScheduler>) {
    let idle = Arc::new(ManualIdleScheduler::new());
    let queue = IdleTaskQueue::new(idle.clone());
    let counter = Arc::new(AtomicU64::new(0));
    for i in 0..size {
        let mut options = TaskOptions::new().with_immediate(false);
        if deadline_every > 0 && i % deadline_every == 0 {
            options = options.with_deadline_ms(100);
        }
        queue.add(work(&counter), options);
    }
    (queue, idle)
}

// ============================================================================
// Queue Operations
// ============================================================================

fn bench_add_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_ops");

    for size in [100_u64, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("add", size), &size, |b, &size| {
            b.iter(|| black_box(filled_queue(size, 0)));
        });

        group.bench_with_input(BenchmarkId::new("remove_by_id", size), &size, |b, &size| {
            b.iter_batched(
                || filled_queue(size, 0).0,
                |queue| {
                    for id in (0..size).rev() {
                        black_box(queue.remove_by_id(id));
                    }
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// ============================================================================
// Dispatch
// ============================================================================

fn bench_run_and_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");

    for size in [100_u64, 1_000] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("run_single_slice", size), &size, |b, &size| {
            b.iter_batched(
                || filled_queue(size, 10),
                |(queue, idle)| {
                    queue.run();
                    idle.dispatch_pending(&FixedDeadline::unbounded());
                },
                criterion::BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("drain_timed_slices", size), &size, |b, &size| {
            b.iter_batched(
                || filled_queue(size, 0),
                |(queue, idle)| {
                    queue.run();
                    while idle.pending_len() > 0 {
                        idle.dispatch_pending(&SliceDeadline::starting_now(Duration::from_micros(50)));
                    }
                },
                criterion::BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("flush", size), &size, |b, &size| {
            b.iter_batched(
                || filled_queue(size, 10).0,
                |queue| queue.flush(),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_add_remove, bench_run_and_drain);
criterion_main!(benches);
