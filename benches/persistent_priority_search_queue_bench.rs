//! Benchmark for PersistentPrioritySearchQueue.
//!
//! Compares the queue against `BTreeMap` for map operations and against
//! `BinaryHeap` for priority operations, and measures the combined
//! key-range and priority-ceiling query against a filtered scan.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pennant::persistent::PersistentPrioritySearchQueue;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

fn priority_of(key: i32) -> i32 {
    (key * 7919) % 1009
}

fn build_queue(size: i32) -> PersistentPrioritySearchQueue<i32, i32> {
    (0..size).map(|key| (key, priority_of(key))).collect()
}

// =============================================================================
// insert Benchmark
// =============================================================================

fn benchmark_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("insert");

    for size in [100, 1000, 10000] {
        group.bench_with_input(
            BenchmarkId::new("PersistentPrioritySearchQueue", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut queue = PersistentPrioritySearchQueue::new();
                    for key in 0..size {
                        queue = queue.insert(black_box(key), black_box(priority_of(key)));
                    }
                    black_box(queue)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = BTreeMap::new();
                    for key in 0..size {
                        map.insert(black_box(key), black_box(priority_of(key)));
                    }
                    black_box(map)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// get Benchmark
// =============================================================================

fn benchmark_get(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("get");

    for size in [100, 1000, 10000] {
        let queue = build_queue(size);
        let standard_map: BTreeMap<i32, i32> =
            (0..size).map(|key| (key, priority_of(key))).collect();

        group.bench_with_input(
            BenchmarkId::new("PersistentPrioritySearchQueue", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut sum = 0;
                    for key in 0..size {
                        if let Some(&priority) = queue.get(&black_box(key)) {
                            sum += priority;
                        }
                    }
                    black_box(sum)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut sum = 0;
                    for key in 0..size {
                        if let Some(&priority) = standard_map.get(&black_box(key)) {
                            sum += priority;
                        }
                    }
                    black_box(sum)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// pop_min Benchmark
// =============================================================================

fn benchmark_pop_min(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("pop_min");

    for size in [100, 1000, 10000] {
        let queue = build_queue(size);
        let heap: BinaryHeap<Reverse<(i32, i32)>> = (0..size)
            .map(|key| Reverse((priority_of(key), key)))
            .collect();

        group.bench_with_input(
            BenchmarkId::new("PersistentPrioritySearchQueue", size),
            &queue,
            |bencher, queue| {
                bencher.iter(|| {
                    let mut current = queue.clone();
                    let mut sum = 0;
                    while let Some((rest, (_, priority))) = current.pop_min() {
                        sum += priority;
                        current = rest;
                    }
                    black_box(sum)
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("BinaryHeap", size), &heap, |bencher, heap| {
            bencher.iter(|| {
                let mut current = heap.clone();
                let mut sum = 0;
                while let Some(Reverse((priority, _))) = current.pop() {
                    sum += priority;
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

// =============================================================================
// at_most_range Benchmark
// =============================================================================

fn benchmark_at_most_range(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("at_most_range");

    for size in [100, 1000, 10000] {
        let queue = build_queue(size);
        let standard_map: BTreeMap<i32, i32> =
            (0..size).map(|key| (key, priority_of(key))).collect();

        let range_start = size / 4;
        let range_end = size * 3 / 4;
        let ceiling = 50;

        group.bench_with_input(
            BenchmarkId::new("PersistentPrioritySearchQueue", size),
            &size,
            |bencher, _| {
                bencher.iter(|| {
                    let count = queue
                        .at_most_range(black_box(range_start)..black_box(range_end), ceiling)
                        .count();
                    black_box(count)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap_filter", size),
            &size,
            |bencher, _| {
                bencher.iter(|| {
                    let count = standard_map
                        .range(black_box(range_start)..black_box(range_end))
                        .filter(|(_, priority)| **priority <= ceiling)
                        .count();
                    black_box(count)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// split_by_key Benchmark
// =============================================================================

fn benchmark_split_by_key(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("split_by_key");

    for size in [100, 1000, 10000] {
        let queue = build_queue(size);

        group.bench_with_input(
            BenchmarkId::new("PersistentPrioritySearchQueue", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let (below, found, above) = queue.split_by_key(&black_box(size / 2));
                    black_box((below.len(), found, above.len()))
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_get,
    benchmark_pop_min,
    benchmark_at_most_range,
    benchmark_split_by_key
);

criterion_main!(benches);
