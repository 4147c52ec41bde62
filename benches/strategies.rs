use std::sync::Arc;
use std::thread;

use contesa::store::CounterStore;
use contesa::strategies::{StrategyKind, SyncStrategy};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const NUM_THREADS: usize = 8;
const CALLS_PER_THREAD: usize = 10_000;
const KEY: u64 = 1;

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("tiered_increment");

    for kind in StrategyKind::ALL {
        group.bench_function(
            BenchmarkId::new(
                kind.label(),
                format!("{}threads x {}iter", NUM_THREADS, CALLS_PER_THREAD),
            ),
            move |b| {
                b.iter(|| {
                    let store = Arc::new(CounterStore::new());
                    let strategy = kind.build(Arc::clone(&store));
                    strategy.seed(KEY, 0);

                    let mut handles = vec![];
                    for _ in 0..NUM_THREADS {
                        let strategy = Arc::clone(&strategy);
                        handles.push(thread::spawn(move || {
                            for _ in 0..CALLS_PER_THREAD {
                                strategy.increment(KEY);
                            }
                        }));
                    }
                    for handle in handles {
                        handle.join().unwrap();
                    }

                    black_box(store.primary_value(KEY))
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_strategies);
criterion_main!(benches);
