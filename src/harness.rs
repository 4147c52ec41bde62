//! Concurrent workload driver.
//!
//! [`LoadHarness`] applies a fixed volume of increments to one key from many
//! concurrent workers: `threads` OS threads, each issuing `calls_per_thread`
//! back-to-back [`increment`](crate::strategies::SyncStrategy::increment)
//! calls with no inter-call delay. A start barrier releases every worker at
//! once so the measured wall-clock window covers only the fully-concurrent
//! phase, never thread spawning or teardown.
//!
//! # The issued-call tally
//!
//! The harness maintains its own tally, bumped once per completed `increment`
//! call on an atomic counter the strategy under test never sees. For any run
//! that completes, the tally must equal `threads × calls_per_thread` — that
//! property validates the harness itself delivered the intended call volume,
//! independent of whatever the strategy did with those calls. The tally is
//! created fresh per run, written only by workers during the concurrent
//! phase, and read only after the join.
//!
//! # Timeouts
//!
//! Completion waits are bounded (10 seconds by default). A run that exceeds
//! the bound is reported as *timed out* rather than hanging forever: the
//! workers are left detached (threads cannot be cancelled mid-call) and the
//! report's counters are in an undefined intermediate state — callers must
//! not derive consistency verdicts from them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_utils::CachePadded;
use tracing::warn;

use crate::store::Key;
use crate::strategies::SyncStrategy;

/// Default upper bound on the completion wait.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Raw measurement of one harness run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkloadReport {
    /// Number of `increment` calls that completed, per the harness's own
    /// tally. Undefined when `timed_out` is set.
    pub issued: u64,
    /// Wall-clock duration of the concurrent phase.
    pub elapsed: Duration,
    /// Whether the run exceeded the completion bound.
    pub timed_out: bool,
}

/// Drives a strategy with a fixed concurrent workload.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use contesa::harness::LoadHarness;
/// use contesa::store::CounterStore;
/// use contesa::strategies::StrategyKind;
///
/// let store = Arc::new(CounterStore::new());
/// let strategy = StrategyKind::Atomic.build(Arc::clone(&store));
///
/// let report = LoadHarness::new().run(strategy, 1, 4, 250);
/// assert!(!report.timed_out);
/// assert_eq!(report.issued, 1000);
/// assert_eq!(store.primary_value(1), 1000);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LoadHarness {
    timeout: Duration,
}

impl LoadHarness {
    /// Creates a harness with the default completion bound.
    pub const fn new() -> Self {
        LoadHarness {
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the completion bound, returning `self` for method chaining.
    pub const fn with_timeout(self, timeout: Duration) -> Self {
        LoadHarness { timeout }
    }

    /// Runs `threads × calls_per_thread` increments of `key` against
    /// `strategy` and reports the measurement.
    ///
    /// With `threads == 0` or `calls_per_thread == 0` no worker is spawned
    /// and the report is all-zero.
    pub fn run(
        &self,
        strategy: Arc<dyn SyncStrategy>,
        key: Key,
        threads: usize,
        calls_per_thread: usize,
    ) -> WorkloadReport {
        if threads == 0 || calls_per_thread == 0 {
            return WorkloadReport {
                issued: 0,
                elapsed: Duration::ZERO,
                timed_out: false,
            };
        }

        let issued = Arc::new(CachePadded::new(AtomicU64::new(0)));
        let barrier = Arc::new(Barrier::new(threads + 1));
        let (done_tx, done_rx) = mpsc::channel();

        let mut handles = Vec::with_capacity(threads);
        for _ in 0..threads {
            let strategy = Arc::clone(&strategy);
            let issued = Arc::clone(&issued);
            let barrier = Arc::clone(&barrier);
            let done = done_tx.clone();
            handles.push(thread::spawn(move || {
                barrier.wait();
                for _ in 0..calls_per_thread {
                    strategy.increment(key);
                    issued.fetch_add(1, Ordering::Relaxed);
                }
                let _ = done.send(());
            }));
        }
        drop(done_tx);

        // Release every worker at once; the clock starts here.
        barrier.wait();
        let start = Instant::now();
        let deadline = start + self.timeout;

        let mut finished = 0;
        while finished < threads {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match done_rx.recv_timeout(remaining) {
                Ok(()) => finished += 1,
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    // A disconnect without a completion means a worker died;
                    // either way the run did not finish within the bound.
                    warn!(
                        strategy = strategy.name(),
                        key,
                        finished,
                        threads,
                        timeout_ms = self.timeout.as_millis() as u64,
                        "workload timed out; counters are undefined"
                    );
                    return WorkloadReport {
                        issued: issued.load(Ordering::Relaxed),
                        elapsed: start.elapsed(),
                        timed_out: true,
                    };
                }
            }
        }
        let elapsed = start.elapsed();

        // All completions arrived; the joins are immediate.
        for handle in handles {
            let _ = handle.join();
        }

        WorkloadReport {
            issued: issued.load(Ordering::Relaxed),
            elapsed,
            timed_out: false,
        }
    }
}

impl Default for LoadHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CounterStore;
    use crate::strategies::StrategyKind;

    /// Strategy that parks every call long enough to trip a short timeout.
    struct Stalled;

    impl SyncStrategy for Stalled {
        fn name(&self) -> &'static str {
            "stalled"
        }
        fn seed(&self, _key: Key, _value: u64) {}
        fn increment(&self, _key: Key) -> u64 {
            thread::sleep(Duration::from_secs(60));
            0
        }
    }

    #[test]
    fn test_zero_threads_spawns_nothing() {
        let store = Arc::new(CounterStore::new());
        let strategy = StrategyKind::Atomic.build(Arc::clone(&store));
        strategy.seed(1, 7);

        let report = LoadHarness::new().run(strategy, 1, 0, 100);
        assert_eq!(report.issued, 0);
        assert!(!report.timed_out);
        // Tiers keep the seed untouched.
        assert_eq!(store.primary_value(1), 7);
        assert_eq!(store.cache_value(1), 7);
    }

    #[test]
    fn test_zero_calls_spawns_nothing() {
        let store = Arc::new(CounterStore::new());
        let strategy = StrategyKind::GlobalLock.build(Arc::clone(&store));
        let report = LoadHarness::new().run(strategy, 1, 8, 0);
        assert_eq!(report.issued, 0);
        assert!(!report.timed_out);
    }

    #[test]
    fn test_tally_equals_call_volume_for_every_strategy() {
        for kind in StrategyKind::ALL {
            let store = Arc::new(CounterStore::new());
            let strategy = kind.build(store);
            strategy.seed(1, 0);
            let report = LoadHarness::new().run(strategy, 1, 4, 250);
            assert!(!report.timed_out, "strategy {}", kind);
            assert_eq!(report.issued, 1000, "strategy {}", kind);
        }
    }

    #[test]
    fn test_single_worker_single_call() {
        let store = Arc::new(CounterStore::new());
        let strategy = StrategyKind::Unsynchronized.build(Arc::clone(&store));
        strategy.seed(1, 0);

        let report = LoadHarness::new().run(strategy, 1, 1, 1);
        assert_eq!(report.issued, 1);
        assert_eq!(store.primary_value(1), 1);
        assert_eq!(store.cache_value(1), 1);
    }

    #[test]
    fn test_timeout_is_reported_not_hung() {
        let harness = LoadHarness::new().with_timeout(Duration::from_millis(50));
        let report = harness.run(Arc::new(Stalled), 1, 2, 1);
        assert!(report.timed_out);
        assert!(report.elapsed >= Duration::from_millis(50));
    }

    #[test]
    fn test_elapsed_is_nonzero_for_real_work() {
        let store = Arc::new(CounterStore::new());
        let strategy = StrategyKind::PerKeyLock.build(store);
        strategy.seed(1, 0);
        let report = LoadHarness::new().run(strategy, 1, 4, 1000);
        assert!(report.elapsed > Duration::ZERO);
    }
}
