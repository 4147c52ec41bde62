//! The race-prone baseline: no synchronization at all.
//!
//! [`Unsynchronized`] performs the increment as four separate map operations,
//! each individually well-defined but collectively unprotected:
//!
//! 1. read the cache value (on a miss, populate it from the primary — a step
//!    that is itself not atomic with the increment that follows),
//! 2. compute `value + 1`,
//! 3. publish to the primary,
//! 4. publish to the cache.
//!
//! Any other worker on the same key can interleave between any two of these
//! steps. Two workers that read the same stale value both publish the same
//! successor, and one increment vanishes. Because steps 3 and 4 are not
//! mutually atomic either, the two tiers can also end up disagreeing with
//! each other.
//!
//! The expected end state under contention is therefore `primary < expected`
//! and/or `cache < expected`, possibly with `primary != cache`. This is the
//! behavior the harness exists to surface statistically — a single clean run
//! proves nothing.

use std::sync::Arc;

use tracing::debug;

use crate::store::{CounterStore, Key};
use crate::strategies::SyncStrategy;

/// Read-modify-write over both tiers with no synchronization.
pub struct Unsynchronized {
    store: Arc<CounterStore>,
}

impl Unsynchronized {
    /// Creates the baseline strategy over `store`.
    pub fn new(store: Arc<CounterStore>) -> Self {
        Unsynchronized { store }
    }
}

impl SyncStrategy for Unsynchronized {
    fn name(&self) -> &'static str {
        "unsynchronized"
    }

    fn seed(&self, key: Key, value: u64) {
        self.store.seed(key, value);
    }

    fn increment(&self, key: Key) -> u64 {
        let current = match self.store.cache().read(key) {
            Some(value) => value,
            None => {
                // Populate-on-miss: load from the primary, publish to the
                // cache. Not atomic with the increment below.
                let value = self.store.primary().value(key);
                self.store.cache().put(key, value);
                debug!(key, loaded = value, "cache miss, populated from primary");
                value
            }
        };

        // Another worker can interleave anywhere from here on.
        let next = current + 1;
        self.store.primary().put(key, next);
        self.store.cache().put(key, next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_increments_are_exact() {
        let store = Arc::new(CounterStore::new());
        let strategy = Unsynchronized::new(Arc::clone(&store));
        strategy.seed(1, 0);

        for expected in 1..=10 {
            assert_eq!(strategy.increment(1), expected);
        }
        assert_eq!(store.primary_value(1), 10);
        assert_eq!(store.cache_value(1), 10);
    }

    #[test]
    fn test_populate_on_miss_defaults_to_zero() {
        let store = Arc::new(CounterStore::new());
        let strategy = Unsynchronized::new(Arc::clone(&store));

        // No seed: first access creates the entry from an absent primary.
        assert_eq!(strategy.increment(9), 1);
        assert_eq!(store.primary_value(9), 1);
        assert_eq!(store.cache_value(9), 1);
    }

    #[test]
    fn test_populate_on_miss_loads_primary() {
        let store = Arc::new(CounterStore::new());
        let strategy = Unsynchronized::new(Arc::clone(&store));

        // Primary has a value the cache never saw.
        store.primary().put(3, 40);
        assert_eq!(strategy.increment(3), 41);
        assert_eq!(store.cache_value(3), 41);
    }

    #[test]
    fn test_seeded_start() {
        let store = Arc::new(CounterStore::new());
        let strategy = Unsynchronized::new(Arc::clone(&store));
        strategy.seed(1, 50);
        assert_eq!(strategy.increment(1), 51);
    }
}
