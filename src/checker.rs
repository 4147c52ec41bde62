//! Cross-tier consistency probe.
//!
//! [`ConsistencyChecker`] compares the primary and cache values for a key and
//! reports whether they agree. It is strictly read-only and therefore safe to
//! call while increments are in flight, but a mid-trial probe only yields a
//! transient snapshot — divergence observed before the workers have quiesced
//! is not a correctness verdict (the cas-loop strategy legitimately skews the
//! tiers for a moment on every call).

use std::sync::Arc;

use tracing::warn;

use crate::store::{CounterStore, Key};

/// Read-only comparator over the two tiers of a [`CounterStore`].
pub struct ConsistencyChecker {
    store: Arc<CounterStore>,
}

impl ConsistencyChecker {
    /// Creates a checker over `store`.
    pub fn new(store: Arc<CounterStore>) -> Self {
        ConsistencyChecker { store }
    }

    /// Returns whether the primary and cache values for `key` are equal,
    /// emitting a structured warning naming both values when they differ.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use contesa::checker::ConsistencyChecker;
    /// use contesa::store::CounterStore;
    ///
    /// let store = Arc::new(CounterStore::new());
    /// store.seed(1, 10);
    ///
    /// let checker = ConsistencyChecker::new(Arc::clone(&store));
    /// assert!(checker.check(1));
    ///
    /// store.primary().put(1, 11);
    /// assert!(!checker.check(1));
    /// ```
    pub fn check(&self, key: Key) -> bool {
        let primary = self.store.primary_value(key);
        let cache = self.store.cache_value(key);
        if primary != cache {
            warn!(key, primary, cache, "tier divergence detected");
            return false;
        }
        true
    }
}
