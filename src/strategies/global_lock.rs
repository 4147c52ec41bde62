//! One process-wide mutex around every increment.
//!
//! [`GlobalLock`] is the sledgehammer: a single mutex guards the whole update
//! sequence for *any* key, serializing all traffic regardless of whether the
//! keys are related. Correct by the same argument as the per-key variant,
//! and the worst-case throughput variant by construction — it exists as the
//! lower bound the other strategies are measured against.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::store::{CounterStore, Key};
use crate::strategies::SyncStrategy;

/// Serializes every update behind one mutex.
pub struct GlobalLock {
    store: Arc<CounterStore>,
    gate: Mutex<()>,
}

impl GlobalLock {
    /// Creates the global-lock strategy over `store`.
    pub fn new(store: Arc<CounterStore>) -> Self {
        GlobalLock {
            store,
            gate: Mutex::new(()),
        }
    }
}

impl SyncStrategy for GlobalLock {
    fn name(&self) -> &'static str {
        "global-lock"
    }

    fn seed(&self, key: Key, value: u64) {
        self.store.seed(key, value);
    }

    fn increment(&self, key: Key) -> u64 {
        let _guard = self.gate.lock();

        let next = self.store.primary().value(key) + 1;
        self.store.primary().put(key, next);
        self.store.cache().put(key, next);
        next
    }
}
