//! Shared-cell atomic increments: both tiers alias one atomic cell.
//!
//! [`AtomicCounter`] makes the two tiers consistent *by construction*: the
//! primary and the cache entries for a key reference the same shared atomic
//! cell, so there is no separate "write to cache" step that could be
//! interleaved. One `fetch_add` is the whole update.
//!
//! The subtlety is cell creation. On first access the cell must be created
//! exactly once and installed under the key in *both* tiers, even when many
//! workers miss simultaneously. Both installations go through linearizable
//! create-if-absent, so concurrent first-accessors all converge on a single
//! winning cell: the primary tier decides the winner, and the cache tier
//! either installs that cell or yields to whichever cell was already there.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::store::{CounterCell, CounterStore, Key};
use crate::strategies::SyncStrategy;

/// Fetch-and-add on a single cell reachable from both tiers.
pub struct AtomicCounter {
    store: Arc<CounterStore>,
}

impl AtomicCounter {
    /// Creates the atomic-counter strategy over `store`.
    pub fn new(store: Arc<CounterStore>) -> Self {
        AtomicCounter { store }
    }

    /// Returns the cell aliased by both tiers for `key`, creating and
    /// aliasing it on first access.
    fn shared_cell(&self, key: Key) -> CounterCell {
        if let Some(cell) = self.store.cache().cell(key) {
            return cell;
        }
        // First accessors race here; the primary's create-if-absent picks
        // one winner and the cache aliases it (or keeps a concurrent
        // installer's cell, which traces back to the same winner).
        let cell = self.store.primary().cell_or_default(key);
        self.store.cache().cell_or_install(key, cell)
    }
}

impl SyncStrategy for AtomicCounter {
    fn name(&self) -> &'static str {
        "atomic"
    }

    /// Seeds one cell aliased by both tiers.
    ///
    /// Seeding independent cells would leave the primary frozen at the seed
    /// while only the cache advanced.
    fn seed(&self, key: Key, value: u64) {
        self.store.seed_shared(key, value);
    }

    fn increment(&self, key: Key) -> u64 {
        self.shared_cell(key).fetch_add(1, Ordering::Relaxed) + 1
    }
}
