//! Two-tier in-memory counter store.
//!
//! This module provides [`CounterStore`], a passive holder of two counter
//! mappings: the authoritative **primary** tier and a derived **cache** tier
//! that is supposed to mirror it. The store enforces no concurrency policy of
//! its own — how the two tiers are kept consistent (or allowed to diverge) is
//! entirely the business of the installed [`SyncStrategy`](crate::strategies::SyncStrategy).
//!
//! # Cell representation
//!
//! Each tier maps a [`Key`] to a shared atomic cell
//! (`Arc<CachePadded<AtomicU64>>`). This single representation supports both
//! consistency models the strategies need:
//!
//! - **Value semantics**: [`Tier::put`] replaces the cell wholesale, so a
//!   write is an independent publication that can overwrite a concurrent
//!   writer's cell. This models a plain `map.insert(key, value)` tier.
//! - **Shared aliasing**: [`Tier::install`] and [`Tier::cell_or_install`]
//!   place the *same* cell in both tiers, so an atomic update through either
//!   name is observed through both. The atomic-counter strategy relies on
//!   this aliasing for its consistency guarantee.
//!
//! Cells are wrapped in [`CachePadded`] so that hot cells for unrelated keys
//! do not share a cache line.
//!
//! # Create-if-absent
//!
//! First access to a key must be race-free even when many workers miss at
//! once. All lazy creation goes through `DashMap`'s `entry` API, which is
//! linearizable: concurrent first-accessors agree on a single winning cell.
//! A check-then-create sequence would itself be a race and is never used.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_utils::CachePadded;
use dashmap::DashMap;

/// Opaque identifier naming one counter. No ordering semantics.
pub type Key = u64;

/// A shared atomic counter cell, reachable from one or both tiers.
pub type CounterCell = Arc<CachePadded<AtomicU64>>;

fn new_cell(value: u64) -> CounterCell {
    Arc::new(CachePadded::new(AtomicU64::new(value)))
}

/// One counter tier: a concurrent mapping from [`Key`] to an atomic cell.
///
/// Entries are created lazily on first access; a key that was never written
/// reads as 0 through [`Tier::value`].
#[derive(Debug)]
pub struct Tier {
    name: &'static str,
    cells: DashMap<Key, CounterCell>,
}

impl Tier {
    fn new(name: &'static str) -> Self {
        Tier {
            name,
            cells: DashMap::new(),
        }
    }

    /// Returns the tier's name (`"primary"` or `"cache"`), used in diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Reads the current value for `key`, or `None` if the key has no entry.
    ///
    /// The load itself is atomic; what it composes into is up to the caller.
    #[inline]
    pub fn read(&self, key: Key) -> Option<u64> {
        self.cells.get(&key).map(|cell| cell.load(Ordering::Relaxed))
    }

    /// Reads the current value for `key`, defaulting to 0 when absent.
    #[inline]
    pub fn value(&self, key: Key) -> u64 {
        self.read(key).unwrap_or(0)
    }

    /// Publishes `value` under `key` with value semantics: the previous cell
    /// is replaced, severing any aliasing it had with the other tier.
    ///
    /// Two concurrent `put`s race exactly like two `map.insert` calls — last
    /// writer wins, the loser's value is silently dropped.
    #[inline]
    pub fn put(&self, key: Key, value: u64) {
        self.cells.insert(key, new_cell(value));
    }

    /// Returns the cell currently installed under `key`, if any.
    #[inline]
    pub fn cell(&self, key: Key) -> Option<CounterCell> {
        self.cells.get(&key).map(|cell| Arc::clone(cell.value()))
    }

    /// Returns the cell for `key`, creating a zero cell if absent.
    ///
    /// Creation is linearizable: concurrent callers all receive the same
    /// winning cell.
    #[inline]
    pub fn cell_or_default(&self, key: Key) -> CounterCell {
        Arc::clone(self.cells.entry(key).or_insert_with(|| new_cell(0)).value())
    }

    /// Installs `cell` under `key` unless an entry already exists, returning
    /// whichever cell won. Used to alias one cell from both tiers.
    #[inline]
    pub fn cell_or_install(&self, key: Key, cell: CounterCell) -> CounterCell {
        Arc::clone(self.cells.entry(key).or_insert(cell).value())
    }

    /// Unconditionally installs `cell` under `key`. Setup only.
    pub fn install(&self, key: Key, cell: CounterCell) {
        self.cells.insert(key, cell);
    }

    fn clear(&self) {
        self.cells.clear();
    }
}

/// Passive holder of the primary and cache counter tiers.
///
/// The store exposes reads, seeding, and reset; it never mutates both tiers
/// atomically itself. That responsibility belongs entirely to the installed
/// strategy.
///
/// # Examples
///
/// ```rust
/// use contesa::store::CounterStore;
///
/// let store = CounterStore::new();
/// assert_eq!(store.primary_value(7), 0);
///
/// store.seed(7, 100);
/// assert_eq!(store.primary_value(7), 100);
/// assert_eq!(store.cache_value(7), 100);
///
/// store.reset();
/// assert_eq!(store.primary_value(7), 0);
/// ```
#[derive(Debug)]
pub struct CounterStore {
    primary: Tier,
    cache: Tier,
}

impl CounterStore {
    /// Creates an empty store with both tiers unpopulated.
    pub fn new() -> Self {
        CounterStore {
            primary: Tier::new("primary"),
            cache: Tier::new("cache"),
        }
    }

    /// The authoritative tier.
    #[inline]
    pub fn primary(&self) -> &Tier {
        &self.primary
    }

    /// The derived tier that is supposed to mirror the primary.
    #[inline]
    pub fn cache(&self) -> &Tier {
        &self.cache
    }

    /// Reads the primary value for `key` (0 when absent).
    #[inline]
    pub fn primary_value(&self, key: Key) -> u64 {
        self.primary.value(key)
    }

    /// Reads the cache value for `key` (0 when absent).
    #[inline]
    pub fn cache_value(&self, key: Key) -> u64 {
        self.cache.value(key)
    }

    /// Seeds `key` with `value` as two *independent* cells, one per tier.
    ///
    /// Setup only; never called during the concurrent phase.
    pub fn seed(&self, key: Key, value: u64) {
        self.primary.install(key, new_cell(value));
        self.cache.install(key, new_cell(value));
    }

    /// Seeds `key` with `value` as a *single* cell aliased by both tiers.
    ///
    /// After this call an atomic update through either tier is visible
    /// through both. Setup only.
    pub fn seed_shared(&self, key: Key, value: u64) {
        let cell = new_cell(value);
        self.primary.install(key, Arc::clone(&cell));
        self.cache.install(key, cell);
    }

    /// Clears all entries from both tiers.
    pub fn reset(&self) {
        self.primary.clear();
        self.cache.clear();
    }
}

impl Default for CounterStore {
    fn default() -> Self {
        Self::new()
    }
}
