//! Synchronization strategies for tiered counter increments.
//!
//! A strategy encapsulates how a single logical increment — "read the current
//! value, add one, publish to both the primary store and the cache" — is
//! performed, and therefore how (or whether) the two tiers stay consistent
//! under concurrent load. Everything above this seam ([`LoadHarness`],
//! [`ConsistencyChecker`], [`ExperimentRunner`]) depends only on the
//! [`SyncStrategy`] trait, never on a concrete variant, so every strategy is
//! exercised through identical harness code.
//!
//! [`LoadHarness`]: crate::harness::LoadHarness
//! [`ConsistencyChecker`]: crate::checker::ConsistencyChecker
//! [`ExperimentRunner`]: crate::runner::ExperimentRunner
//!
//! # Available strategies
//!
//! | Variant | Mechanism | Correct? |
//! |---------|-----------|----------|
//! | [`Unsynchronized`] | four independent map operations | no — loses updates, tiers diverge |
//! | [`AtomicCounter`] | one fetch-and-add on a cell aliased by both tiers | yes |
//! | [`CasLoop`] | compare-exchange retry loop per tier | yes (transient cross-tier skew) |
//! | [`PerKeyLock`] | per-key mutex around the full sequence | yes |
//! | [`GlobalLock`] | one process-wide mutex around the full sequence | yes |
//!
//! ```text
//!                 ┌──────────────────────────────┐
//!   increment(k) ─►  SyncStrategy (trait object) │
//!                 └──────────────┬───────────────┘
//!                        ┌───────┴────────┐
//!                        ▼                ▼
//!                  primary tier      cache tier
//!                 (authoritative)   (should mirror)
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use contesa::store::CounterStore;
//! use contesa::strategies::{StrategyKind, SyncStrategy};
//!
//! let store = Arc::new(CounterStore::new());
//! let strategy = StrategyKind::Atomic.build(Arc::clone(&store));
//!
//! strategy.seed(1, 0);
//! assert_eq!(strategy.increment(1), 1);
//! assert_eq!(strategy.increment(1), 2);
//! assert_eq!(store.primary_value(1), store.cache_value(1));
//! ```

mod atomic;
mod cas_loop;
mod global_lock;
mod per_key_lock;
mod unsynchronized;

pub use atomic::AtomicCounter;
pub use cas_loop::CasLoop;
pub use global_lock::GlobalLock;
pub use per_key_lock::PerKeyLock;
pub use unsynchronized::Unsynchronized;

use std::fmt::{self, Display};
use std::str::FromStr;
use std::sync::Arc;

use crate::store::{CounterStore, Key};

/// The pluggable increment capability every strategy provides.
///
/// Implementations are `Send + Sync`: one strategy instance is shared by all
/// workers of a trial and every method may be called concurrently with any
/// other. There is no failure mode for valid keys — a strategy either returns
/// the value it published, or (for the race-prone baseline) a value that
/// concurrent callers may be about to overwrite.
pub trait SyncStrategy: Send + Sync {
    /// Stable label used in results, logs, and reports.
    fn name(&self) -> &'static str;

    /// Installs the trial's initial value for `key` using the seeding
    /// discipline this strategy's consistency model requires.
    ///
    /// Most variants seed the two tiers as independent cells; the
    /// atomic-counter variant must seed a single cell aliased by both tiers,
    /// or a pre-seeded trial would only ever advance one tier. Setup only,
    /// never called during the concurrent phase.
    fn seed(&self, key: Key, value: u64);

    /// Performs one logical increment of `key` and returns the resulting
    /// value as seen by this caller.
    fn increment(&self, key: Key) -> u64;
}

impl Display for dyn SyncStrategy + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tagged selector over the available strategies.
///
/// The runner, demo, and benches iterate [`StrategyKind::ALL`] and build
/// trait objects through [`StrategyKind::build`], keeping the harness code
/// variant-agnostic.
///
/// # Examples
///
/// ```rust
/// use contesa::strategies::StrategyKind;
///
/// assert_eq!(StrategyKind::ALL.len(), 5);
/// assert_eq!(StrategyKind::PerKeyLock.label(), "per-key-lock");
/// assert_eq!("cas-loop".parse::<StrategyKind>(), Ok(StrategyKind::CasLoop));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// The race-prone baseline: no synchronization at all.
    Unsynchronized,
    /// One shared atomic cell aliased by both tiers.
    Atomic,
    /// Independent compare-and-swap loop per tier.
    CasLoop,
    /// Per-key mutex around the whole update sequence.
    PerKeyLock,
    /// Single process-wide mutex around every update.
    GlobalLock,
}

impl StrategyKind {
    /// Every variant, in the order trials are reported.
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::Unsynchronized,
        StrategyKind::Atomic,
        StrategyKind::CasLoop,
        StrategyKind::PerKeyLock,
        StrategyKind::GlobalLock,
    ];

    /// The stable label for this variant, identical to the built strategy's
    /// [`SyncStrategy::name`].
    pub const fn label(self) -> &'static str {
        match self {
            StrategyKind::Unsynchronized => "unsynchronized",
            StrategyKind::Atomic => "atomic",
            StrategyKind::CasLoop => "cas-loop",
            StrategyKind::PerKeyLock => "per-key-lock",
            StrategyKind::GlobalLock => "global-lock",
        }
    }

    /// Returns `true` for every variant that preserves the
    /// `primary == cache == expected` invariant under contention.
    pub const fn is_correct(self) -> bool {
        !matches!(self, StrategyKind::Unsynchronized)
    }

    /// Builds a strategy instance operating on `store`.
    pub fn build(self, store: Arc<CounterStore>) -> Arc<dyn SyncStrategy> {
        match self {
            StrategyKind::Unsynchronized => Arc::new(Unsynchronized::new(store)),
            StrategyKind::Atomic => Arc::new(AtomicCounter::new(store)),
            StrategyKind::CasLoop => Arc::new(CasLoop::new(store)),
            StrategyKind::PerKeyLock => Arc::new(PerKeyLock::new(store)),
            StrategyKind::GlobalLock => Arc::new(GlobalLock::new(store)),
        }
    }
}

impl Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unsynchronized" => Ok(StrategyKind::Unsynchronized),
            "atomic" => Ok(StrategyKind::Atomic),
            "cas-loop" => Ok(StrategyKind::CasLoop),
            "per-key-lock" => Ok(StrategyKind::PerKeyLock),
            "global-lock" => Ok(StrategyKind::GlobalLock),
            other => Err(format!("unknown strategy: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.label().parse::<StrategyKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_unknown_label_rejected() {
        assert!("optimistic".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn test_build_name_matches_label() {
        for kind in StrategyKind::ALL {
            let store = Arc::new(CounterStore::new());
            let strategy = kind.build(store);
            assert_eq!(strategy.name(), kind.label());
        }
    }

    #[test]
    fn test_only_baseline_is_race_prone() {
        assert!(!StrategyKind::Unsynchronized.is_correct());
        assert!(StrategyKind::Atomic.is_correct());
        assert!(StrategyKind::CasLoop.is_correct());
        assert!(StrategyKind::PerKeyLock.is_correct());
        assert!(StrategyKind::GlobalLock.is_correct());
    }

    #[test]
    fn test_dyn_display_uses_name() {
        let store = Arc::new(CounterStore::new());
        let strategy = StrategyKind::GlobalLock.build(store);
        assert_eq!(format!("{}", strategy), "global-lock");
    }

    // Scenario: one uncontended call must behave identically everywhere.
    #[test]
    fn test_single_call_agrees_across_variants() {
        for kind in StrategyKind::ALL {
            let store = Arc::new(CounterStore::new());
            let strategy = kind.build(Arc::clone(&store));
            strategy.seed(1, 0);
            assert_eq!(strategy.increment(1), 1, "strategy {}", kind);
            assert_eq!(store.primary_value(1), 1, "strategy {}", kind);
            assert_eq!(store.cache_value(1), 1, "strategy {}", kind);
        }
    }
}
