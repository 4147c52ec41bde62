//! # Contesa - A Concurrency-Correctness Harness for Two-Tier Counters
//!
//! A Rust library that demonstrates and measures what happens to a shared
//! counter kept in **two storage tiers** — an authoritative *primary* store
//! and a derived *cache* — when many threads increment it at once. It
//! contrasts a naive, non-atomic update path against synchronization
//! strategies that preserve correctness under contention, and quantifies
//! exactly how many updates the naive path loses.
//!
//! ## The Problem
//!
//! The textbook tiered-counter update reads the cached value, adds one, and
//! writes the result back to both the store and the cache:
//!
//! ```text
//!   read cache ──► +1 ──► write primary ──► write cache
//! ```
//!
//! Each of those steps is individually fine. Together they are a race: two
//! threads that read the same stale value both publish the same successor,
//! and one increment silently disappears. Because the two writes are not
//! mutually atomic either, the primary and the cache can also drift apart
//! from *each other*. Under real contention the effect is dramatic — a
//! workload of 100,000 increments routinely lands tens of thousands short.
//!
//! The failure is probabilistic, which is what makes it dangerous: the code
//! passes every sequential test and only falls over under production load.
//!
//! ## The Harness
//!
//! This crate makes the race reproducible and measurable:
//!
//! 1. A [`CounterStore`](store::CounterStore) holds the two tiers as passive
//!    concurrent maps with no locking policy of their own.
//! 2. A [`SyncStrategy`](strategies::SyncStrategy) encapsulates how one
//!    increment is performed and propagated — five variants, from the broken
//!    baseline to fully serialized.
//! 3. A [`LoadHarness`](harness::LoadHarness) fires `threads ×
//!    calls_per_thread` increments from concurrent workers, releases them
//!    through a start barrier, and measures only the contended phase.
//! 4. A [`ConsistencyChecker`](checker::ConsistencyChecker) and the
//!    [`TrialResult`](trial::TrialResult) record quantify divergence and
//!    lost updates.
//!
//! ## Available Strategies
//!
//! | Variant | Mechanism | Outcome under contention |
//! |---------|-----------|--------------------------|
//! | [`Unsynchronized`](strategies::Unsynchronized) | four unprotected steps | loses updates, tiers diverge |
//! | [`AtomicCounter`](strategies::AtomicCounter) | fetch-and-add on one cell aliased by both tiers | exact, consistent by construction |
//! | [`CasLoop`](strategies::CasLoop) | compare-exchange loop per tier | exact after quiescence, transient skew |
//! | [`PerKeyLock`](strategies::PerKeyLock) | per-key mutex | exact, unrelated keys stay parallel |
//! | [`GlobalLock`](strategies::GlobalLock) | one process-wide mutex | exact, fully serialized |
//!
//! ## Quick Start
//!
//! ```rust
//! use contesa::runner::{ExperimentRunner, TrialConfig};
//! use contesa::strategies::StrategyKind;
//!
//! let config = TrialConfig::default()
//!     .with_threads(8)
//!     .with_calls_per_thread(1000);
//! let runner = ExperimentRunner::new(config);
//!
//! // The atomic strategy never loses an update.
//! let result = runner.run_trial(StrategyKind::Atomic);
//! assert!(result.is_correct());
//! assert_eq!(result.primary, 8000);
//! assert_eq!(result.cache, 8000);
//!
//! // The baseline usually does — run it and inspect the record.
//! let baseline = runner.run_trial(StrategyKind::Unsynchronized);
//! println!("{}", baseline);
//! ```
//!
//! ## Observers
//!
//! The core produces [`TrialResult`](trial::TrialResult) records and nothing
//! else. Rendering them is delegated to feature-gated observer modules:
//!
//! | Feature | Module | Description |
//! |---------|--------|-------------|
//! | `table` | [`observers::table`] | Pretty-print results as ASCII tables |
//! | `json`  | [`observers::json`]  | Serialize results to JSON |
//! | `full`  | both                 | Enables all observer modules |
//! | `demo`  | `full` + clap        | Enables the `demo` example binary |
//!
//! ## Thread Safety
//!
//! Strategies are `Send + Sync` and shared across workers via
//! `Arc<dyn SyncStrategy>`. All lazy per-key creation (cells, the aliased
//! atomic cell, per-key locks) goes through linearizable create-if-absent,
//! so first access is race-free even when every worker misses at once.
//!
//! ## Scope
//!
//! Single-process, in-memory only. Nothing persists beyond a trial, and no
//! cross-process coordination is attempted — the point is the memory-model
//! race, reproduced in its smallest faithful form.

pub mod checker;
pub mod harness;
pub mod observers;
pub mod runner;
pub mod store;
pub mod strategies;
pub mod trial;
