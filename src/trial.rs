//! Trial result records.
//!
//! A [`TrialResult`] is the immutable record produced once per experiment:
//! the configured workload, the values both tiers ended up with, the
//! harness's own issued-call tally, and the elapsed duration. The derived
//! accessors ([`consistent`](TrialResult::consistent),
//! [`lost_updates`](TrialResult::lost_updates),
//! [`is_correct`](TrialResult::is_correct)) are the system's primary
//! observable output — for a race-prone strategy, an inconsistent or lossy
//! record is the *finding*, not an error.
//!
//! With the `serde` feature enabled the records serialize directly, which is
//! what the JSON observer renders.

use std::fmt::{self, Display};
use std::time::Duration;

use crate::store::Key;

/// How a trial ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TrialOutcome {
    /// Every worker finished every call within the bound.
    Completed,
    /// The completion bound elapsed first; counters are undefined.
    TimedOut,
}

/// Immutable record of one trial.
///
/// `expected` is the expected *final value*:
/// `seed + threads × calls_per_thread`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TrialResult {
    /// Label of the strategy under test.
    pub strategy: &'static str,
    /// The counter key the workload targeted.
    pub key: Key,
    /// Number of concurrent workers.
    pub threads: usize,
    /// Increments issued by each worker.
    pub calls_per_thread: usize,
    /// Initial value both tiers were seeded with.
    pub seed: u64,
    /// Expected final value after all increments.
    pub expected: u64,
    /// Final value observed in the primary tier.
    pub primary: u64,
    /// Final value observed in the cache tier.
    pub cache: u64,
    /// Increment calls actually issued, per the harness tally.
    pub issued: u64,
    /// Wall-clock duration of the concurrent phase.
    pub elapsed: Duration,
    /// Whether the trial completed or timed out.
    pub outcome: TrialOutcome,
}

impl TrialResult {
    /// Number of increments the workload was configured to issue.
    pub fn expected_increments(&self) -> u64 {
        self.threads as u64 * self.calls_per_thread as u64
    }

    /// Whether the two tiers ended up numerically equal.
    ///
    /// Only meaningful for a [`Completed`](TrialOutcome::Completed) trial; a
    /// timed-out trial's values are a transient snapshot.
    pub fn consistent(&self) -> bool {
        self.primary == self.cache
    }

    /// Increments that were issued but are reflected in neither tier:
    /// `expected − max(primary, cache)`, saturating at zero.
    pub fn lost_updates(&self) -> u64 {
        self.expected.saturating_sub(self.primary.max(self.cache))
    }

    /// Fraction of issued increments that were lost, in `[0, 1]`.
    pub fn loss_ratio(&self) -> f64 {
        let issued = self.expected_increments();
        if issued == 0 {
            return 0.0;
        }
        self.lost_updates() as f64 / issued as f64
    }

    /// Whether this trial upholds the full correctness invariant:
    /// completed, tiers equal, and both at the expected value.
    pub fn is_correct(&self) -> bool {
        self.outcome == TrialOutcome::Completed
            && self.consistent()
            && self.primary == self.expected
    }
}

impl Display for TrialResult {
    /// One-line summary, the form the runner logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected={} primary={} cache={} issued={} lost={} elapsed={:?}{}",
            self.strategy,
            self.expected,
            self.primary,
            self.cache,
            self.issued,
            self.lost_updates(),
            self.elapsed,
            if self.outcome == TrialOutcome::TimedOut {
                " [timed out]"
            } else {
                ""
            }
        )
    }
}

/// Aggregate over repeated trials of one strategy.
///
/// The race in the unsynchronized baseline is probabilistic: a single clean
/// run is not evidence of correctness. A batch counts how many runs diverged
/// or lost updates so callers can reason statistically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BatchSummary {
    /// Trials executed.
    pub runs: usize,
    /// Trials whose tiers diverged.
    pub inconsistent: usize,
    /// Trials that lost at least one update.
    pub lossy: usize,
    /// Trials that timed out.
    pub timed_out: usize,
}

impl BatchSummary {
    /// Folds one trial into the summary.
    pub fn record(&mut self, result: &TrialResult) {
        self.runs += 1;
        match result.outcome {
            TrialOutcome::TimedOut => self.timed_out += 1,
            TrialOutcome::Completed => {
                if !result.consistent() {
                    self.inconsistent += 1;
                }
                if result.lost_updates() > 0 {
                    self.lossy += 1;
                }
            }
        }
    }

    /// Whether any completed run surfaced the race.
    pub fn race_observed(&self) -> bool {
        self.inconsistent > 0 || self.lossy > 0
    }
}
