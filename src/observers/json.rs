//! JSON observer for serializing trial results.
//!
//! This module provides [`JsonObserver`], which serializes a slice of
//! [`TrialResult`] records to JSON using serde.
//!
//! # Feature Flag
//!
//! This module requires the `json` feature:
//!
//! ```toml
//! [dependencies]
//! contesa = { version = "0.2", features = ["json"] }
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use contesa::observers::json::JsonObserver;
//! use contesa::runner::ExperimentRunner;
//!
//! let results = ExperimentRunner::default().run_all();
//! let json = JsonObserver::new().pretty(true).to_json(&results)?;
//! println!("{}", json);
//! ```

use crate::observers::Result;
use crate::trial::TrialResult;

/// Serializes trial results to JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonObserver {
    pretty: bool,
}

impl JsonObserver {
    /// Creates an observer producing compact JSON.
    pub const fn new() -> Self {
        JsonObserver { pretty: false }
    }

    /// Enables or disables pretty-printing, returning `self` for chaining.
    pub const fn pretty(self, pretty: bool) -> Self {
        JsonObserver { pretty }
    }

    /// Serializes `results` to a JSON array.
    pub fn to_json(&self, results: &[TrialResult]) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(results)?
        } else {
            serde_json::to_string(results)?
        };
        Ok(json)
    }
}
