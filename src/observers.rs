//! Report renderers for trial results.
//!
//! The harness core produces [`TrialResult`](crate::trial::TrialResult)
//! records and nothing else; turning them into something a human reads is
//! the job of an observer. Each observer is gated behind a feature flag to
//! keep the default dependency set empty:
//!
//! | Feature | Module | Description |
//! |---------|--------|-------------|
//! | `table` | [`table`] | Pretty-print trial results as ASCII tables |
//! | `json`  | [`json`]  | Serialize trial results to JSON |
//! | `full`  | both      | Enables all observer modules |
//!
//! All observers share the unified [`ObserverError`] type, so client code can
//! switch renderers without changing its error handling.
//!
//! # Example
//!
//! ```rust,ignore
//! use contesa::observers::table::TableObserver;
//! use contesa::runner::ExperimentRunner;
//!
//! let results = ExperimentRunner::default().run_all();
//! println!("{}", TableObserver::new().render(&results));
//! ```

mod error;

pub use error::{ObserverError, Result};

#[cfg(feature = "json")]
pub mod json;

#[cfg(feature = "table")]
pub mod table;
