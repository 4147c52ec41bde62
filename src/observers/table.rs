//! Table observer for pretty-printing trial results.
//!
//! This module provides [`TableObserver`], which renders a slice of
//! [`TrialResult`] records as a formatted ASCII table using the `tabled`
//! crate — one row per trial, in reporting order.
//!
//! # Feature Flag
//!
//! This module requires the `table` feature:
//!
//! ```toml
//! [dependencies]
//! contesa = { version = "0.2", features = ["table"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use contesa::observers::table::{TableObserver, TableStyle};
//! use contesa::runner::ExperimentRunner;
//!
//! let results = ExperimentRunner::default().run_all();
//! let observer = TableObserver::new().with_style(TableStyle::Rounded);
//! println!("{}", observer.render(&results));
//! // ╭────────────────┬──────────┬─────────┬─────────┬────────┬──────┬───────────┬────────────╮
//! // │ Strategy       │ Expected │ Primary │ Cache   │ Issued │ Lost │ Elapsed   │ Consistent │
//! // ├────────────────┼──────────┼─────────┼─────────┼────────┼──────┼───────────┼────────────┤
//! // │ unsynchronized │ 100000   │ 71342   │ 70981   │ 100000 │ 2...
//! ```

use tabled::{settings::Style, Table, Tabled};

use crate::trial::{TrialOutcome, TrialResult};

/// Available table styles for rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableStyle {
    /// ASCII table with simple characters: +, -, |
    Ascii,
    /// Modern rounded corners (default)
    #[default]
    Rounded,
    /// Sharp corners with box-drawing characters
    Sharp,
    /// Modern style with clean lines
    Modern,
    /// GitHub-flavored Markdown table
    Markdown,
    /// No borders, just spacing
    Blank,
}

/// Internal row representation for tabled.
#[derive(Tabled)]
struct TrialRow {
    #[tabled(rename = "Strategy")]
    strategy: &'static str,
    #[tabled(rename = "Expected")]
    expected: u64,
    #[tabled(rename = "Primary")]
    primary: u64,
    #[tabled(rename = "Cache")]
    cache: u64,
    #[tabled(rename = "Issued")]
    issued: u64,
    #[tabled(rename = "Lost")]
    lost: u64,
    #[tabled(rename = "Elapsed")]
    elapsed: String,
    #[tabled(rename = "Consistent")]
    consistent: String,
}

impl From<&TrialResult> for TrialRow {
    fn from(result: &TrialResult) -> Self {
        TrialRow {
            strategy: result.strategy,
            expected: result.expected,
            primary: result.primary,
            cache: result.cache,
            issued: result.issued,
            lost: result.lost_updates(),
            elapsed: format!("{:.2?}", result.elapsed),
            consistent: match result.outcome {
                TrialOutcome::TimedOut => "timed out".to_string(),
                TrialOutcome::Completed if result.consistent() => "yes".to_string(),
                TrialOutcome::Completed => "NO".to_string(),
            },
        }
    }
}

/// An observer that renders trial results as a formatted ASCII table.
#[derive(Debug, Clone, Default)]
pub struct TableObserver {
    style: TableStyle,
    title: Option<String>,
}

impl TableObserver {
    /// Creates a new table observer with the default (rounded) style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the table style, returning `self` for method chaining.
    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    /// Sets an optional title printed above the table.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Renders `results` as a table, one row per trial.
    pub fn render(&self, results: &[TrialResult]) -> String {
        let rows: Vec<TrialRow> = results.iter().map(TrialRow::from).collect();
        let mut table = Table::new(&rows);
        match self.style {
            TableStyle::Ascii => {
                table.with(Style::ascii());
            }
            TableStyle::Rounded => {
                table.with(Style::rounded());
            }
            TableStyle::Sharp => {
                table.with(Style::sharp());
            }
            TableStyle::Modern => {
                table.with(Style::modern());
            }
            TableStyle::Markdown => {
                table.with(Style::markdown());
            }
            TableStyle::Blank => {
                table.with(Style::blank());
            }
        }

        match &self.title {
            Some(title) => format!("{}\n{}", title, table),
            None => table.to_string(),
        }
    }
}
