//! Demo application running the race-condition experiment.
//!
//! Run with:
//! ```bash
//! cargo run --example demo --features demo -- --help
//! cargo run --release --example demo --features demo
//! cargo run --release --example demo --features demo -- -s unsynchronized --format json --pretty
//! ```

use clap::{Parser, ValueEnum};
use contesa::observers::json::JsonObserver;
use contesa::observers::table::{TableObserver, TableStyle};
use contesa::runner::{ExperimentRunner, TrialConfig};
use contesa::strategies::StrategyKind;
use std::time::Duration;

/// Strategy selection for the experiment.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum StrategyChoice {
    /// Run every strategy, in reporting order
    #[default]
    All,
    /// The race-prone baseline
    Unsynchronized,
    /// Shared atomic cell aliased by both tiers
    Atomic,
    /// Compare-and-swap loop per tier
    CasLoop,
    /// Per-key mutex
    PerKeyLock,
    /// Process-wide mutex
    GlobalLock,
}

impl StrategyChoice {
    fn kinds(self) -> Vec<StrategyKind> {
        match self {
            StrategyChoice::All => StrategyKind::ALL.to_vec(),
            StrategyChoice::Unsynchronized => vec![StrategyKind::Unsynchronized],
            StrategyChoice::Atomic => vec![StrategyKind::Atomic],
            StrategyChoice::CasLoop => vec![StrategyKind::CasLoop],
            StrategyChoice::PerKeyLock => vec![StrategyKind::PerKeyLock],
            StrategyChoice::GlobalLock => vec![StrategyKind::GlobalLock],
        }
    }
}

/// Output format for the trial report.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Pretty ASCII table
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Table style selection.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum StyleChoice {
    Ascii,
    #[default]
    Rounded,
    Sharp,
    Modern,
    Markdown,
    Blank,
}

impl From<StyleChoice> for TableStyle {
    fn from(choice: StyleChoice) -> Self {
        match choice {
            StyleChoice::Ascii => TableStyle::Ascii,
            StyleChoice::Rounded => TableStyle::Rounded,
            StyleChoice::Sharp => TableStyle::Sharp,
            StyleChoice::Modern => TableStyle::Modern,
            StyleChoice::Markdown => TableStyle::Markdown,
            StyleChoice::Blank => TableStyle::Blank,
        }
    }
}

/// Demo application for contesa - a race-condition harness for two-tier counters.
///
/// Drives a configurable concurrent workload against the selected
/// synchronization strategies and reports expected vs. observed counts,
/// lost updates, and tier consistency.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Strategy (or all) to put under load
    #[arg(short, long, value_enum, default_value = "all")]
    strategy: StrategyChoice,

    /// Number of concurrent workers
    #[arg(short, long, default_value = "100")]
    threads: usize,

    /// Increments issued by each worker
    #[arg(short, long, default_value = "1000")]
    calls: usize,

    /// Counter key the workload targets
    #[arg(short, long, default_value = "1")]
    key: u64,

    /// Initial value seeded into both tiers
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Completion bound in seconds
    #[arg(long, default_value = "10")]
    timeout_secs: u64,

    /// Repeat each trial N times and report every run
    #[arg(short, long, default_value = "1")]
    repeat: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Table style (table format only)
    #[arg(long, value_enum, default_value = "rounded")]
    style: StyleChoice,

    /// Pretty print JSON output
    #[arg(long)]
    pretty: bool,

    /// Add a title above the table
    #[arg(long)]
    title: Option<String>,

    /// Log at debug level (shows populate-on-miss and divergence events)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let config = TrialConfig::default()
        .with_key(args.key)
        .with_threads(args.threads)
        .with_calls_per_thread(args.calls)
        .with_seed(args.seed)
        .with_timeout(Duration::from_secs(args.timeout_secs));
    let runner = ExperimentRunner::new(config);

    eprintln!(
        "Running {} workers x {} calls (expected total: {})...",
        args.threads,
        args.calls,
        config.expected()
    );

    let mut results = Vec::new();
    for kind in args.strategy.kinds() {
        for _ in 0..args.repeat.max(1) {
            results.push(runner.run_trial(kind));
        }
    }

    let output = match args.format {
        OutputFormat::Table => {
            let mut observer = TableObserver::new().with_style(args.style.into());
            if let Some(ref title) = args.title {
                observer = observer.with_title(title.clone());
            }
            observer.render(&results)
        }
        OutputFormat::Json => JsonObserver::new()
            .pretty(args.pretty)
            .to_json(&results)
            .unwrap_or_else(|e| format!("Error: {}", e)),
    };

    println!("{}", output);
}
