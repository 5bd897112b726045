//! Fan-out over symbols: one worker per symbol on a private thread pool.
//!
//! Workers share nothing mutable. Each gets a read-only view of the window,
//! the provider and the sink, and hands back a [`SymbolOutcome`]. The run
//! returns once every worker has finished.

use frpull_core::data::{CsvSink, MarketDataProvider};
use rayon::prelude::*;
use thiserror::Error;

use crate::config::PullWindow;
use crate::pipeline::pull_symbol;
use crate::result::{PullError, RunSummary, SymbolReport};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("no symbols to pull")]
    NoSymbols,
}

/// Progress callback for a batch run. Called from worker threads.
pub trait PullProgress: Send + Sync {
    /// Called when a worker starts on a symbol.
    fn on_start(&self, symbol: &str, index: usize, total: usize);

    /// Called when a worker finishes, successfully or not.
    fn on_complete(
        &self,
        symbol: &str,
        index: usize,
        total: usize,
        result: &Result<SymbolReport, PullError>,
    );

    /// Called once, after every worker has finished.
    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// Prints one line per event to stdout.
pub struct StdoutProgress;

impl PullProgress for StdoutProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        println!("[{}/{}] Pulling {symbol}...", index + 1, total);
    }

    fn on_complete(
        &self,
        symbol: &str,
        _index: usize,
        _total: usize,
        result: &Result<SymbolReport, PullError>,
    ) {
        match result {
            Ok(report) => println!(
                "  OK: {symbol} ({} rows, {} with funding) -> {}",
                report.rows,
                report.funded_rows,
                report.path.display()
            ),
            Err(e) => println!("  FAIL: {symbol}: {e}"),
        }
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize) {
        println!("\nPull complete: {succeeded}/{total} succeeded, {failed} failed");
    }
}

/// Discards all progress events.
pub struct NoProgress;

impl PullProgress for NoProgress {
    fn on_start(&self, _symbol: &str, _index: usize, _total: usize) {}

    fn on_complete(
        &self,
        _symbol: &str,
        _index: usize,
        _total: usize,
        _result: &Result<SymbolReport, PullError>,
    ) {
    }

    fn on_batch_complete(&self, _succeeded: usize, _failed: usize, _total: usize) {}
}

/// Pull every symbol concurrently and wait for all of them.
///
/// A failing symbol never cancels its siblings. Outcomes come back in the
/// order of `symbols`, whatever order the workers finished in.
pub fn pull_all(
    provider: &dyn MarketDataProvider,
    sink: &CsvSink,
    symbols: &[String],
    window: &PullWindow,
    progress: &dyn PullProgress,
) -> Result<RunSummary, RunError> {
    if symbols.is_empty() {
        return Err(RunError::NoSymbols);
    }
    let total = symbols.len();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(total)
        .thread_name(|i| format!("frpull-worker-{i}"))
        .build()?;

    // Pool threads don't inherit a scoped subscriber.
    let dispatch = tracing::dispatcher::get_default(|d| d.clone());

    tracing::info!(
        symbols = total,
        interval = %window.interval,
        start_ms = window.start_ms,
        end_ms = window.end_ms,
        "starting pull"
    );

    let outcomes = pool.install(|| {
        symbols
            .par_iter()
            .enumerate()
            .map(|(index, symbol)| {
                tracing::dispatcher::with_default(&dispatch, || {
                    progress.on_start(symbol, index, total);
                    let outcome = pull_symbol(provider, sink, symbol, window);
                    progress.on_complete(symbol, index, total, &outcome.result);
                    outcome
                })
            })
            .collect::<Vec<_>>()
    });

    let summary = RunSummary::from_outcomes(outcomes);
    progress.on_batch_complete(summary.succeeded, summary.failed, summary.total());
    if summary.all_succeeded() {
        tracing::info!(succeeded = summary.succeeded, "pull finished");
    } else {
        tracing::warn!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "pull finished with failures"
        );
    }

    Ok(summary)
}
