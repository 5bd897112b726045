//! Per-symbol and per-run results.

use frpull_core::data::{DataError, SinkError};
use std::path::PathBuf;
use thiserror::Error;

/// Why a symbol's pull stopped. Nothing was written for that symbol.
#[derive(Debug, Error)]
pub enum PullError {
    #[error("kline fetch failed: {0}")]
    Klines(DataError),

    #[error("funding-rate fetch failed: {0}")]
    Funding(DataError),

    #[error("write failed: {0}")]
    Sink(#[from] SinkError),
}

/// What a successful pull produced.
#[derive(Debug, Clone)]
pub struct SymbolReport {
    pub rows: usize,
    /// Rows that picked up a funding rate.
    pub funded_rows: usize,
    pub path: PathBuf,
    /// BLAKE3 hex digest of the written CSV.
    pub content_hash: String,
}

/// Explicit result of one worker.
#[derive(Debug)]
pub struct SymbolOutcome {
    pub symbol: String,
    pub result: Result<SymbolReport, PullError>,
}

impl SymbolOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of a whole run, in configured symbol order.
#[derive(Debug)]
pub struct RunSummary {
    pub outcomes: Vec<SymbolOutcome>,
    pub succeeded: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn from_outcomes(outcomes: Vec<SymbolOutcome>) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
        let failed = outcomes.len() - succeeded;
        Self {
            outcomes,
            succeeded,
            failed,
        }
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    /// Failed symbols with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &PullError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.symbol.as_str(), e)))
    }
}
