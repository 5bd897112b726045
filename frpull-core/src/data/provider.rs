//! Market data provider trait and structured error types.
//!
//! The MarketDataProvider trait abstracts over the exchange so the pipeline
//! can run against the live futures API or an in-memory mock in tests.

use crate::domain::{FundingRateRecord, KlineInterval, KlineRecord};
use thiserror::Error;

/// Structured error types for fetch operations.
///
/// Every variant is terminal for the symbol that hit it: nothing here is
/// retried.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("rate limited by exchange (HTTP {status}, retry after {retry_after_secs:?}s)")]
    RateLimited {
        status: u16,
        retry_after_secs: Option<u64>,
    },

    #[error("exchange rejected request: code {code}: {msg}")]
    Exchange { code: i64, msg: String },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("response format changed: {0}")]
    ResponseFormat(String),

    #[error("no klines returned for '{symbol}' in the requested window")]
    EmptyKlines { symbol: String },

    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),
}

/// Trait for market data sources (Binance futures REST, in-memory mock).
///
/// Implementations must be shareable across worker threads; the
/// orchestrator hands one `&dyn MarketDataProvider` to every worker.
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch klines with `start_ms <= open_time <= end_ms`, ascending by
    /// open time. Implementations page through the range themselves.
    fn fetch_klines(
        &self,
        symbol: &str,
        interval: KlineInterval,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<KlineRecord>, DataError>;

    /// Fetch funding events with `start_ms <= funding_time <= end_ms`,
    /// ascending by funding time.
    ///
    /// This is a single request and may be truncated by the exchange's
    /// per-request cap; see [`super::funding_window::fetch_funding_split`].
    fn fetch_funding_rates(
        &self,
        symbol: &str,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<FundingRateRecord>, DataError>;
}
