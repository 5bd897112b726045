//! Two-window funding-rate fetch.
//!
//! The funding endpoint caps the number of events per request, so a long
//! kline window can silently lose its tail if fetched in one go. The window
//! is split at the open time of the middle kline and each half is fetched
//! separately, then concatenated in order.
//!
//! This covers exactly the gap the cap opens for the run windows this tool
//! is used with; it is deliberately not a general N-way paginator.

use super::align::floor_to_second;
use super::provider::{DataError, MarketDataProvider};
use crate::domain::{FundingRateRecord, KlineRecord};

/// Inclusive `(start_ms, end_ms)` request window.
pub type Window = (i64, i64);

/// Compute the two funding windows for a kline series.
///
/// First window: `[first second, mid.open_time]`.
/// Second window: `[mid.open_time + 1, end of last kline's second]`, so an
/// event sitting exactly on the midpoint is returned once, not twice.
///
/// The outer bounds cover whole seconds: an event settled a few ms after the
/// last kline opens still shares that kline's floored second.
///
/// Returns `None` for an empty series. The second window is `None` when it
/// would be empty (one or two klines where mid == last).
pub fn split_windows(klines: &[KlineRecord]) -> Option<(Window, Option<Window>)> {
    let first = second_start(klines.first()?.open_time);
    let mid = klines[klines.len() / 2].open_time;
    let last = klines[klines.len() - 1].open_time;
    let last_end = second_end(last);

    if mid < last {
        Some(((first, mid), Some((mid + 1, last_end))))
    } else {
        Some(((first, last_end), None))
    }
}

fn second_start(ms: i64) -> i64 {
    floor_to_second(ms) * 1000
}

fn second_end(ms: i64) -> i64 {
    second_start(ms) + 999
}

/// Fetch all funding events covering `klines` using the two-window split.
///
/// Fails with [`DataError::EmptyKlines`] if `klines` is empty: there is no
/// window to ask for.
pub fn fetch_funding_split(
    provider: &dyn MarketDataProvider,
    symbol: &str,
    klines: &[KlineRecord],
) -> Result<Vec<FundingRateRecord>, DataError> {
    let (first, second) = split_windows(klines).ok_or_else(|| DataError::EmptyKlines {
        symbol: symbol.to_string(),
    })?;

    let mut events = provider.fetch_funding_rates(symbol, first.0, first.1)?;
    if let Some((start, end)) = second {
        events.extend(provider.fetch_funding_rates(symbol, start, end)?);
    }

    tracing::debug!(
        symbol,
        events = events.len(),
        split_at = first.1,
        "funding rates fetched"
    );
    Ok(events)
}
