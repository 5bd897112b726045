//! Single-symbol pipeline: fetch klines → fetch funding (split) → align → write.
//!
//! A worker never panics on a failed step and never writes a partial file:
//! the first error ends the pull, is logged once, and is handed back in the
//! [`SymbolOutcome`].

use frpull_core::data::{align, fetch_funding_split, CsvSink, DataError, MarketDataProvider};

use crate::config::PullWindow;
use crate::result::{PullError, SymbolOutcome, SymbolReport};

/// Run the full pipeline for one symbol inside its own `worker` span.
pub fn pull_symbol(
    provider: &dyn MarketDataProvider,
    sink: &CsvSink,
    symbol: &str,
    window: &PullWindow,
) -> SymbolOutcome {
    let span = tracing::info_span!("worker", symbol = %symbol);
    let _guard = span.enter();

    let result = run_steps(provider, sink, symbol, window);
    match &result {
        Ok(report) => tracing::info!(
            rows = report.rows,
            funded_rows = report.funded_rows,
            path = %report.path.display(),
            "symbol written"
        ),
        Err(e) => tracing::error!(
            symbol,
            provider = provider.name(),
            error = %e,
            "symbol pull failed, no output written"
        ),
    }

    SymbolOutcome {
        symbol: symbol.to_string(),
        result,
    }
}

fn run_steps(
    provider: &dyn MarketDataProvider,
    sink: &CsvSink,
    symbol: &str,
    window: &PullWindow,
) -> Result<SymbolReport, PullError> {
    let klines = provider
        .fetch_klines(symbol, window.interval, window.start_ms, window.end_ms)
        .map_err(PullError::Klines)?;
    if klines.is_empty() {
        return Err(PullError::Klines(DataError::EmptyKlines {
            symbol: symbol.to_string(),
        }));
    }
    tracing::debug!(klines = klines.len(), "klines fetched");

    let funding = fetch_funding_split(provider, symbol, &klines).map_err(PullError::Funding)?;

    let rows = align(&klines, &funding);
    let funded_rows = rows.iter().filter(|r| r.has_funding()).count();
    if funded_rows == 0 && !funding.is_empty() {
        // Exact-second join found nothing despite events in range.
        tracing::info!(
            events = funding.len(),
            "no funding event landed on a kline second"
        );
    }

    let receipt = sink.write(symbol, &rows)?;

    Ok(SymbolReport {
        rows: receipt.rows,
        funded_rows,
        path: receipt.path,
        content_hash: receipt.content_hash,
    })
}
