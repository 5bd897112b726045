//! In-memory market data provider for tests and offline runs.
//!
//! Holds canned klines and funding events per symbol, answers range queries
//! the way the exchange does (inclusive bounds, ascending order), and can be
//! told to fail a given fetch step for a given symbol.

use super::provider::{DataError, MarketDataProvider};
use crate::domain::{FundingRateRecord, KlineInterval, KlineRecord};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Which fetch step an injected failure hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailStep {
    Klines,
    Funding,
}

#[derive(Debug, Default)]
pub struct MockProvider {
    klines: HashMap<String, Vec<KlineRecord>>,
    funding: HashMap<String, Vec<FundingRateRecord>>,
    failures: HashMap<String, FailStep>,
    funding_cap: Option<usize>,
    funding_requests: AtomicUsize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_klines(mut self, symbol: &str, mut klines: Vec<KlineRecord>) -> Self {
        klines.sort_by_key(|k| k.open_time);
        self.klines.insert(symbol.to_string(), klines);
        self
    }

    pub fn with_funding(mut self, symbol: &str, mut events: Vec<FundingRateRecord>) -> Self {
        events.sort_by_key(|e| e.funding_time);
        self.funding.insert(symbol.to_string(), events);
        self
    }

    /// Make every fetch of `step` for `symbol` fail with a transport error.
    pub fn failing(mut self, symbol: &str, step: FailStep) -> Self {
        self.failures.insert(symbol.to_string(), step);
        self
    }

    /// Truncate each funding response to at most `cap` events, like the
    /// exchange's per-request limit.
    pub fn with_funding_cap(mut self, cap: usize) -> Self {
        self.funding_cap = Some(cap);
        self
    }

    /// Number of funding requests served (or refused) so far.
    pub fn funding_requests(&self) -> usize {
        self.funding_requests.load(Ordering::SeqCst)
    }

    fn check_failure(&self, symbol: &str, step: FailStep) -> Result<(), DataError> {
        match self.failures.get(symbol) {
            Some(&s) if s == step => Err(DataError::Transport(format!(
                "injected {step:?} failure for {symbol}"
            ))),
            _ => Ok(()),
        }
    }
}

impl MarketDataProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn fetch_klines(
        &self,
        symbol: &str,
        _interval: KlineInterval,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<KlineRecord>, DataError> {
        self.check_failure(symbol, FailStep::Klines)?;
        Ok(self
            .klines
            .get(symbol)
            .map(|ks| {
                ks.iter()
                    .filter(|k| k.open_time >= start_ms && k.open_time <= end_ms)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn fetch_funding_rates(
        &self,
        symbol: &str,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<FundingRateRecord>, DataError> {
        self.funding_requests.fetch_add(1, Ordering::SeqCst);
        self.check_failure(symbol, FailStep::Funding)?;
        let cap = self.funding_cap.unwrap_or(usize::MAX);
        Ok(self
            .funding
            .get(symbol)
            .map(|es| {
                es.iter()
                    .filter(|e| e.funding_time >= start_ms && e.funding_time <= end_ms)
                    .take(cap)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
