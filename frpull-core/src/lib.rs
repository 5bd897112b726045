//! frpull core: records, exchange access, time alignment, CSV output.
//!
//! This crate contains everything a single symbol's pull needs:
//! - Domain types (klines, funding events, merged rows, intervals)
//! - The `MarketDataProvider` seam with a Binance futures and an in-memory implementation
//! - The two-window funding fetch
//! - The exact-second aligner
//! - The atomic CSV sink

pub mod data;
pub mod domain;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything a worker thread touches is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::KlineRecord>();
        require_sync::<domain::KlineRecord>();
        require_send::<domain::FundingRateRecord>();
        require_sync::<domain::FundingRateRecord>();
        require_send::<domain::MergedRow>();
        require_sync::<domain::MergedRow>();
        require_send::<domain::KlineInterval>();
        require_sync::<domain::KlineInterval>();

        require_send::<data::BinanceFuturesProvider>();
        require_sync::<data::BinanceFuturesProvider>();
        require_send::<data::MockProvider>();
        require_sync::<data::MockProvider>();
        require_send::<data::CsvSink>();
        require_sync::<data::CsvSink>();
        require_send::<data::DataError>();
        require_send::<data::SinkError>();
    }

    /// The provider trait is object-safe and usable behind a shared reference.
    #[test]
    fn provider_trait_is_object_safe() {
        let mock = data::MockProvider::new();
        let provider: &dyn data::MarketDataProvider = &mock;
        assert_eq!(provider.name(), "mock");
    }
}
