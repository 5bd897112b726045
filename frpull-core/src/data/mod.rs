//! Data fetching, alignment and persistence

pub mod align;
pub mod binance;
pub mod funding_window;
pub mod mock;
pub mod provider;
pub mod sink;

pub use align::{align, floor_to_second};
pub use binance::{
    BinanceFuturesProvider, BinanceSettings, MAX_FUNDING_LIMIT, MAX_KLINE_PAGE_LIMIT,
};
pub use funding_window::{fetch_funding_split, split_windows};
pub use mock::{FailStep, MockProvider};
pub use provider::{DataError, MarketDataProvider};
pub use sink::{CsvSink, SinkError, SinkReceipt};
