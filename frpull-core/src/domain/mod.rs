//! Domain types for the kline / funding-rate puller

pub mod funding;
pub mod interval;
pub mod kline;
pub mod row;

pub use funding::FundingRateRecord;
pub use interval::{IntervalError, KlineInterval};
pub use kline::KlineRecord;
pub use row::MergedRow;
