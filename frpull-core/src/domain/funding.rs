//! Funding-rate event for a perpetual futures contract.

use serde::{Deserialize, Serialize};

/// One funding settlement as reported by the exchange.
///
/// `symbol` is carried for provenance only; the aligner keys on
/// `funding_time` and copies `funding_rate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingRateRecord {
    pub symbol: String,
    /// Settlement time, epoch milliseconds.
    pub funding_time: i64,
    pub funding_rate: f64,
}
