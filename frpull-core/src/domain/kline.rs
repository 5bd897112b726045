//! Kline: one fixed-interval price candle.

use serde::{Deserialize, Serialize};

/// OHLC candle for a single symbol and interval bucket.
///
/// Only the fields used downstream are kept. The exchange also reports
/// volume, close time, trade count and taker volumes; those are dropped at
/// the provider boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KlineRecord {
    /// Bucket open time, epoch milliseconds.
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl KlineRecord {
    /// Relative move over the candle: `(close - open) / open`.
    ///
    /// No guard against a zero open; the exchange never reports one for a
    /// listed contract and the result is passed through as-is (inf/NaN).
    pub fn close_diff(&self) -> f64 {
        (self.close - self.open) / self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_kline() -> KlineRecord {
        KlineRecord {
            open_time: 1_613_347_200_000,
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close: 103.0,
        }
    }

    #[test]
    fn close_diff_is_relative_to_open() {
        let k = sample_kline();
        assert!((k.close_diff() - 0.03).abs() < 1e-12);
    }

    #[test]
    fn close_diff_negative_on_down_candle() {
        let k = KlineRecord {
            close: 95.0,
            ..sample_kline()
        };
        assert!((k.close_diff() + 0.05).abs() < 1e-12);
    }
}
