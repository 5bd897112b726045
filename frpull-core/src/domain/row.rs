//! MergedRow: one kline with its (optional) funding rate attached.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Output row of the aligner. Exactly one per input kline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRow {
    /// Kline open time, epoch milliseconds.
    pub time: i64,
    /// `time` floored to whole seconds (epoch seconds). The join key.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub close_diff: f64,
    /// Set only when a funding event lands on exactly the same second.
    pub funding_rate: Option<f64>,
}

impl MergedRow {
    /// The join key as a UTC wall-clock time.
    ///
    /// `None` if the timestamp is outside chrono's representable range.
    pub fn date(&self) -> Option<NaiveDateTime> {
        DateTime::from_timestamp(self.timestamp, 0).map(|dt| dt.naive_utc())
    }

    pub fn has_funding(&self) -> bool {
        self.funding_rate.is_some()
    }
}
