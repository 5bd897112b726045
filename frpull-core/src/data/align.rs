//! Kline / funding-rate time alignment.
//!
//! Klines and funding events are joined on their timestamps floored to the
//! second. The join is exact equality: a kline gets a funding rate only when
//! a funding event lands on the very same second. Klines without a match get
//! `None` (no interpolation, no carry-forward of the last known rate).

use crate::domain::{FundingRateRecord, KlineRecord, MergedRow};
use std::collections::HashMap;

/// Floor an epoch-millisecond timestamp to whole epoch seconds.
///
/// True floor, so pre-epoch values round towards negative infinity.
pub fn floor_to_second(ms: i64) -> i64 {
    ms.div_euclid(1000)
}

/// Merge klines with funding events into one row per kline.
///
/// Rows come out in kline order. If two funding events share a floored
/// second, the first one in `funding` wins.
pub fn align(klines: &[KlineRecord], funding: &[FundingRateRecord]) -> Vec<MergedRow> {
    // Build a lookup: floored second → funding rate
    let mut rate_by_second: HashMap<i64, f64> = HashMap::with_capacity(funding.len());
    for event in funding {
        rate_by_second
            .entry(floor_to_second(event.funding_time))
            .or_insert(event.funding_rate);
    }

    klines
        .iter()
        .map(|k| {
            let timestamp = floor_to_second(k.open_time);
            MergedRow {
                time: k.open_time,
                timestamp,
                open: k.open,
                high: k.high,
                low: k.low,
                close: k.close,
                close_diff: k.close_diff(),
                funding_rate: rate_by_second.get(&timestamp).copied(),
            }
        })
        .collect()
}
