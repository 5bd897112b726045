//! Property tests for the aligner.
//!
//! Uses proptest to verify:
//! 1. Count preservation: one merged row per kline
//! 2. close_diff identity: (close - open) / open on every row
//! 3. Exact-second join: a rate is set iff some event shares the floored second
//! 4. Kline order and fields pass through untouched

use frpull_core::data::{align, floor_to_second};
use frpull_core::domain::{FundingRateRecord, KlineRecord};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

const MINUTE_MS: i64 = 60_000;

fn arb_price() -> impl Strategy<Value = f64> {
    (1.0..100_000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_kline_series() -> impl Strategy<Value = Vec<KlineRecord>> {
    (
        1_500_000_000_i64..1_700_000_000_i64,
        prop::collection::vec((arb_price(), arb_price()), 1..300),
    )
        .prop_map(|(start_secs, prices)| {
            let t0 = start_secs * 1000;
            prices
                .into_iter()
                .enumerate()
                .map(|(i, (open, close))| KlineRecord {
                    open_time: t0 + i as i64 * MINUTE_MS,
                    open,
                    high: open.max(close),
                    low: open.min(close),
                    close,
                })
                .collect()
        })
}

/// Klines plus funding events: some land on a kline's second (with a
/// sub-second offset), some land between klines.
fn arb_inputs() -> impl Strategy<Value = (Vec<KlineRecord>, Vec<FundingRateRecord>)> {
    arb_kline_series().prop_flat_map(|klines| {
        let n = klines.len();
        let events = prop::collection::vec(
            (0..n, 0_i64..1000, any::<bool>(), -0.01..0.01_f64),
            0..20,
        );
        (Just(klines), events).prop_map(|(klines, picks)| {
            let mut events: Vec<FundingRateRecord> = picks
                .into_iter()
                .map(|(idx, offset_ms, on_second, rate)| {
                    let base = klines[idx].open_time;
                    let funding_time = if on_second {
                        base + offset_ms
                    } else {
                        // Strictly inside the next 59 seconds: never a kline second.
                        base + 1000 + offset_ms % 58_000
                    };
                    FundingRateRecord {
                        symbol: "BTCUSDT".into(),
                        funding_time,
                        funding_rate: rate,
                    }
                })
                .collect();
            events.sort_by_key(|e| e.funding_time);
            (klines, events)
        })
    })
}

proptest! {
    #[test]
    fn one_row_per_kline((klines, events) in arb_inputs()) {
        let rows = align(&klines, &events);
        prop_assert_eq!(rows.len(), klines.len());
    }

    #[test]
    fn close_diff_identity((klines, events) in arb_inputs()) {
        let rows = align(&klines, &events);
        for row in &rows {
            let expected = (row.close - row.open) / row.open;
            prop_assert!((row.close_diff - expected).abs() <= 1e-12 * expected.abs().max(1.0));
        }
    }

    #[test]
    fn rate_set_iff_same_floored_second((klines, events) in arb_inputs()) {
        let rows = align(&klines, &events);
        for row in &rows {
            let first_match = events
                .iter()
                .find(|e| floor_to_second(e.funding_time) == row.timestamp)
                .map(|e| e.funding_rate);
            prop_assert_eq!(row.funding_rate, first_match);
        }
    }

    #[test]
    fn kline_fields_pass_through((klines, events) in arb_inputs()) {
        let rows = align(&klines, &events);
        for (row, k) in rows.iter().zip(&klines) {
            prop_assert_eq!(row.time, k.open_time);
            prop_assert_eq!(row.timestamp, floor_to_second(k.open_time));
            prop_assert_eq!(row.open, k.open);
            prop_assert_eq!(row.high, k.high);
            prop_assert_eq!(row.low, k.low);
            prop_assert_eq!(row.close, k.close);
        }
    }
}

// ── Fixed scenario ───────────────────────────────────────────────────

#[test]
fn middle_of_three_gets_the_rate() {
    let t0 = 1_613_347_200_000_i64;
    let klines: Vec<KlineRecord> = (0..3)
        .map(|i| KlineRecord {
            open_time: t0 + i * MINUTE_MS,
            open: 100.0,
            high: 101.0,
            low: 99.0,
            close: 100.5,
        })
        .collect();
    let events = vec![FundingRateRecord {
        symbol: "BTCUSDT".into(),
        funding_time: t0 + MINUTE_MS,
        funding_rate: 0.000_375,
    }];

    let rows = align(&klines, &events);

    assert!(rows[0].funding_rate.is_none());
    assert_eq!(rows[1].funding_rate, Some(0.000_375));
    assert!(rows[2].funding_rate.is_none());
}
