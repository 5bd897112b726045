//! Binance USD-M futures market data provider.
//!
//! Fetches klines from `/fapi/v1/klines` (paged) and funding events from
//! `/fapi/v1/fundingRate` (one request per call) over the blocking reqwest
//! client. Transport and HTTP failures are mapped to [`DataError`] and
//! returned as-is: there is no retry and no circuit breaker.

use super::provider::{DataError, MarketDataProvider};
use crate::domain::{FundingRateRecord, KlineInterval, KlineRecord};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://fapi.binance.com";
const KLINES_PATH: &str = "/fapi/v1/klines";
const FUNDING_PATH: &str = "/fapi/v1/fundingRate";
const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Largest kline page the exchange serves.
pub const MAX_KLINE_PAGE_LIMIT: u32 = 1500;
/// Largest funding-rate response the exchange serves.
pub const MAX_FUNDING_LIMIT: u32 = 1000;

/// Kline row as sent by the exchange:
/// `[open_time, open, high, low, close, volume, close_time, quote_volume,
///   trades, taker_base_volume, taker_quote_volume, ignore]`.
#[derive(Debug, Deserialize)]
struct RawKline(
    i64,
    String,
    String,
    String,
    String,
    IgnoredAny,
    IgnoredAny,
    IgnoredAny,
    IgnoredAny,
    IgnoredAny,
    IgnoredAny,
    IgnoredAny,
);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFunding {
    symbol: String,
    funding_time: i64,
    funding_rate: String,
}

/// Error body returned alongside 4xx statuses.
#[derive(Debug, Deserialize)]
struct ApiError {
    code: i64,
    msg: String,
}

/// Connection settings for the futures REST API.
#[derive(Debug, Clone)]
pub struct BinanceSettings {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    /// Rows requested per kline page, clamped to [`MAX_KLINE_PAGE_LIMIT`].
    pub kline_page_limit: u32,
    /// Events requested per funding call, clamped to [`MAX_FUNDING_LIMIT`].
    pub funding_limit: u32,
}

impl Default for BinanceSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(30),
            kline_page_limit: MAX_KLINE_PAGE_LIMIT,
            funding_limit: MAX_FUNDING_LIMIT,
        }
    }
}

/// Binance USD-M futures provider.
pub struct BinanceFuturesProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    kline_page_limit: u32,
    funding_limit: u32,
}

impl BinanceFuturesProvider {
    pub fn new(settings: BinanceSettings) -> Result<Self, DataError> {
        let mut headers = HeaderMap::new();
        if !settings.api_key.is_empty() {
            let mut key = HeaderValue::from_str(&settings.api_key)
                .map_err(|e| DataError::ClientSetup(format!("invalid API key header: {e}")))?;
            key.set_sensitive(true);
            headers.insert(API_KEY_HEADER, key);
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(settings.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| DataError::ClientSetup(e.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            // A short page ends pagination, so the page size must not exceed
            // what the exchange will return.
            kline_page_limit: settings.kline_page_limit.clamp(1, MAX_KLINE_PAGE_LIMIT),
            funding_limit: settings.funding_limit.clamp(1, MAX_FUNDING_LIMIT),
        })
    }

    /// GET `path` with `query` and decode the JSON body.
    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, DataError> {
        let url = format!("{}{path}", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(query)
            .send()
            .map_err(|e| DataError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            let body = resp.text().unwrap_or_default();
            return Err(classify_status(status.as_u16(), retry_after, &body));
        }

        let body = resp
            .text()
            .map_err(|e| DataError::Transport(e.to_string()))?;
        serde_json::from_str(&body)
            .map_err(|e| DataError::ResponseFormat(format!("{path}: {e}")))
    }

    fn kline_page(
        &self,
        symbol: &str,
        interval: KlineInterval,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<KlineRecord>, DataError> {
        let raw: Vec<RawKline> = self.get_json(
            KLINES_PATH,
            &[
                ("symbol", symbol.to_string()),
                ("interval", interval.code().to_string()),
                ("startTime", start_ms.to_string()),
                ("endTime", end_ms.to_string()),
                ("limit", self.kline_page_limit.to_string()),
            ],
        )?;
        raw.into_iter().map(kline_from_raw).collect()
    }
}

impl MarketDataProvider for BinanceFuturesProvider {
    fn name(&self) -> &str {
        "binance_usdm_futures"
    }

    fn fetch_klines(
        &self,
        symbol: &str,
        interval: KlineInterval,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<KlineRecord>, DataError> {
        let mut klines = Vec::new();
        let mut cursor = start_ms;

        while cursor <= end_ms {
            let page = self.kline_page(symbol, interval, cursor, end_ms)?;
            let page_len = page.len();
            let Some(last_open) = page.last().map(|k| k.open_time) else {
                break;
            };
            tracing::debug!(symbol, cursor, rows = page_len, "kline page");
            klines.extend(page);

            if page_len < self.kline_page_limit as usize {
                break;
            }
            cursor = last_open + 1;
        }

        Ok(klines)
    }

    fn fetch_funding_rates(
        &self,
        symbol: &str,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<FundingRateRecord>, DataError> {
        let raw: Vec<RawFunding> = self.get_json(
            FUNDING_PATH,
            &[
                ("symbol", symbol.to_string()),
                ("startTime", start_ms.to_string()),
                ("endTime", end_ms.to_string()),
                ("limit", self.funding_limit.to_string()),
            ],
        )?;
        raw.into_iter().map(funding_from_raw).collect()
    }
}

/// Map a non-2xx response to an error.
fn classify_status(status: u16, retry_after_secs: Option<u64>, body: &str) -> DataError {
    // 418 is the exchange's "IP banned after ignoring 429s".
    if status == 429 || status == 418 {
        return DataError::RateLimited {
            status,
            retry_after_secs,
        };
    }
    match serde_json::from_str::<ApiError>(body) {
        Ok(api) => DataError::Exchange {
            code: api.code,
            msg: api.msg,
        },
        Err(_) => DataError::Http {
            status,
            body: body.to_string(),
        },
    }
}

fn parse_decimal(field: &str, value: &str) -> Result<f64, DataError> {
    value
        .parse::<f64>()
        .map_err(|e| DataError::ResponseFormat(format!("{field} '{value}': {e}")))
}

fn kline_from_raw(raw: RawKline) -> Result<KlineRecord, DataError> {
    Ok(KlineRecord {
        open_time: raw.0,
        open: parse_decimal("open", &raw.1)?,
        high: parse_decimal("high", &raw.2)?,
        low: parse_decimal("low", &raw.3)?,
        close: parse_decimal("close", &raw.4)?,
    })
}

fn funding_from_raw(raw: RawFunding) -> Result<FundingRateRecord, DataError> {
    Ok(FundingRateRecord {
        funding_rate: parse_decimal("fundingRate", &raw.funding_rate)?,
        symbol: raw.symbol,
        funding_time: raw.funding_time,
    })
}
