//! Serializable run configuration.
//!
//! Every field has a default, so an empty TOML file (or no file at all)
//! describes the standard run: four USDT perpetuals, 1m klines,
//! 2021-02-15 00:00 to 2021-02-19 12:00 UTC, output under `data/`.

use chrono::{NaiveDateTime, TimeZone, Utc};
use frpull_core::data::{BinanceSettings, MAX_FUNDING_LIMIT, MAX_KLINE_PAGE_LIMIT};
use frpull_core::domain::KlineInterval;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::credentials::Credentials;

/// Format of `start` / `end` in the config file (UTC).
pub const WINDOW_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid {field} '{value}' (expected YYYY-MM-DD HH:MM:SS): {source}")]
    InvalidDate {
        field: &'static str,
        value: String,
        source: chrono::ParseError,
    },

    #[error("empty window: start {start} is not before end {end}")]
    EmptyWindow { start: String, end: String },

    #[error("symbol list is empty")]
    NoSymbols,

    #[error("invalid symbol '{0}' (expected ASCII letters and digits)")]
    InvalidSymbol(String),

    #[error("symbol '{0}' listed more than once")]
    DuplicateSymbol(String),

    #[error("exchange.{0} must be greater than zero")]
    ZeroLimit(&'static str),

    #[error("exchange.{field} is {value}, above the exchange maximum of {max}")]
    LimitAboveMax {
        field: &'static str,
        value: u32,
        max: u32,
    },
}

/// Exchange connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExchangeConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub kline_page_limit: u32,
    pub funding_limit: u32,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        let defaults = BinanceSettings::default();
        Self {
            base_url: defaults.base_url,
            timeout_secs: defaults.timeout.as_secs(),
            kline_page_limit: defaults.kline_page_limit,
            funding_limit: defaults.funding_limit,
        }
    }
}

/// Full configuration for one batch run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PullConfig {
    /// Perpetual contracts to pull, one worker each.
    pub symbols: Vec<String>,
    pub interval: KlineInterval,
    /// Window start, UTC, `YYYY-MM-DD HH:MM:SS`.
    pub start: String,
    /// Window end, UTC, `YYYY-MM-DD HH:MM:SS`.
    pub end: String,
    /// Directory for `{SYMBOL}.csv` files (created if absent).
    pub output_dir: PathBuf,
    /// Append-only log of WARN and above.
    pub log_file: PathBuf,
    pub exchange: ExchangeConfig,
}

impl Default for PullConfig {
    fn default() -> Self {
        Self {
            symbols: ["BTCUSDT", "ETHUSDT", "LTCUSDT", "LINKUSDT"]
                .into_iter()
                .map(String::from)
                .collect(),
            interval: KlineInterval::OneMinute,
            start: "2021-02-15 00:00:00".to_string(),
            end: "2021-02-19 12:00:00".to_string(),
            output_dir: PathBuf::from("data"),
            log_file: PathBuf::from("warns.log"),
            exchange: ExchangeConfig::default(),
        }
    }
}

/// Resolved time window for a run, epoch milliseconds, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullWindow {
    pub interval: KlineInterval,
    pub start_ms: i64,
    pub end_ms: i64,
}

impl PullConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string. Missing fields take defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize the config to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the whole config and resolve the time window.
    pub fn validate(&self) -> Result<PullWindow, ConfigError> {
        if self.symbols.is_empty() {
            return Err(ConfigError::NoSymbols);
        }
        let mut seen = HashSet::new();
        for symbol in &self.symbols {
            // Symbols become file names.
            if symbol.is_empty() || !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(ConfigError::InvalidSymbol(symbol.clone()));
            }
            if !seen.insert(symbol.as_str()) {
                return Err(ConfigError::DuplicateSymbol(symbol.clone()));
            }
        }

        check_limit(
            "kline_page_limit",
            self.exchange.kline_page_limit,
            MAX_KLINE_PAGE_LIMIT,
        )?;
        check_limit("funding_limit", self.exchange.funding_limit, MAX_FUNDING_LIMIT)?;

        let start_ms = parse_utc_ms("start", &self.start)?;
        let end_ms = parse_utc_ms("end", &self.end)?;
        if start_ms >= end_ms {
            return Err(ConfigError::EmptyWindow {
                start: self.start.clone(),
                end: self.end.clone(),
            });
        }

        Ok(PullWindow {
            interval: self.interval,
            start_ms,
            end_ms,
        })
    }

    /// Provider settings for this config and a set of credentials.
    pub fn binance_settings(&self, credentials: &Credentials) -> BinanceSettings {
        BinanceSettings {
            base_url: self.exchange.base_url.clone(),
            api_key: credentials.api_key().to_string(),
            timeout: Duration::from_secs(self.exchange.timeout_secs),
            kline_page_limit: self.exchange.kline_page_limit,
            funding_limit: self.exchange.funding_limit,
        }
    }
}

fn check_limit(field: &'static str, value: u32, max: u32) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::ZeroLimit(field));
    }
    if value > max {
        return Err(ConfigError::LimitAboveMax { field, value, max });
    }
    Ok(())
}

fn parse_utc_ms(field: &'static str, value: &str) -> Result<i64, ConfigError> {
    let naive = NaiveDateTime::parse_from_str(value, WINDOW_FORMAT).map_err(|source| {
        ConfigError::InvalidDate {
            field,
            value: value.to_string(),
            source,
        }
    })?;
    Ok(Utc.from_utc_datetime(&naive).timestamp_millis())
}
