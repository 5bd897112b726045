//! CSV sink: one flat file per symbol.
//!
//! Layout: `{output_dir}/{SYMBOL}.csv`
//!
//! Columns: `index,time,open,high,low,close,date,close_diff,fundingRate`
//!
//! - The whole file is rendered in memory first, then written to
//!   `{SYMBOL}.csv.tmp` and renamed into place, so a failed write never
//!   leaves a half-written CSV behind.
//! - The BLAKE3 digest of the bytes written is returned with the receipt.

use crate::domain::MergedRow;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Wall-clock format of the `date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("timestamp {timestamp}s out of range for row {index}")]
    TimestampOutOfRange { index: usize, timestamp: i64 },

    #[error("CSV encoding failed: {0}")]
    Encode(#[from] csv::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// What a successful write produced.
#[derive(Debug, Clone)]
pub struct SinkReceipt {
    pub path: PathBuf,
    pub rows: usize,
    /// BLAKE3 hex digest of the file contents.
    pub content_hash: String,
}

/// On-disk shape of a row.
#[derive(Debug, Serialize)]
struct CsvRow {
    index: usize,
    time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    date: String,
    close_diff: f64,
    #[serde(rename = "fundingRate")]
    funding_rate: Option<f64>,
}

/// Writes merged tables as CSV under one output directory.
#[derive(Debug, Clone)]
pub struct CsvSink {
    output_dir: PathBuf,
}

impl CsvSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Root directory for output files.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the CSV for a symbol: `{output_dir}/{SYMBOL}.csv`
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.output_dir.join(format!("{symbol}.csv"))
    }

    /// Write the merged table for `symbol`, replacing any previous file.
    pub fn write(&self, symbol: &str, rows: &[MergedRow]) -> Result<SinkReceipt, SinkError> {
        let bytes = render_csv(rows)?;

        fs::create_dir_all(&self.output_dir).map_err(|source| SinkError::CreateDir {
            path: self.output_dir.clone(),
            source,
        })?;

        let path = self.path_for(symbol);
        let tmp_path = path.with_extension("csv.tmp");

        fs::write(&tmp_path, &bytes).map_err(|source| SinkError::Write {
            path: tmp_path.clone(),
            source,
        })?;

        // Atomic rename
        fs::rename(&tmp_path, &path).map_err(|source| {
            let _ = fs::remove_file(&tmp_path);
            SinkError::Write {
                path: path.clone(),
                source,
            }
        })?;

        Ok(SinkReceipt {
            path,
            rows: rows.len(),
            content_hash: blake3::hash(&bytes).to_hex().to_string(),
        })
    }
}

/// Render rows to CSV bytes, header included.
pub fn render_csv(rows: &[MergedRow]) -> Result<Vec<u8>, SinkError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for (index, row) in rows.iter().enumerate() {
        let date = row.date().ok_or(SinkError::TimestampOutOfRange {
            index,
            timestamp: row.timestamp,
        })?;
        writer.serialize(CsvRow {
            index,
            time: row.time,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            date: date.format(DATE_FORMAT).to_string(),
            close_diff: row.close_diff,
            funding_rate: row.funding_rate,
        })?;
    }

    // An empty table still gets its header.
    if rows.is_empty() {
        writer.write_record([
            "index",
            "time",
            "open",
            "high",
            "low",
            "close",
            "date",
            "close_diff",
            "fundingRate",
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| SinkError::Encode(csv::Error::from(e.into_error())))
}
