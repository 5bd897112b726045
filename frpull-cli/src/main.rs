//! frpull CLI: pull Binance USD-M perpetual klines and funding rates.
//!
//! Commands:
//! - `pull`: fetch every configured symbol in parallel and write one CSV each
//! - `intervals`: list the supported kline intervals
//! - `config`: print the default configuration as TOML

mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use frpull_core::data::{BinanceFuturesProvider, CsvSink};
use frpull_core::domain::KlineInterval;
use frpull_runner::{pull_all, Credentials, PullConfig, RunSummary, StdoutProgress};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "frpull",
    version,
    about = "Pull perpetual-futures klines and funding rates into per-symbol CSV files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch klines and funding rates for every configured symbol.
    Pull {
        /// Path to a TOML config file. Built-in defaults apply without one.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the config's output directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// List supported kline intervals.
    Intervals,
    /// Print the default configuration as TOML.
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Pull { config, output_dir } => run_pull(config, output_dir),
        Commands::Intervals => {
            for interval in KlineInterval::ALL {
                println!("{interval}");
            }
            Ok(())
        }
        Commands::Config => {
            print!("{}", PullConfig::default().to_toml()?);
            Ok(())
        }
    }
}

fn run_pull(config_path: Option<PathBuf>, output_dir: Option<PathBuf>) -> Result<()> {
    let mut config = match &config_path {
        Some(path) => PullConfig::from_file(path)?,
        None => PullConfig::default(),
    };
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }
    let window = config.validate().context("invalid configuration")?;

    // Nothing starts without credentials.
    let credentials = match Credentials::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    logging::init_logging(&config.log_file)?;

    let provider = BinanceFuturesProvider::new(config.binance_settings(&credentials))
        .context("failed to build exchange client")?;
    let sink = CsvSink::new(&config.output_dir);

    let summary = pull_all(&provider, &sink, &config.symbols, &window, &StdoutProgress)?;
    print_summary(&summary)?;

    if !summary.all_succeeded() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) -> Result<()> {
    let stdout = std::io::stdout();
    write_summary(&mut stdout.lock(), summary)?;
    Ok(())
}

/// One line per symbol, successes and failures alike, in configured order.
fn write_summary(out: &mut impl Write, summary: &RunSummary) -> std::io::Result<()> {
    writeln!(out)?;
    for outcome in &summary.outcomes {
        match &outcome.result {
            Ok(report) => writeln!(
                out,
                "  {:<10} {:>7} rows  {:>5} funded  {}  blake3:{}",
                outcome.symbol,
                report.rows,
                report.funded_rows,
                report.path.display(),
                &report.content_hash[..12.min(report.content_hash.len())]
            )?,
            Err(e) => writeln!(out, "  {:<10} FAILED: {e}", outcome.symbol)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use frpull_core::data::DataError;
    use frpull_runner::{PullError, SymbolOutcome, SymbolReport};

    #[test]
    fn summary_lists_failures_with_successes() {
        let summary = RunSummary::from_outcomes(vec![
            SymbolOutcome {
                symbol: "BTCUSDT".into(),
                result: Ok(SymbolReport {
                    rows: 6480,
                    funded_rows: 14,
                    path: PathBuf::from("data/BTCUSDT.csv"),
                    content_hash: "0123456789abcdef".into(),
                }),
            },
            SymbolOutcome {
                symbol: "ETHUSDT".into(),
                result: Err(PullError::Klines(DataError::Transport("timed out".into()))),
            },
        ]);

        let mut buf = Vec::new();
        write_summary(&mut buf, &summary).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("BTCUSDT") && lines[0].contains("blake3:0123456789ab"));
        assert!(lines[1].contains("ETHUSDT") && lines[1].contains("FAILED"));
    }
}
