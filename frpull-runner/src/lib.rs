//! frpull runner: everything between a config file and the CSVs on disk.
//!
//! This crate builds on `frpull-core` to provide:
//! - TOML run configuration with built-in defaults
//! - Exchange credentials from the environment
//! - The per-symbol pipeline (klines, split funding fetch, align, write)
//! - Parallel orchestration with one worker per symbol

pub mod config;
pub mod credentials;
pub mod orchestrator;
pub mod pipeline;
pub mod result;

pub use config::{ConfigError, ExchangeConfig, PullConfig, PullWindow, WINDOW_FORMAT};
pub use credentials::{Credentials, CredentialsError, API_KEY_ENV, API_SECRET_ENV};
pub use orchestrator::{pull_all, NoProgress, PullProgress, RunError, StdoutProgress};
pub use pipeline::pull_symbol;
pub use result::{PullError, RunSummary, SymbolOutcome, SymbolReport};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<PullConfig>();
        assert_sync::<PullConfig>();
        assert_send::<PullWindow>();
        assert_sync::<PullWindow>();
        assert_send::<Credentials>();
        assert_sync::<Credentials>();
    }

    #[test]
    fn outcomes_are_send() {
        assert_send::<SymbolOutcome>();
        assert_send::<PullError>();
        assert_send::<RunSummary>();
    }

    #[test]
    fn progress_reporters_are_send_sync() {
        assert_send::<StdoutProgress>();
        assert_sync::<StdoutProgress>();
        assert_send::<NoProgress>();
        assert_sync::<NoProgress>();
    }
}
