//! Exchange API credentials.
//!
//! Read from `BINANCE_API_KEY` / `BINANCE_API_SECRET`. A run without both is
//! refused at startup; callers treat [`CredentialsError`] as fatal.

use std::fmt;
use thiserror::Error;

pub const API_KEY_ENV: &str = "BINANCE_API_KEY";
pub const API_SECRET_ENV: &str = "BINANCE_API_SECRET";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("can't run without exchange API credentials: {var} is not set")]
    Missing { var: &'static str },
}

/// API key/secret pair.
///
/// Only the key goes on the wire (market-data endpoints are unsigned); the
/// secret is held so a run fails up front rather than half-way through.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, CredentialsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CredentialsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fetch = |var: &'static str| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .ok_or(CredentialsError::Missing { var })
        };
        Ok(Self::new(fetch(API_KEY_ENV)?, fetch(API_SECRET_ENV)?))
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Not sent by the unsigned market-data calls; exposed for signed
    /// endpoints built on the same credentials.
    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn both_present() {
        let creds = Credentials::from_lookup(lookup_from(&[
            (API_KEY_ENV, "k"),
            (API_SECRET_ENV, "s"),
        ]))
        .unwrap();
        assert_eq!(creds.api_key(), "k");
        assert_eq!(creds.api_secret(), "s");
    }

    #[test]
    fn missing_key_reported_first() {
        let err = Credentials::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err, CredentialsError::Missing { var: API_KEY_ENV });
    }

    #[test]
    fn blank_secret_is_missing() {
        let err = Credentials::from_lookup(lookup_from(&[
            (API_KEY_ENV, "k"),
            (API_SECRET_ENV, "  "),
        ]))
        .unwrap_err();
        assert_eq!(err, CredentialsError::Missing { var: API_SECRET_ENV });
    }

    #[test]
    fn debug_hides_secret() {
        let creds = Credentials::new("k", "hunter2");
        let shown = format!("{creds:?}");
        assert!(!shown.contains("hunter2"));
    }
}
