//! Run configuration
//!
//! The bounded-wait timeout is the only tunable of a run. It is carried in a
//! [`RunConfig`] handed to every general rather than kept in a global, so two
//! runs with different timeouts can coexist in one process.

use crate::error::{ByzantineError, Result};
use std::time::Duration;

/// Environment variable holding the timeout in milliseconds.
pub const TIMEOUT_ENV: &str = "BYZANTINE_TIMEOUT_MS";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunConfig {
    /// Zero means receivers block until their commander shows up.
    pub timeout: Duration,
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_timeout_ms(self, millis: u64) -> Self {
        self.with_timeout(Duration::from_millis(millis))
    }

    /// Loads `.env` (if any) and reads [`TIMEOUT_ENV`]. A missing variable
    /// leaves the wait unbounded.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        match std::env::var(TIMEOUT_ENV) {
            Ok(raw) => Self::parse_timeout(&raw),
            Err(_) => Ok(Self::default()),
        }
    }

    fn parse_timeout(raw: &str) -> Result<Self> {
        raw.trim()
            .parse::<u64>()
            .map(|ms| Self::new().with_timeout_ms(ms))
            .map_err(|_| ByzantineError::InvalidConfig {
                key: TIMEOUT_ENV,
                value: raw.to_string(),
            })
    }

    /// The receive bound, or `None` when waits are unbounded.
    pub fn wait_bound(&self) -> Option<Duration> {
        if self.timeout.is_zero() {
            None
        } else {
            Some(self.timeout)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unbounded() {
        assert_eq!(RunConfig::default().wait_bound(), None);
        assert_eq!(RunConfig::new().with_timeout_ms(0).wait_bound(), None);
    }

    #[test]
    fn test_timeout_bound() {
        let config = RunConfig::new().with_timeout_ms(250);
        assert_eq!(config.wait_bound(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(
            RunConfig::parse_timeout(" 40 ").unwrap().timeout,
            Duration::from_millis(40)
        );

        match RunConfig::parse_timeout("soon") {
            Err(ByzantineError::InvalidConfig { key, value }) => {
                assert_eq!(key, TIMEOUT_ENV);
                assert_eq!(value, "soon");
            }
            other => panic!("Expected config error, got {:?}", other),
        }
    }
}
