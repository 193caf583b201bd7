//! Webhook configuration.
//!
//! The maximum timeout is sourced from the `secondsTimeout` environment key.
//! The raw value is captured once at startup by `main` and injected into the
//! webhook state; the decision logic never reads process environment itself.

use crate::error::{Error, Result};

/// Route annotation carrying the requested HAProxy timeout
pub const TIMEOUT_ANNOTATION: &str = "haproxy.router.openshift.io/timeout";

/// Namespace label that exempts Routes from the timeout ceiling
pub const BYPASS_TIMEOUT_LABEL: &str = "haproxy.router.dana.io/bypass-timeout";

/// The bypass label only takes effect with exactly this value
pub const BYPASS_TIMEOUT_VALUE: &str = "true";

/// Environment key for the maximum timeout, in seconds
pub const MAX_TIMEOUT_SECONDS_KEY: &str = "secondsTimeout";

/// Ceiling applied when `secondsTimeout` is unset
pub const DEFAULT_MAX_TIMEOUT_SECONDS: f64 = 600.0;

/// Configuration for admission decisions.
///
/// Holds the raw (unparsed) ceiling setting so that a malformed value
/// surfaces as a per-request configuration error rather than being silently
/// replaced by the default. Safe for unsynchronized concurrent reads.
#[derive(Debug, Clone, Default)]
pub struct AdmissionConfig {
    raw_max_timeout: Option<String>,
}

impl AdmissionConfig {
    /// Create a config from an explicit raw ceiling setting
    pub fn new(raw_max_timeout: Option<String>) -> Self {
        Self { raw_max_timeout }
    }

    /// Capture the ceiling setting from the process environment
    pub fn from_env() -> Self {
        Self::new(std::env::var(MAX_TIMEOUT_SECONDS_KEY).ok())
    }

    /// Resolve the maximum timeout in seconds.
    ///
    /// Absent (or empty) setting falls back to
    /// [`DEFAULT_MAX_TIMEOUT_SECONDS`]. A value that is present but not
    /// parsable as a float is an operator error, not a validation denial.
    pub fn max_timeout_seconds(&self) -> Result<f64> {
        match self.raw_max_timeout.as_deref() {
            None | Some("") => Ok(DEFAULT_MAX_TIMEOUT_SECONDS),
            Some(raw) => raw.parse::<f64>().map_err(|source| Error::Config {
                value: raw.to_string(),
                source,
            }),
        }
    }
}
