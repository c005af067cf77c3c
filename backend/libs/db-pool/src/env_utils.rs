//! Environment variable parsing utilities
//!
//! Pool and store settings come from the process environment. These helpers
//! keep the fallback rules in one place so callers never unwrap.

use std::str::FromStr;

use thiserror::Error;

/// Failure to read a required environment variable
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    #[error("environment variable {0} is not set")]
    Missing(String),

    #[error("environment variable {key} has an invalid value: {value}")]
    Invalid { key: String, value: String },
}

/// Parse an environment variable, falling back to `default` when it is
/// missing or unparsable.
///
/// # Example
/// ```ignore
/// let max: u32 = parse_env_with_default("DB_MAX_CONNECTIONS", 20);
/// ```
pub fn parse_env_with_default<T: FromStr>(key: &str, default: T) -> T {
    parse_env_optional(key).unwrap_or(default)
}

/// Parse an environment variable, returning `None` if missing or invalid
pub fn parse_env_optional<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Like [`parse_env_with_default`], but a zero value also falls back.
///
/// Used for durations where zero would disable the bound entirely.
pub fn parse_env_positive(key: &str, default: u64) -> u64 {
    match parse_env_optional::<u64>(key) {
        Some(0) | None => default,
        Some(value) => value,
    }
}

/// Parse a required environment variable
///
/// # Example
/// ```ignore
/// let database_url: String = parse_env_required("DATABASE_URL")?;
/// ```
pub fn parse_env_required<T: FromStr>(key: &str) -> Result<T, EnvError> {
    let value = std::env::var(key).map_err(|_| EnvError::Missing(key.to_string()))?;
    value.trim().parse().map_err(|_| EnvError::Invalid {
        key: key.to_string(),
        value,
    })
}
