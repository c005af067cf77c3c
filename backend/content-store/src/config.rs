//! Store configuration
//!
//! Settings are passed into every repository constructor; nothing here is
//! global or mutable after construction.
use db_pool::env_utils::parse_env_positive;
use std::time::Duration;

/// Upper bound on a single store call when nothing else is configured.
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 5;

/// Repository-level settings shared by the post, comment and user stores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Deadline applied to each query, including time spent waiting for a
    /// pooled connection
    pub query_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            query_timeout: Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS),
        }
    }
}

impl StoreConfig {
    /// Load configuration from `DB_QUERY_TIMEOUT_SECS`.
    ///
    /// Missing, unparsable or zero values keep the default.
    pub fn from_env() -> Self {
        Self {
            query_timeout: Duration::from_secs(parse_env_positive(
                "DB_QUERY_TIMEOUT_SECS",
                DEFAULT_QUERY_TIMEOUT_SECS,
            )),
        }
    }

    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }
}
