//! Error types for the content store
//!
//! Repositories classify every persistence failure into one of two kinds
//! before it crosses the store boundary. Callers choose between "not found"
//! and "it failed" without looking at sqlx internals.
use http::StatusCode;
use thiserror::Error;

/// SQLSTATE raised when `statement_timeout` cancels a statement
const QUERY_CANCELED: &str = "57014";

/// Storage error kinds
#[derive(Debug, Error)]
pub enum StoreError {
    /// The identity does not exist, the write touched zero rows, or the
    /// version-conditioned update matched nothing (stale version).
    #[error("resource not found")]
    NotFound,

    /// Any other persistence failure, query timeouts included.
    ///
    /// The cause is kept for logs; do not branch on it.
    #[error("storage failure: {0}")]
    Unknown(#[source] sqlx::Error),
}

/// Same classification as [`StoreError::from_query`], so `?` on a raw
/// sqlx error never turns `RowNotFound` into `Unknown`.
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::from_query(err)
    }
}

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// Classify a raw query error.
    ///
    /// `RowNotFound` from a `fetch_one` means the identity is absent; every
    /// other error is opaque.
    pub fn from_query(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Unknown(other),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }

    /// True when the underlying failure was the per-query deadline, on
    /// either the client or the server (`57014`, statement cancelled).
    pub fn is_timeout(&self) -> bool {
        match self {
            StoreError::Unknown(sqlx::Error::Io(io)) => {
                io.kind() == std::io::ErrorKind::TimedOut
            }
            StoreError::Unknown(sqlx::Error::Database(db)) => {
                db.code().as_deref() == Some(QUERY_CANCELED)
            }
            StoreError::Unknown(sqlx::Error::PoolTimedOut) => true,
            _ => false,
        }
    }

    /// HTTP status a handler should answer with
    pub fn status_code(&self) -> StatusCode {
        match self {
            StoreError::NotFound => StatusCode::NOT_FOUND,
            StoreError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
