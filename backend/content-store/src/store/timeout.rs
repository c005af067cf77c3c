//! Per-query deadline
//!
//! Each store call runs inside its own `tokio::time::timeout` scope. The
//! scope is dropped when `run_query` returns, on success, error or expiry.
//! Nothing here retries.
//!
//! Dropping the future only stops waiting on the client. Writes therefore
//! run inside [`begin_bounded`], a transaction whose statements the server
//! cancels at the same deadline and which is rolled back unless it reaches
//! its commit. A write reported as timed out never lands.
use crate::error::{StoreError, StoreResult};
use sqlx::{PgPool, Postgres, Transaction};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::error;

/// Await `query` for at most `limit`, classifying the failure.
///
/// `RowNotFound` becomes [`StoreError::NotFound`]; timeouts and every other
/// query error become [`StoreError::Unknown`] and are logged with the
/// operation name.
pub(crate) async fn run_query<F, T>(
    limit: Duration,
    operation: &'static str,
    query: F,
) -> StoreResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match timeout(limit, query).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => match StoreError::from_query(e) {
            StoreError::NotFound => Err(StoreError::NotFound),
            unknown => {
                error!(operation, error = %unknown, "Store query failed");
                Err(unknown)
            }
        },
        Err(_) => {
            error!(
                operation,
                timeout_ms = limit.as_millis() as u64,
                "Store query timed out"
            );
            Err(StoreError::Unknown(timed_out(operation, limit)))
        }
    }
}

/// Open a transaction with `statement_timeout` set to `limit` for its
/// lifetime.
///
/// Dropping the returned transaction without committing rolls it back.
pub(crate) async fn begin_bounded(
    pool: &PgPool,
    limit: Duration,
) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let set_timeout = statement_timeout_sql(limit);
    sqlx::query(&set_timeout).execute(&mut *tx).await?;
    Ok(tx)
}

// SET does not take bind parameters. Zero would disable the timeout.
fn statement_timeout_sql(limit: Duration) -> String {
    format!(
        "SET LOCAL statement_timeout = {}",
        limit.as_millis().max(1)
    )
}

fn timed_out(operation: &str, limit: Duration) -> sqlx::Error {
    sqlx::Error::Io(std::io::Error::new(
        std::io::ErrorKind::TimedOut,
        format!("{operation} exceeded query timeout of {limit:?}"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fast_query_passes_through() {
        let result = run_query(Duration::from_secs(1), "test.fast", async {
            Ok::<_, sqlx::Error>(42)
        })
        .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_query_error_is_unknown() {
        let result = run_query(Duration::from_secs(1), "test.failing", async {
            Err::<i32, _>(sqlx::Error::PoolClosed)
        })
        .await;
        assert!(matches!(result, Err(StoreError::Unknown(sqlx::Error::PoolClosed))));
    }

    #[tokio::test]
    async fn test_row_not_found_is_not_found() {
        let result = run_query(Duration::from_secs(1), "test.missing", async {
            Err::<i32, _>(sqlx::Error::RowNotFound)
        })
        .await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[test]
    fn test_statement_timeout_matches_query_timeout() {
        assert_eq!(
            statement_timeout_sql(Duration::from_secs(5)),
            "SET LOCAL statement_timeout = 5000"
        );
        assert_eq!(
            statement_timeout_sql(Duration::from_micros(10)),
            "SET LOCAL statement_timeout = 1"
        );
    }

    #[tokio::test]
    async fn test_slow_query_times_out_as_unknown() {
        let result = run_query(Duration::from_millis(20), "test.slow", async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, sqlx::Error>(1)
        })
        .await;

        let err = result.unwrap_err();
        assert!(err.is_timeout());
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("test.slow"));
    }
}
