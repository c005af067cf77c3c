use crate::config::StoreConfig;
use crate::error::StoreResult;
use crate::models::User;
use crate::store::timeout::{begin_bounded, run_query};
use crate::store::unknown_on_insert;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

/// User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user whose password is already hashed. `id` and
    /// `created_at` are written back into `user`.
    async fn create(&self, user: &mut User) -> StoreResult<()>;
}

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
    config: StoreConfig,
}

impl PgUserStore {
    pub fn new(pool: PgPool, config: StoreConfig) -> Self {
        Self { pool, config }
    }
}

#[async_trait]
impl UserRepository for PgUserStore {
    #[tracing::instrument(skip(self, user), fields(username = %user.username))]
    async fn create(&self, user: &mut User) -> StoreResult<()> {
        let limit = self.config.query_timeout;
        let (id, created_at) = run_query(limit, "users.create", async {
            let mut tx = begin_bounded(&self.pool, limit).await?;
            let row = sqlx::query_as::<_, (i64, DateTime<Utc>)>(
                r#"
                INSERT INTO users (username, password, email)
                VALUES ($1, $2, $3)
                RETURNING id, created_at
                "#,
            )
            .bind(&user.username)
            .bind(&user.password)
            .bind(&user.email)
            .fetch_one(&mut *tx)
            .await?;
            tx.commit().await?;
            Ok::<_, sqlx::Error>(row)
        })
        .await
        .map_err(unknown_on_insert)?;

        user.id = id;
        user.created_at = created_at;

        debug!(user_id = id, "User created");
        Ok(())
    }
}
