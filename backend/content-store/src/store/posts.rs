use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::models::Post;
use crate::store::timeout::{begin_bounded, run_query};
use crate::store::unknown_on_insert;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, warn};

/// Post persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post. Identity, timestamps and the initial version are
    /// written back into `post`.
    async fn create(&self, post: &mut Post) -> StoreResult<()>;

    /// Fetch a post without its comments
    async fn get_by_id(&self, id: i64) -> StoreResult<Post>;

    /// Apply title, content and tags if the stored version still equals
    /// `post.version`. On success `post.version` holds the new value.
    ///
    /// A stale version and a missing row both yield `NotFound`.
    async fn update_post(&self, post: &mut Post, id: i64) -> StoreResult<()>;

    async fn delete_post(&self, id: i64) -> StoreResult<()>;
}

/// PostgreSQL-backed post repository
#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
    config: StoreConfig,
}

impl PgPostStore {
    pub fn new(pool: PgPool, config: StoreConfig) -> Self {
        Self { pool, config }
    }
}

#[async_trait]
impl PostRepository for PgPostStore {
    #[tracing::instrument(skip(self, post), fields(user_id = post.user_id))]
    async fn create(&self, post: &mut Post) -> StoreResult<()> {
        let limit = self.config.query_timeout;
        let (id, created_at, updated_at, version) = run_query(limit, "posts.create", async {
            let mut tx = begin_bounded(&self.pool, limit).await?;
            let row = sqlx::query_as::<_, (i64, DateTime<Utc>, DateTime<Utc>, i32)>(
                r#"
                INSERT INTO posts (content, title, user_id, tags)
                VALUES ($1, $2, $3, $4)
                RETURNING id, created_at, updated_at, version
                "#,
            )
            .bind(&post.content)
            .bind(&post.title)
            .bind(post.user_id)
            .bind(&post.tags)
            .fetch_one(&mut *tx)
            .await?;
            tx.commit().await?;
            Ok::<_, sqlx::Error>(row)
        })
        .await
        .map_err(unknown_on_insert)?;

        post.id = id;
        post.created_at = created_at;
        post.updated_at = updated_at;
        post.version = version;

        debug!(post_id = id, "Post created");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn get_by_id(&self, id: i64) -> StoreResult<Post> {
        let row = run_query(
            self.config.query_timeout,
            "posts.get_by_id",
            sqlx::query_as::<_, PostRow>(
                r#"
                SELECT id, user_id, title, content, created_at, updated_at, tags, version
                FROM posts
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_one(&self.pool),
        )
        .await?;

        Ok(row.into())
    }

    #[tracing::instrument(skip(self, post), fields(expected_version = post.version))]
    async fn update_post(&self, post: &mut Post, id: i64) -> StoreResult<()> {
        let limit = self.config.query_timeout;
        let result = run_query(limit, "posts.update_post", async {
            let mut tx = begin_bounded(&self.pool, limit).await?;
            let row = sqlx::query_as::<_, (i32, DateTime<Utc>)>(
                r#"
                UPDATE posts
                SET title = $1, content = $2, tags = $3, version = version + 1, updated_at = NOW()
                WHERE id = $4 AND version = $5
                RETURNING version, updated_at
                "#,
            )
            .bind(&post.title)
            .bind(&post.content)
            .bind(&post.tags)
            .bind(id)
            .bind(post.version)
            .fetch_one(&mut *tx)
            .await?;
            tx.commit().await?;
            Ok::<_, sqlx::Error>(row)
        })
        .await;

        match result {
            Ok((version, updated_at)) => {
                post.version = version;
                post.updated_at = updated_at;
                debug!(post_id = id, version, "Post updated");
                Ok(())
            }
            Err(StoreError::NotFound) => {
                warn!(
                    post_id = id,
                    expected_version = post.version,
                    "Post update matched no row (missing or stale version)"
                );
                Err(StoreError::NotFound)
            }
            Err(e) => Err(e),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn delete_post(&self, id: i64) -> StoreResult<()> {
        let limit = self.config.query_timeout;
        let result = run_query(limit, "posts.delete_post", async {
            let mut tx = begin_bounded(&self.pool, limit).await?;
            let result = sqlx::query("DELETE FROM posts WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            Ok::<_, sqlx::Error>(result)
        })
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        debug!(post_id = id, "Post deleted");
        Ok(())
    }
}

// Database row representation
#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    user_id: i64,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    tags: Vec<String>,
    version: i32,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            content: row.content,
            title: row.title,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            tags: row.tags,
            version: row.version,
            comments: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use db_pool::{create_lazy_pool, DbConfig};
    use std::time::Duration;

    fn unreachable_store() -> PgPostStore {
        let config = DbConfig {
            database_url: "postgres://nobody@127.0.0.1:1/social".to_string(),
            min_connections: 0,
            acquire_timeout_secs: 1,
            ..DbConfig::default()
        };
        let pool = create_lazy_pool(&config).unwrap();
        PgPostStore::new(
            pool,
            StoreConfig::default().with_query_timeout(Duration::from_millis(300)),
        )
    }

    #[test]
    fn test_row_conversion_leaves_comments_empty() {
        let now = Utc::now();
        let post: Post = PostRow {
            id: 4,
            user_id: 2,
            title: "title".into(),
            content: "content".into(),
            created_at: now,
            updated_at: now,
            tags: vec!["b".into(), "a".into()],
            version: 3,
        }
        .into();

        assert_eq!(post.id, 4);
        assert_eq!(post.tags, vec!["b".to_string(), "a".to_string()]);
        assert_eq!(post.version, 3);
        assert!(post.comments.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_database_is_unknown_not_not_found() {
        let store = unreachable_store();

        let err = store.get_by_id(1).await.unwrap_err();
        assert!(matches!(err, StoreError::Unknown(_)));

        let err = store.delete_post(1).await.unwrap_err();
        assert!(matches!(err, StoreError::Unknown(_)));
    }

    #[tokio::test]
    async fn test_failed_update_keeps_caller_version() {
        let store = unreachable_store();
        let mut post = Post::new(1, "t", "c", vec![]);
        post.version = 7;

        assert!(store.update_post(&mut post, 1).await.is_err());
        assert_eq!(post.version, 7);
    }
}
