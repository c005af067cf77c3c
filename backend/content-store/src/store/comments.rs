use crate::config::StoreConfig;
use crate::error::StoreResult;
use crate::models::{Comment, CommentAuthor};
use crate::store::timeout::{begin_bounded, run_query};
use crate::store::unknown_on_insert;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

/// Comment persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert a comment and return its new id. `id` and `created_at` are
    /// also written back into `comment`.
    async fn create_comment(&self, comment: &mut Comment) -> StoreResult<i64>;

    /// All comments on a post, newest first, each with its author.
    ///
    /// A post without comments yields an empty vector, not `NotFound`.
    async fn get_by_post_id(&self, post_id: i64) -> StoreResult<Vec<Comment>>;
}

/// PostgreSQL-backed comment repository
#[derive(Clone)]
pub struct PgCommentStore {
    pool: PgPool,
    config: StoreConfig,
}

impl PgCommentStore {
    pub fn new(pool: PgPool, config: StoreConfig) -> Self {
        Self { pool, config }
    }
}

#[async_trait]
impl CommentRepository for PgCommentStore {
    #[tracing::instrument(skip(self, comment), fields(post_id = comment.post_id, user_id = comment.user_id))]
    async fn create_comment(&self, comment: &mut Comment) -> StoreResult<i64> {
        let limit = self.config.query_timeout;
        let (id, created_at) = run_query(limit, "comments.create_comment", async {
            let mut tx = begin_bounded(&self.pool, limit).await?;
            let row = sqlx::query_as::<_, (i64, DateTime<Utc>)>(
                r#"
                INSERT INTO comments (post_id, user_id, content)
                VALUES ($1, $2, $3)
                RETURNING id, created_at
                "#,
            )
            .bind(comment.post_id)
            .bind(comment.user_id)
            .bind(&comment.content)
            .fetch_one(&mut *tx)
            .await?;
            tx.commit().await?;
            Ok::<_, sqlx::Error>(row)
        })
        .await
        .map_err(unknown_on_insert)?;

        comment.id = id;
        comment.created_at = created_at;

        debug!(comment_id = id, "Comment created");
        Ok(id)
    }

    #[tracing::instrument(skip(self))]
    async fn get_by_post_id(&self, post_id: i64) -> StoreResult<Vec<Comment>> {
        // id breaks ties between comments inserted within the same instant
        let rows = run_query(
            self.config.query_timeout,
            "comments.get_by_post_id",
            sqlx::query_as::<_, CommentRow>(
                r#"
                SELECT c.id, c.post_id, c.user_id, c.content, c.created_at,
                       u.username AS author_username, u.id AS author_id
                FROM comments c
                JOIN users u ON u.id = c.user_id
                WHERE c.post_id = $1
                ORDER BY c.created_at DESC, c.id DESC
                "#,
            )
            .bind(post_id)
            .fetch_all(&self.pool),
        )
        .await?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }
}

// Joined row: comment columns plus the author projection
#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    post_id: i64,
    user_id: i64,
    content: String,
    created_at: DateTime<Utc>,
    author_username: String,
    author_id: i64,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            post_id: row.post_id,
            user_id: row.user_id,
            content: row.content,
            created_at: row.created_at,
            user: Some(CommentAuthor {
                id: row.author_id,
                username: row.author_username,
            }),
        }
    }
}
