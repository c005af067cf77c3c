//! Post service - create, read, edit and delete posts
use crate::error::StoreError;
use crate::models::Post;
use crate::services::ServiceResult;
use crate::store::Storage;
use serde::Deserialize;
use tracing::{info, warn};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePostPayload {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 1000))]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial edit. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePostPayload {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 1000))]
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    /// Version the client last saw; when set, the edit is rejected unless it
    /// still matches
    pub version: Option<i32>,
}

#[derive(Clone)]
pub struct PostService {
    storage: Storage,
}

impl PostService {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    #[tracing::instrument(skip(self, payload))]
    pub async fn create_post(
        &self,
        author_id: i64,
        payload: CreatePostPayload,
    ) -> ServiceResult<Post> {
        payload.validate()?;

        let mut post = Post::new(author_id, payload.title, payload.content, payload.tags);
        self.storage.posts.create(&mut post).await?;

        info!(post_id = post.id, author_id, "Post created");
        Ok(post)
    }

    /// Load a post and attach its comments, newest first
    pub async fn get_with_comments(&self, id: i64) -> ServiceResult<Post> {
        let mut post = self.storage.posts.get_by_id(id).await?;
        post.comments = self.storage.comments.get_by_post_id(post.id).await?;
        Ok(post)
    }

    /// Apply a partial edit under optimistic locking.
    ///
    /// Losing a race against another editor surfaces as `NotFound`; the
    /// caller should reload and retry.
    #[tracing::instrument(skip(self, payload))]
    pub async fn update_post(&self, id: i64, payload: UpdatePostPayload) -> ServiceResult<Post> {
        payload.validate()?;

        let mut post = self.storage.posts.get_by_id(id).await?;

        if let Some(expected) = payload.version {
            if expected != post.version {
                warn!(
                    post_id = id,
                    expected,
                    stored = post.version,
                    "Rejecting edit based on a stale version"
                );
                return Err(StoreError::NotFound.into());
            }
        }

        if let Some(title) = payload.title {
            post.title = title;
        }
        if let Some(content) = payload.content {
            post.content = content;
        }
        if let Some(tags) = payload.tags {
            post.tags = tags;
        }

        self.storage.posts.update_post(&mut post, id).await?;
        Ok(post)
    }

    pub async fn delete_post(&self, id: i64) -> ServiceResult<()> {
        self.storage.posts.delete_post(id).await?;
        info!(post_id = id, "Post deleted");
        Ok(())
    }
}
