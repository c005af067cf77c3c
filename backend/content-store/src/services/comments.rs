//! Comment service - creation and listing of comments on a post
use crate::models::Comment;
use crate::services::ServiceResult;
use crate::store::Storage;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

/// Body of a "comment on post" request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentPayload {
    #[validate(length(min = 1, max = 100))]
    pub content: String,
}

#[derive(Clone)]
pub struct CommentService {
    storage: Storage,
}

impl CommentService {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Validate the payload and store it as a comment by `author_id`.
    ///
    /// The author comes from the caller's authenticated identity. A missing
    /// post is reported as `NotFound` before anything is written.
    #[tracing::instrument(skip(self, payload))]
    pub async fn create_comment(
        &self,
        post_id: i64,
        author_id: i64,
        payload: CreateCommentPayload,
    ) -> ServiceResult<i64> {
        payload.validate()?;

        let post = self.storage.posts.get_by_id(post_id).await?;
        let mut comment = Comment::new(post.id, author_id, payload.content);
        let id = self.storage.comments.create_comment(&mut comment).await?;

        info!(comment_id = id, post_id, author_id, "Comment added to post");
        Ok(id)
    }

    /// Comments on an existing post, newest first
    pub async fn list_for_post(&self, post_id: i64) -> ServiceResult<Vec<Comment>> {
        let post = self.storage.posts.get_by_id(post_id).await?;
        Ok(self.storage.comments.get_by_post_id(post.id).await?)
    }
}
