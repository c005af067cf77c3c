//! Data models for the content store
//!
//! - Post: user-authored text with ordered tags and an optimistic-lock version
//! - Comment: text attached to exactly one post and one user
//! - User: account record; the password hash is never serialized
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Post entity
///
/// `version` is the optimistic-concurrency token: every successful update
/// bumps it by exactly one, and an update only applies when the caller still
/// holds the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub content: String,
    pub title: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Stored as a native `TEXT[]`; order survives a round trip
    pub tags: Vec<String>,
    pub version: i32,
    /// Never loaded by the post repository; callers attach them explicitly
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Post {
    /// Unsaved post; identity, timestamps and version come from the store.
    pub fn new(
        user_id: i64,
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            user_id,
            title: title.into(),
            content: content.into(),
            tags,
            ..Self::default()
        }
    }
}

/// Comment entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Only the joined read path fills this in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<CommentAuthor>,
}

impl Comment {
    pub fn new(post_id: i64, user_id: i64, content: impl Into<String>) -> Self {
        Self {
            post_id,
            user_id,
            content: content.into(),
            ..Self::default()
        }
    }
}

/// Read-only projection of the user who wrote a comment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub id: i64,
    pub username: String,
}

/// User entity
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Already hashed by the caller
    #[serde(skip_serializing, default)]
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl User {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password_hash.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_password_is_never_serialized() {
        let user = User::new("ada", "ada@example.com", "$argon2id$v=19$hash");
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["username"], "ada");
        assert_eq!(json["email"], "ada@example.com");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_user_debug_redacts_password() {
        let user = User::new("ada", "ada@example.com", "$argon2id$v=19$secret");
        let rendered = format!("{:?}", user);

        assert!(rendered.contains("ada@example.com"));
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_post_json_field_names() {
        let post = Post::new(9, "Hello", "First post", vec!["rust".into(), "sql".into()]);
        let json = serde_json::to_value(&post).unwrap();

        assert_eq!(json["user_id"], 9);
        assert_eq!(json["tags"], serde_json::json!(["rust", "sql"]));
        assert_eq!(json["version"], 0);
        assert_eq!(json["comments"], serde_json::json!([]));
        assert!(json.get("created_at").is_some());
        assert!(json.get("updated_at").is_some());
    }

    #[test]
    fn test_comment_author_only_serialized_when_joined() {
        let mut comment = Comment::new(1, 2, "nice");
        let json = serde_json::to_value(&comment).unwrap();
        assert!(json.get("user").is_none());

        comment.user = Some(CommentAuthor {
            id: 2,
            username: "grace".into(),
        });
        let json = serde_json::to_value(&comment).unwrap();
        assert_eq!(json["user"]["username"], "grace");
        assert_eq!(json["post_id"], 1);
    }

    #[test]
    fn test_new_post_is_unsaved() {
        let post = Post::new(3, "t", "c", vec![]);
        assert_eq!(post.id, 0);
        assert_eq!(post.version, 0);
        assert!(post.comments.is_empty());
    }
}
