//! Database access layer
//!
//! This module provides:
//! - Capability traits for posts, users and comments
//! - Their PostgreSQL implementations, all sharing one pool
//! - [`Storage`], the facade handlers hold instead of concrete stores
pub mod comments;
pub mod posts;
mod timeout;
pub mod users;

pub use comments::{CommentRepository, PgCommentStore};
pub use posts::{PgPostStore, PostRepository};
pub use users::{PgUserStore, UserRepository};

use crate::config::StoreConfig;
use crate::error::StoreError;
use sqlx::PgPool;
use std::sync::Arc;

/// Facade over the three repositories.
///
/// Holds trait objects only, so tests can swap in fakes through
/// [`Storage::from_parts`]. Cloning shares the same repositories.
#[derive(Clone)]
pub struct Storage {
    pub posts: Arc<dyn PostRepository>,
    pub users: Arc<dyn UserRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

impl Storage {
    /// Bind every capability to its PostgreSQL store over the same pool.
    pub fn new(pool: PgPool, config: StoreConfig) -> Self {
        Self {
            posts: Arc::new(PgPostStore::new(pool.clone(), config)),
            users: Arc::new(PgUserStore::new(pool.clone(), config)),
            comments: Arc::new(PgCommentStore::new(pool, config)),
        }
    }

    pub fn from_parts(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            posts,
            users,
            comments,
        }
    }
}

/// An INSERT ... RETURNING always yields a row, so a missing row here is a
/// driver fault rather than an absent identity.
pub(crate) fn unknown_on_insert(err: StoreError) -> StoreError {
    match err {
        StoreError::NotFound => StoreError::Unknown(sqlx::Error::RowNotFound),
        other => other,
    }
}
