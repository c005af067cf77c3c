//! Request flows over the storage facade
//!
//! Handlers decode a payload, call one of these services and turn the
//! result into a response with [`ServiceError::status_code`].
pub mod comments;
pub mod posts;

pub use comments::{CommentService, CreateCommentPayload};
pub use posts::{CreatePostPayload, PostService, UpdatePostPayload};

use crate::error::StoreError;
use http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid input: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Store(e) => e.status_code(),
        }
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
