//! Content Store Library
//!
//! Persistence layer for posts, comments and users of the social platform.
//! Handler code talks to [`Storage`], never to SQL directly.
//!
//! # Modules
//!
//! - `models`: Post, Comment and User records
//! - `store`: repository traits, their PostgreSQL implementations and the facade
//! - `services`: payload validation and request flows on top of the facade
//! - `error`: the two storage error kinds handlers branch on
//! - `config`: store-level settings (query timeout)
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use models::{Comment, CommentAuthor, Post, User};
pub use store::{CommentRepository, PostRepository, Storage, UserRepository};
