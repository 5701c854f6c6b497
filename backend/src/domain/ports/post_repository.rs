//! Port abstraction for post persistence.
//!
//! `update` and `soft_delete` are conditional: adapters must run each as a
//! single storage command filtered by id, owner, and "not deleted", and
//! classify the affected count with
//! [`MutationOutcome::from_affected`](crate::domain::MutationOutcome::from_affected).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{MutationOutcome, Post, PostDraft, PostId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by post repository adapters.
    pub enum PostPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
    }
}

/// Storage for posts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Store a new live post.
    async fn insert(&self, post: &Post) -> Result<(), PostPersistenceError>;

    /// Live posts of `owner_id`, newest first.
    async fn find_live_by_owner(&self, owner_id: &UserId)
    -> Result<Vec<Post>, PostPersistenceError>;

    /// Replace title and content where id and owner match and the post is live.
    async fn update(
        &self,
        id: PostId,
        owner_id: &UserId,
        draft: &PostDraft,
    ) -> Result<MutationOutcome, PostPersistenceError>;

    /// Stamp `deleted_at` where id and owner match and the post is live.
    async fn soft_delete(
        &self,
        id: PostId,
        owner_id: &UserId,
        deleted_at: DateTime<Utc>,
    ) -> Result<MutationOutcome, PostPersistenceError>;
}
