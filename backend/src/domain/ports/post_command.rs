//! Driving ports for post writes and reads.
//!
//! Every command takes the authenticated caller and the owner id named by
//! the route; implementations check ownership before touching storage.

use async_trait::async_trait;

use crate::domain::{Error, Post, PostDraft, PostId, Principal, UserId};

/// Owner-scoped post writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostCommand: Send + Sync {
    /// Publish a post for `owner_id`.
    async fn create_post(
        &self,
        principal: &Principal,
        owner_id: &UserId,
        draft: PostDraft,
    ) -> Result<Post, Error>;

    /// Replace title and content of a live post.
    async fn update_post(
        &self,
        principal: &Principal,
        owner_id: &UserId,
        post_id: PostId,
        draft: PostDraft,
    ) -> Result<(), Error>;

    /// Soft delete a live post.
    async fn delete_post(
        &self,
        principal: &Principal,
        owner_id: &UserId,
        post_id: PostId,
    ) -> Result<(), Error>;
}

/// Public post reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostQuery: Send + Sync {
    /// Live posts of `owner_id`, newest first.
    async fn list_posts(&self, owner_id: &UserId) -> Result<Vec<Post>, Error>;
}
