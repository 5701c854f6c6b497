//! Post services implementing the post driving ports.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};

use crate::domain::ports::{PostCommand, PostPersistenceError, PostQuery, PostRepository};
use crate::domain::{Error, OwnershipGuard, Post, PostDraft, PostId, Principal, UserId};

fn map_repository_error(operation: &'static str, error: PostPersistenceError) -> Error {
    error!(operation, %error, "post repository failure");
    Error::internal(format!("post repository error during {operation}"))
}

/// Post service implementing [`PostCommand`].
#[derive(Clone)]
pub struct PostCommandService<R> {
    posts: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> PostCommandService<R> {
    /// Build the command service; `clock` stamps creation and deletion.
    pub fn new(posts: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { posts, clock }
    }
}

#[async_trait]
impl<R> PostCommand for PostCommandService<R>
where
    R: PostRepository,
{
    async fn create_post(
        &self,
        principal: &Principal,
        owner_id: &UserId,
        draft: PostDraft,
    ) -> Result<Post, Error> {
        OwnershipGuard::require(principal, owner_id)?;

        let post = Post::new(PostId::random(), owner_id.clone(), draft, self.clock.utc());
        self.posts
            .insert(&post)
            .await
            .map_err(|err| map_repository_error("create_post", err))?;

        info!(post_id = %post.id(), owner_id = %owner_id, "created post");
        Ok(post)
    }

    async fn update_post(
        &self,
        principal: &Principal,
        owner_id: &UserId,
        post_id: PostId,
        draft: PostDraft,
    ) -> Result<(), Error> {
        OwnershipGuard::require(principal, owner_id)?;

        self.posts
            .update(post_id, owner_id, &draft)
            .await
            .map_err(|err| map_repository_error("update_post", err))?
            .ensure_applied("post does not exist or was deleted")
    }

    async fn delete_post(
        &self,
        principal: &Principal,
        owner_id: &UserId,
        post_id: PostId,
    ) -> Result<(), Error> {
        OwnershipGuard::require(principal, owner_id)?;

        self.posts
            .soft_delete(post_id, owner_id, self.clock.utc())
            .await
            .map_err(|err| map_repository_error("delete_post", err))?
            .ensure_applied("post does not exist or was deleted")
    }
}

/// Post service implementing [`PostQuery`].
#[derive(Clone)]
pub struct PostQueryService<R> {
    posts: Arc<R>,
}

impl<R> PostQueryService<R> {
    /// Build the query service.
    pub fn new(posts: Arc<R>) -> Self {
        Self { posts }
    }
}

#[async_trait]
impl<R> PostQuery for PostQueryService<R>
where
    R: PostRepository,
{
    async fn list_posts(&self, owner_id: &UserId) -> Result<Vec<Post>, Error> {
        self.posts
            .find_live_by_owner(owner_id)
            .await
            .map_err(|err| map_repository_error("list_posts", err))
    }
}
