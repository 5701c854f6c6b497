//! PostgreSQL-backed `PostRepository` using Diesel.
//!
//! Update and soft delete are single `UPDATE ... WHERE id = $1 AND owner_id
//! = $2 AND deleted_at IS NULL` statements. PostgreSQL's row lock makes a
//! concurrent second statement re-check the predicate after the first
//! commits, so at most one of them affects the row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PostPersistenceError, PostRepository};
use crate::domain::{MutationOutcome, Post, PostDraft, PostId, UserId, apply_conditional};

use super::diesel_helpers::{collect_rows, map_diesel_error, map_pool_error};
use super::models::{NewPostRow, PostRow, PostUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::posts;

fn pool_fault(error: PoolError) -> PostPersistenceError {
    map_pool_error(error)
}

fn diesel_fault(error: diesel::result::Error, operation: &str) -> PostPersistenceError {
    map_diesel_error(error, operation)
}

/// Diesel-backed implementation of the [`PostRepository`] port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Build the repository over a shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_fault)?;
        let row = NewPostRow {
            id: *post.id().as_uuid(),
            owner_id: *post.owner_id().as_uuid(),
            title: post.title().as_ref(),
            content: post.content().as_ref(),
            created_at: post.created_at(),
        };

        diesel::insert_into(posts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| diesel_fault(err, "insert post"))
    }

    async fn find_live_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<Post>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_fault)?;

        let rows: Vec<PostRow> = posts::table
            .filter(posts::owner_id.eq(owner_id.as_uuid()))
            .filter(posts::deleted_at.is_null())
            .order_by(posts::created_at.desc())
            .select(PostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| diesel_fault(err, "list posts"))?;

        collect_rows(rows.into_iter().map(Post::try_from), |message| {
            PostPersistenceError::query(message)
        })
    }

    async fn update(
        &self,
        id: PostId,
        owner_id: &UserId,
        draft: &PostDraft,
    ) -> Result<MutationOutcome, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_fault)?;
        let changes = PostUpdate {
            title: draft.title().as_ref(),
            content: draft.content().as_ref(),
        };

        apply_conditional(async {
            diesel::update(posts::table)
                .filter(posts::id.eq(id.as_uuid()))
                .filter(posts::owner_id.eq(owner_id.as_uuid()))
                .filter(posts::deleted_at.is_null())
                .set(&changes)
                .execute(&mut conn)
                .await
                .map_err(|err| diesel_fault(err, "update post"))
        })
        .await
    }

    async fn soft_delete(
        &self,
        id: PostId,
        owner_id: &UserId,
        deleted_at: DateTime<Utc>,
    ) -> Result<MutationOutcome, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_fault)?;

        apply_conditional(async {
            diesel::update(posts::table)
                .filter(posts::id.eq(id.as_uuid()))
                .filter(posts::owner_id.eq(owner_id.as_uuid()))
                .filter(posts::deleted_at.is_null())
                .set(posts::deleted_at.eq(Some(deleted_at)))
                .execute(&mut conn)
                .await
                .map_err(|err| diesel_fault(err, "soft delete post"))
        })
        .await
    }
}
