//! PostgreSQL-backed `QuestionRepository` using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{QuestionPersistenceError, QuestionRepository};
use crate::domain::{
    MutationOutcome, Question, QuestionId, QuestionText, UserId, apply_conditional,
};

use super::diesel_helpers::{
    collect_rows, is_foreign_key_violation, map_diesel_error, map_pool_error,
};
use super::models::{NewQuestionRow, QuestionRow};
use super::pool::{DbPool, PoolError};
use super::schema::questions;

fn pool_fault(error: PoolError) -> QuestionPersistenceError {
    map_pool_error(error)
}

fn diesel_fault(error: diesel::result::Error, operation: &str) -> QuestionPersistenceError {
    map_diesel_error(error, operation)
}

/// Diesel-backed implementation of the [`QuestionRepository`] port.
#[derive(Clone)]
pub struct DieselQuestionRepository {
    pool: DbPool,
}

impl DieselQuestionRepository {
    /// Build the repository over a shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestionRepository for DieselQuestionRepository {
    async fn insert(&self, question: &Question) -> Result<(), QuestionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_fault)?;
        let row = NewQuestionRow {
            id: *question.id().as_uuid(),
            target_user_id: *question.target_user_id().as_uuid(),
            message: question.message().as_ref(),
            favourite: question.favourite(),
            signature: question.signature().map(AsRef::as_ref),
        };

        diesel::insert_into(questions::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    QuestionPersistenceError::unknown_target(question.target_user_id().to_string())
                } else {
                    diesel_fault(err, "insert question")
                }
            })
    }

    async fn find_by_target(
        &self,
        target_user_id: &UserId,
    ) -> Result<Vec<Question>, QuestionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_fault)?;

        let rows: Vec<QuestionRow> = questions::table
            .filter(questions::target_user_id.eq(target_user_id.as_uuid()))
            .order_by(questions::created_at.desc())
            .select(QuestionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| diesel_fault(err, "list questions"))?;

        collect_rows(rows.into_iter().map(Question::try_from), |message| {
            QuestionPersistenceError::query(message)
        })
    }

    async fn set_reply(
        &self,
        id: QuestionId,
        target_user_id: &UserId,
        reply: &QuestionText,
    ) -> Result<MutationOutcome, QuestionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_fault)?;

        apply_conditional(async {
            diesel::update(questions::table)
                .filter(questions::id.eq(id.as_uuid()))
                .filter(questions::target_user_id.eq(target_user_id.as_uuid()))
                .filter(questions::reply.is_null())
                .set(questions::reply.eq(Some(reply.as_ref())))
                .execute(&mut conn)
                .await
                .map_err(|err| diesel_fault(err, "set question reply"))
        })
        .await
    }

    async fn set_favourite(
        &self,
        id: QuestionId,
        target_user_id: &UserId,
    ) -> Result<MutationOutcome, QuestionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_fault)?;

        apply_conditional(async {
            diesel::update(questions::table)
                .filter(questions::id.eq(id.as_uuid()))
                .filter(questions::target_user_id.eq(target_user_id.as_uuid()))
                .set(questions::favourite.eq(true))
                .execute(&mut conn)
                .await
                .map_err(|err| diesel_fault(err, "set question favourite"))
        })
        .await
    }

    async fn delete(
        &self,
        id: QuestionId,
        target_user_id: &UserId,
    ) -> Result<MutationOutcome, QuestionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_fault)?;

        apply_conditional(async {
            diesel::delete(questions::table)
                .filter(questions::id.eq(id.as_uuid()))
                .filter(questions::target_user_id.eq(target_user_id.as_uuid()))
                .execute(&mut conn)
                .await
                .map_err(|err| diesel_fault(err, "delete question"))
        })
        .await
    }
}
