//! Question services implementing the question driving ports.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::domain::ports::{
    QuestionCommand, QuestionPersistenceError, QuestionQuery, QuestionRepository,
};
use crate::domain::{
    Error, OwnershipGuard, Principal, Question, QuestionId, QuestionText, Signature, UserId,
};

const QUESTION_MISSING: &str = "question does not exist for this user";

fn map_repository_error(operation: &'static str, error: QuestionPersistenceError) -> Error {
    match error {
        QuestionPersistenceError::UnknownTarget { .. } => Error::invalid_request(error.to_string()),
        QuestionPersistenceError::Connection { .. } | QuestionPersistenceError::Query { .. } => {
            error!(operation, %error, "question repository failure");
            Error::internal(format!("question repository error during {operation}"))
        }
    }
}

/// Question service implementing [`QuestionCommand`].
#[derive(Clone)]
pub struct QuestionCommandService<R> {
    questions: Arc<R>,
}

impl<R> QuestionCommandService<R> {
    /// Build the command service.
    pub fn new(questions: Arc<R>) -> Self {
        Self { questions }
    }
}

#[async_trait]
impl<R> QuestionCommand for QuestionCommandService<R>
where
    R: QuestionRepository,
{
    async fn ask(
        &self,
        target_user_id: &UserId,
        message: QuestionText,
        signature: Option<Signature>,
    ) -> Result<Question, Error> {
        let question = Question::new(
            QuestionId::random(),
            target_user_id.clone(),
            message,
            signature,
        );
        self.questions
            .insert(&question)
            .await
            .map_err(|err| map_repository_error("ask", err))?;

        info!(
            question_id = %question.id(),
            target_user_id = %target_user_id,
            signed = question.signature().is_some(),
            "question asked"
        );
        Ok(question)
    }

    async fn reply(
        &self,
        principal: &Principal,
        target_user_id: &UserId,
        question_id: QuestionId,
        reply: QuestionText,
    ) -> Result<(), Error> {
        OwnershipGuard::require(principal, target_user_id)?;

        self.questions
            .set_reply(question_id, target_user_id, &reply)
            .await
            .map_err(|err| map_repository_error("reply", err))?
            .ensure_applied("question does not exist or is already answered")
    }

    async fn mark_favourite(
        &self,
        principal: &Principal,
        target_user_id: &UserId,
        question_id: QuestionId,
    ) -> Result<(), Error> {
        OwnershipGuard::require(principal, target_user_id)?;

        self.questions
            .set_favourite(question_id, target_user_id)
            .await
            .map_err(|err| map_repository_error("mark_favourite", err))?
            .ensure_applied(QUESTION_MISSING)
    }

    async fn delete_question(
        &self,
        principal: &Principal,
        target_user_id: &UserId,
        question_id: QuestionId,
    ) -> Result<(), Error> {
        OwnershipGuard::require(principal, target_user_id)?;

        self.questions
            .delete(question_id, target_user_id)
            .await
            .map_err(|err| map_repository_error("delete_question", err))?
            .ensure_applied(QUESTION_MISSING)
    }
}

/// Question service implementing [`QuestionQuery`].
#[derive(Clone)]
pub struct QuestionQueryService<R> {
    questions: Arc<R>,
}

impl<R> QuestionQueryService<R> {
    /// Build the query service.
    pub fn new(questions: Arc<R>) -> Self {
        Self { questions }
    }
}

#[async_trait]
impl<R> QuestionQuery for QuestionQueryService<R>
where
    R: QuestionRepository,
{
    async fn list_questions(&self, target_user_id: &UserId) -> Result<Vec<Question>, Error> {
        self.questions
            .find_by_target(target_user_id)
            .await
            .map_err(|err| map_repository_error("list_questions", err))
    }
}
