//! Driving ports for questions.
//!
//! Asking is open to anyone; reply, favourite, and delete belong to the
//! user the question was addressed to.

use async_trait::async_trait;

use crate::domain::{Error, Principal, Question, QuestionId, QuestionText, Signature, UserId};

/// Question writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionCommand: Send + Sync {
    /// Store a new question for `target_user_id`. Needs no principal.
    async fn ask(
        &self,
        target_user_id: &UserId,
        message: QuestionText,
        signature: Option<Signature>,
    ) -> Result<Question, Error>;

    /// Answer a question once.
    async fn reply(
        &self,
        principal: &Principal,
        target_user_id: &UserId,
        question_id: QuestionId,
        reply: QuestionText,
    ) -> Result<(), Error>;

    /// Flag a question as a favourite.
    async fn mark_favourite(
        &self,
        principal: &Principal,
        target_user_id: &UserId,
        question_id: QuestionId,
    ) -> Result<(), Error>;

    /// Remove a question permanently.
    async fn delete_question(
        &self,
        principal: &Principal,
        target_user_id: &UserId,
        question_id: QuestionId,
    ) -> Result<(), Error>;
}

/// Public question reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionQuery: Send + Sync {
    /// Every question addressed to `target_user_id`.
    async fn list_questions(&self, target_user_id: &UserId) -> Result<Vec<Question>, Error>;
}
