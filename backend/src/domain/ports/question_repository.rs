//! Port abstraction for question persistence.
//!
//! The three writes on an existing question are conditional on id and target
//! user; `set_reply` additionally requires the reply to be unset. Adapters
//! run each as one storage command and report the affected count as a
//! [`MutationOutcome`].

use async_trait::async_trait;

use crate::domain::{MutationOutcome, Question, QuestionId, QuestionText, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by question repository adapters.
    pub enum QuestionPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "question repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "question repository query failed: {message}",
        /// The addressed user does not exist.
        UnknownTarget { user_id: String } => "no user with id {user_id}",
    }
}

/// Storage for questions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Store a new question. Fails with
    /// [`QuestionPersistenceError::UnknownTarget`] when the target user is
    /// not registered.
    async fn insert(&self, question: &Question) -> Result<(), QuestionPersistenceError>;

    /// Every question addressed to `target_user_id`.
    async fn find_by_target(
        &self,
        target_user_id: &UserId,
    ) -> Result<Vec<Question>, QuestionPersistenceError>;

    /// Set the reply where id and target match and no reply exists yet.
    async fn set_reply(
        &self,
        id: QuestionId,
        target_user_id: &UserId,
        reply: &QuestionText,
    ) -> Result<MutationOutcome, QuestionPersistenceError>;

    /// Mark as favourite where id and target match. Re-marking applies again.
    async fn set_favourite(
        &self,
        id: QuestionId,
        target_user_id: &UserId,
    ) -> Result<MutationOutcome, QuestionPersistenceError>;

    /// Remove the question where id and target match.
    async fn delete(
        &self,
        id: QuestionId,
        target_user_id: &UserId,
    ) -> Result<MutationOutcome, QuestionPersistenceError>;
}
