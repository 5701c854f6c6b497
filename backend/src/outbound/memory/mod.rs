//! In-process storage adapter.
//!
//! [`InMemoryStore`] implements every repository port behind one mutex. Each
//! port call takes the lock once and releases it before returning, so a
//! conditional write checks its predicate and applies its change as one
//! indivisible step, the same guarantee a single SQL statement gives. The
//! server falls back to this store when no database is configured.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::ports::{
    PostPersistenceError, PostRepository, QuestionPersistenceError, QuestionRepository,
    StoredUser, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Email, MutationOutcome, PasswordHash, Post, PostDraft, PostId, Question, QuestionId,
    QuestionText, User, UserId,
};

#[derive(Default)]
struct State {
    users: HashMap<Uuid, StoredUser>,
    emails: HashMap<String, Uuid>,
    posts: HashMap<Uuid, Post>,
    questions: HashMap<Uuid, (u64, Question)>,
    next_sequence: u64,
}

impl State {
    fn next_sequence(&mut self) -> u64 {
        self.next_sequence += 1;
        self.next_sequence
    }

    fn live_post_mut(&mut self, id: PostId, owner_id: &UserId) -> Option<&mut Post> {
        self.posts.get_mut(id.as_uuid()).filter(|post| {
            post.owner_id().as_uuid() == owner_id.as_uuid() && post.is_live()
        })
    }

    fn question_mut(&mut self, id: QuestionId, target_user_id: &UserId) -> Option<&mut Question> {
        self.questions
            .get_mut(id.as_uuid())
            .map(|(_, question)| question)
            .filter(|question| question.target_user_id().as_uuid() == target_user_id.as_uuid())
    }
}

/// Mutex-guarded storage implementing the user, post, and question ports.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, String> {
        self.state
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }
}

fn affected(applied: bool) -> MutationOutcome {
    MutationOutcome::from_affected(usize::from(applied))
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        if state.emails.contains_key(user.email().as_ref()) {
            return Err(UserPersistenceError::duplicate_email());
        }
        let id = *user.id().as_uuid();
        state.emails.insert(user.email().to_string(), id);
        state.users.insert(
            id,
            StoredUser {
                user: user.clone(),
                password_hash: password_hash.clone(),
            },
        );
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state
            .emails
            .get(email.as_ref())
            .and_then(|id| state.users.get(id))
            .cloned())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn insert(&self, post: &Post) -> Result<(), PostPersistenceError> {
        let mut state = self.lock().map_err(PostPersistenceError::query)?;
        state.posts.insert(*post.id().as_uuid(), post.clone());
        Ok(())
    }

    async fn find_live_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<Post>, PostPersistenceError> {
        let state = self.lock().map_err(PostPersistenceError::query)?;
        let mut posts: Vec<Post> = state
            .posts
            .values()
            .filter(|post| post.owner_id().as_uuid() == owner_id.as_uuid() && post.is_live())
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(posts)
    }

    async fn update(
        &self,
        id: PostId,
        owner_id: &UserId,
        draft: &PostDraft,
    ) -> Result<MutationOutcome, PostPersistenceError> {
        let mut state = self.lock().map_err(PostPersistenceError::query)?;
        let post = state.live_post_mut(id, owner_id);
        let applied = post.is_some();
        if let Some(post) = post {
            post.apply_draft(draft.clone());
        }
        Ok(affected(applied))
    }

    async fn soft_delete(
        &self,
        id: PostId,
        owner_id: &UserId,
        deleted_at: DateTime<Utc>,
    ) -> Result<MutationOutcome, PostPersistenceError> {
        let mut state = self.lock().map_err(PostPersistenceError::query)?;
        let post = state.live_post_mut(id, owner_id);
        let applied = post.is_some();
        if let Some(post) = post {
            post.mark_deleted(deleted_at);
        }
        Ok(affected(applied))
    }
}

#[async_trait]
impl QuestionRepository for InMemoryStore {
    async fn insert(&self, question: &Question) -> Result<(), QuestionPersistenceError> {
        let mut state = self.lock().map_err(QuestionPersistenceError::query)?;
        let target = question.target_user_id();
        if !state.users.contains_key(target.as_uuid()) {
            return Err(QuestionPersistenceError::unknown_target(target.to_string()));
        }
        let sequence = state.next_sequence();
        state
            .questions
            .insert(*question.id().as_uuid(), (sequence, question.clone()));
        Ok(())
    }

    async fn find_by_target(
        &self,
        target_user_id: &UserId,
    ) -> Result<Vec<Question>, QuestionPersistenceError> {
        let state = self.lock().map_err(QuestionPersistenceError::query)?;
        let mut matches: Vec<&(u64, Question)> = state
            .questions
            .values()
            .filter(|(_, question)| {
                question.target_user_id().as_uuid() == target_user_id.as_uuid()
            })
            .collect();
        matches.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(matches
            .into_iter()
            .map(|(_, question)| question.clone())
            .collect())
    }

    async fn set_reply(
        &self,
        id: QuestionId,
        target_user_id: &UserId,
        reply: &QuestionText,
    ) -> Result<MutationOutcome, QuestionPersistenceError> {
        let mut state = self.lock().map_err(QuestionPersistenceError::query)?;
        let question = state
            .question_mut(id, target_user_id)
            .filter(|question| question.reply().is_none());
        let applied = question.is_some();
        if let Some(question) = question {
            question.set_reply(reply.clone());
        }
        Ok(affected(applied))
    }

    async fn set_favourite(
        &self,
        id: QuestionId,
        target_user_id: &UserId,
    ) -> Result<MutationOutcome, QuestionPersistenceError> {
        let mut state = self.lock().map_err(QuestionPersistenceError::query)?;
        let question = state.question_mut(id, target_user_id);
        let applied = question.is_some();
        if let Some(question) = question {
            question.set_favourite();
        }
        Ok(affected(applied))
    }

    async fn delete(
        &self,
        id: QuestionId,
        target_user_id: &UserId,
    ) -> Result<MutationOutcome, QuestionPersistenceError> {
        let mut state = self.lock().map_err(QuestionPersistenceError::query)?;
        let applied = state.question_mut(id, target_user_id).is_some();
        if applied {
            state.questions.remove(id.as_uuid());
        }
        Ok(affected(applied))
    }
}
