//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; repositories convert them to
//! domain types and report rows that fail domain validation as query errors.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{posts, questions, users};
use crate::domain::{
    DisplayName, Email, PasswordHash, Post, PostDraft, PostId, Question, QuestionId, QuestionText,
    Signature, User, UserId,
};
use crate::domain::ports::StoredUser;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl TryFrom<UserRow> for StoredUser {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let name = DisplayName::new(row.name).map_err(|err| err.to_string())?;
        let email = Email::new(&row.email).map_err(|err| err.to_string())?;
        let password_hash =
            PasswordHash::from_stored(row.password_hash).map_err(|err| err.to_string())?;
        Ok(Self {
            user: User::new(UserId::from_uuid(row.id), name, email),
            password_hash,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<PostRow> for Post {
    type Error = String;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        let draft =
            PostDraft::try_from_parts(&row.title, &row.content).map_err(|err| err.to_string())?;
        Ok(Post::restore(
            PostId::from_uuid(row.id),
            UserId::from_uuid(row.owner_id),
            draft,
            row.created_at,
            row.deleted_at,
        ))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = posts)]
pub(crate) struct NewPostRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: &'a str,
    pub content: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = posts)]
pub(crate) struct PostUpdate<'a> {
    pub title: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = questions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct QuestionRow {
    pub id: Uuid,
    pub target_user_id: Uuid,
    pub message: String,
    pub reply: Option<String>,
    pub favourite: bool,
    pub signature: Option<String>,
}

impl TryFrom<QuestionRow> for Question {
    type Error = String;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        let message = QuestionText::new(row.message).map_err(|err| err.to_string())?;
        let reply = row
            .reply
            .map(QuestionText::new)
            .transpose()
            .map_err(|err| err.to_string())?;
        let signature = Signature::parse(row.signature.as_deref()).map_err(|err| err.to_string())?;
        Ok(Question::restore(
            QuestionId::from_uuid(row.id),
            UserId::from_uuid(row.target_user_id),
            message,
            reply,
            row.favourite,
            signature,
        ))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = questions)]
pub(crate) struct NewQuestionRow<'a> {
    pub id: Uuid,
    pub target_user_id: Uuid,
    pub message: &'a str,
    pub favourite: bool,
    pub signature: Option<&'a str>,
}
