//! Short messages published on a user's profile.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::user::UserId;

/// Maximum post title length, in characters.
pub const POST_TITLE_MAX: usize = 200;
/// Maximum post body length, in characters.
pub const POST_CONTENT_MAX: usize = 5000;

/// Validation errors returned by the post constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostValidationError {
    /// The id is not a UUID.
    #[error("post id must be a valid UUID")]
    InvalidId,
    /// The title is blank.
    #[error("title must not be empty")]
    EmptyTitle,
    /// The title exceeds [`POST_TITLE_MAX`].
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    /// The body is blank.
    #[error("content must not be empty")]
    EmptyContent,
    /// The body exceeds [`POST_CONTENT_MAX`].
    #[error("content must be at most {max} characters")]
    ContentTooLong { max: usize },
}

/// Post identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PostId(Uuid);

impl PostId {
    /// Parse a post id from its textual UUID.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PostValidationError> {
        Uuid::parse_str(raw.as_ref())
            .map(Self)
            .map_err(|_| PostValidationError::InvalidId)
    }

    /// Generate a new random id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap a UUID read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

fn bounded_text(
    raw: String,
    max: usize,
    empty: PostValidationError,
    too_long: PostValidationError,
) -> Result<String, PostValidationError> {
    if raw.trim().is_empty() {
        return Err(empty);
    }
    if raw.chars().count() > max {
        return Err(too_long);
    }
    Ok(raw)
}

/// Post headline, 1 to [`POST_TITLE_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PostTitle(String);

impl PostTitle {
    /// Validate a title.
    pub fn new(raw: impl Into<String>) -> Result<Self, PostValidationError> {
        bounded_text(
            raw.into(),
            POST_TITLE_MAX,
            PostValidationError::EmptyTitle,
            PostValidationError::TitleTooLong {
                max: POST_TITLE_MAX,
            },
        )
        .map(Self)
    }
}

impl AsRef<str> for PostTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Post body, 1 to [`POST_CONTENT_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PostContent(String);

impl PostContent {
    /// Validate a body.
    pub fn new(raw: impl Into<String>) -> Result<Self, PostValidationError> {
        bounded_text(
            raw.into(),
            POST_CONTENT_MAX,
            PostValidationError::EmptyContent,
            PostValidationError::ContentTooLong {
                max: POST_CONTENT_MAX,
            },
        )
        .map(Self)
    }
}

impl AsRef<str> for PostContent {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated title and body used for both creation and edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    title: PostTitle,
    content: PostContent,
}

impl PostDraft {
    /// Validate a title and body together.
    pub fn try_from_parts(title: &str, content: &str) -> Result<Self, PostValidationError> {
        Ok(Self {
            title: PostTitle::new(title)?,
            content: PostContent::new(content)?,
        })
    }

    /// Validated headline.
    pub fn title(&self) -> &PostTitle {
        &self.title
    }

    /// Validated body.
    pub fn content(&self) -> &PostContent {
        &self.content
    }
}

/// A post as stored.
///
/// ## Invariants
/// - Once `deleted_at` is set the post is never returned by reads and no
///   further update or delete applies to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[schema(value_type = String, format = "uuid")]
    id: PostId,
    #[schema(value_type = String, format = "uuid")]
    owner_id: UserId,
    #[schema(value_type = String, example = "Hello")]
    title: PostTitle,
    #[schema(value_type = String, example = "First post")]
    content: PostContent,
    #[schema(value_type = String, format = DateTime)]
    created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = DateTime)]
    deleted_at: Option<DateTime<Utc>>,
}

impl Post {
    /// A freshly created, live post.
    pub fn new(id: PostId, owner_id: UserId, draft: PostDraft, created_at: DateTime<Utc>) -> Self {
        let PostDraft { title, content } = draft;
        Self {
            id,
            owner_id,
            title,
            content,
            created_at,
            deleted_at: None,
        }
    }

    /// Rebuild a post read back from storage.
    pub fn restore(
        id: PostId,
        owner_id: UserId,
        draft: PostDraft,
        created_at: DateTime<Utc>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            deleted_at,
            ..Self::new(id, owner_id, draft, created_at)
        }
    }

    /// Stable post identifier.
    pub fn id(&self) -> PostId {
        self.id
    }

    /// Author of the post.
    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    /// Current headline.
    pub fn title(&self) -> &PostTitle {
        &self.title
    }

    /// Current body.
    pub fn content(&self) -> &PostContent {
        &self.content
    }

    /// When the post was published.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the post was soft deleted, if it was.
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Whether the post is still visible.
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }

    pub(crate) fn apply_draft(&mut self, draft: PostDraft) {
        self.title = draft.title;
        self.content = draft.content;
    }

    pub(crate) fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
    }
}
