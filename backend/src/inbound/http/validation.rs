//! Shared validation helpers for inbound HTTP adapters.
//!
//! Path segments and body fields are parsed here into domain values so a
//! malformed id or an out-of-range text is a `400` with field details before
//! any port is called.

use serde_json::json;

use crate::domain::{
    Error, PostDraft, PostId, PostValidationError, QuestionId, QuestionText,
    QuestionValidationError, Signature, UserId,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    EmptyText,
    TextTooLong,
    TextLength,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::EmptyText => "empty_text",
            ErrorCode::TextTooLong => "text_too_long",
            ErrorCode::TextLength => "text_length",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn field_error(field: FieldName, message: impl Into<String>, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    Error::invalid_request(format!("{name} must be a valid UUID")).with_details(json!({
        "field": name,
        "value": value,
        "code": ErrorCode::InvalidUuid.as_str(),
    }))
}

/// Parse a user id from a path segment, keeping its exact spelling.
pub(crate) fn parse_user_id(value: &str) -> Result<UserId, Error> {
    UserId::new(value).map_err(|_| invalid_uuid_error(FieldName::new("userId"), value))
}

pub(crate) fn parse_post_id(value: &str) -> Result<PostId, Error> {
    PostId::new(value).map_err(|_| invalid_uuid_error(FieldName::new("postId"), value))
}

pub(crate) fn parse_question_id(value: &str) -> Result<QuestionId, Error> {
    QuestionId::new(value).map_err(|_| invalid_uuid_error(FieldName::new("questionId"), value))
}

pub(crate) fn parse_post_draft(title: &str, content: &str) -> Result<PostDraft, Error> {
    PostDraft::try_from_parts(title, content).map_err(|err| {
        let (field, code) = match err {
            PostValidationError::EmptyTitle => ("title", ErrorCode::EmptyText),
            PostValidationError::TitleTooLong { .. } => ("title", ErrorCode::TextTooLong),
            PostValidationError::EmptyContent => ("content", ErrorCode::EmptyText),
            PostValidationError::ContentTooLong { .. } => ("content", ErrorCode::TextTooLong),
            PostValidationError::InvalidId => ("postId", ErrorCode::InvalidUuid),
        };
        field_error(FieldName::new(field), err.to_string(), code)
    })
}

fn question_error(field: FieldName, err: &QuestionValidationError) -> Error {
    let code = match err {
        QuestionValidationError::TextLength { .. } => ErrorCode::TextLength,
        QuestionValidationError::SignatureTooLong { .. } => ErrorCode::TextTooLong,
        QuestionValidationError::InvalidId => ErrorCode::InvalidUuid,
    };
    field_error(field, err.to_string(), code)
}

/// Parse question or reply text held in `field`.
pub(crate) fn parse_question_text(value: String, field: FieldName) -> Result<QuestionText, Error> {
    QuestionText::new(value).map_err(|err| question_error(field, &err))
}

pub(crate) fn parse_signature(value: Option<&str>) -> Result<Option<Signature>, Error> {
    Signature::parse(value).map_err(|err| question_error(FieldName::new("signature"), &err))
}
