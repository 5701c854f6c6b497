//! Questions asked to a user, optionally signed, answered at most once.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::user::UserId;

/// Minimum length of a question or reply, in characters.
pub const QUESTION_TEXT_MIN: usize = 10;
/// Maximum length of a question or reply, in characters.
pub const QUESTION_TEXT_MAX: usize = 1000;
/// Maximum signature length, in characters.
pub const SIGNATURE_MAX: usize = 64;

/// Validation errors returned by the question constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionValidationError {
    /// The id is not a UUID.
    #[error("question id must be a valid UUID")]
    InvalidId,
    /// Message or reply length is out of bounds.
    #[error("text must be between {min} and {max} characters")]
    TextLength { min: usize, max: usize },
    /// The signature exceeds [`SIGNATURE_MAX`].
    #[error("signature must be at most {max} characters")]
    SignatureTooLong { max: usize },
}

/// Question identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct QuestionId(Uuid);

impl QuestionId {
    /// Parse a question id from its textual UUID.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, QuestionValidationError> {
        Uuid::parse_str(raw.as_ref())
            .map(Self)
            .map_err(|_| QuestionValidationError::InvalidId)
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

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Body of a question or of its reply.
///
/// # Examples
/// ```
/// use preguntame::domain::QuestionText;
///
/// assert!(QuestionText::new("short").is_err());
/// assert!(QuestionText::new("What is your favourite book?").is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuestionText(String);

impl QuestionText {
    /// Validate message or reply text against the length bounds.
    pub fn new(raw: impl Into<String>) -> Result<Self, QuestionValidationError> {
        let raw = raw.into();
        let len = raw.chars().count();
        if !(QUESTION_TEXT_MIN..=QUESTION_TEXT_MAX).contains(&len) {
            return Err(QuestionValidationError::TextLength {
                min: QUESTION_TEXT_MIN,
                max: QUESTION_TEXT_MAX,
            });
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for QuestionText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Name the asker chose to sign with. Absent means anonymous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    /// Parse an optional raw signature; blank input is anonymous.
    pub fn parse(raw: Option<&str>) -> Result<Option<Self>, QuestionValidationError> {
        let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
            return Ok(None);
        };
        if raw.chars().count() > SIGNATURE_MAX {
            return Err(QuestionValidationError::SignatureTooLong { max: SIGNATURE_MAX });
        }
        Ok(Some(Self(raw.to_owned())))
    }
}

impl AsRef<str> for Signature {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// A question addressed to `target_user_id`.
///
/// ## Invariants
/// - `reply` moves from `None` to `Some` at most once and never back.
/// - `favourite` starts `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[schema(value_type = String, format = "uuid")]
    id: QuestionId,
    #[serde(skip)]
    target_user_id: UserId,
    #[schema(value_type = String, example = "What is your favourite book?")]
    message: QuestionText,
    #[schema(value_type = Option<String>)]
    reply: Option<QuestionText>,
    favourite: bool,
    #[schema(value_type = Option<String>, example = "Grace")]
    signature: Option<Signature>,
}

impl Question {
    /// A new, unanswered, non-favourite question.
    pub fn new(
        id: QuestionId,
        target_user_id: UserId,
        message: QuestionText,
        signature: Option<Signature>,
    ) -> Self {
        Self {
            id,
            target_user_id,
            message,
            reply: None,
            favourite: false,
            signature,
        }
    }

    /// Rebuild a question read back from storage.
    pub fn restore(
        id: QuestionId,
        target_user_id: UserId,
        message: QuestionText,
        reply: Option<QuestionText>,
        favourite: bool,
        signature: Option<Signature>,
    ) -> Self {
        Self {
            reply,
            favourite,
            ..Self::new(id, target_user_id, message, signature)
        }
    }

    /// Stable question identifier.
    pub fn id(&self) -> QuestionId {
        self.id
    }

    /// User the question was asked to; owns it.
    pub fn target_user_id(&self) -> &UserId {
        &self.target_user_id
    }

    /// The question itself.
    pub fn message(&self) -> &QuestionText {
        &self.message
    }

    /// The answer, once given.
    pub fn reply(&self) -> Option<&QuestionText> {
        self.reply.as_ref()
    }

    /// Whether the target marked it as a favourite.
    pub fn favourite(&self) -> bool {
        self.favourite
    }

    /// Name the asker chose to sign with, if any.
    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    pub(crate) fn set_reply(&mut self, reply: QuestionText) {
        self.reply = Some(reply);
    }

    pub(crate) fn set_favourite(&mut self) {
        self.favourite = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(5, false)]
    #[case(QUESTION_TEXT_MIN - 1, false)]
    #[case(QUESTION_TEXT_MIN, true)]
    #[case(50, true)]
    #[case(QUESTION_TEXT_MAX, true)]
    #[case(QUESTION_TEXT_MAX + 1, false)]
    fn text_length_bounds(#[case] len: usize, #[case] accepted: bool) {
        assert_eq!(QuestionText::new("q".repeat(len)).is_ok(), accepted);
    }

    #[rstest]
    fn length_counts_characters_not_bytes() {
        assert!(QuestionText::new("¿".repeat(QUESTION_TEXT_MIN)).is_ok());
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn blank_signature_is_anonymous(#[case] raw: Option<&str>) {
        assert_eq!(Signature::parse(raw), Ok(None));
    }

    #[rstest]
    fn signature_is_trimmed_and_bounded() {
        let signed = Signature::parse(Some(" Grace ")).expect("valid").expect("signed");
        assert_eq!(signed.as_ref(), "Grace");
        let long = "g".repeat(SIGNATURE_MAX + 1);
        assert_eq!(
            Signature::parse(Some(&long)),
            Err(QuestionValidationError::SignatureTooLong { max: SIGNATURE_MAX })
        );
    }

    #[rstest]
    fn new_question_is_unanswered_and_serialises_listing_fields() {
        let question = Question::new(
            QuestionId::random(),
            UserId::random(),
            QuestionText::new("What is your favourite book?").expect("text"),
            None,
        );
        assert!(question.reply().is_none());
        assert!(!question.favourite());

        let value = serde_json::to_value(&question).expect("serialise");
        let mut keys: Vec<_> = value.as_object().expect("object").keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["favourite", "id", "message", "reply", "signature"]);
    }
}
