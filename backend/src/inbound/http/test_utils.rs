//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    MockAccountCommand, MockPostCommand, MockPostQuery, MockQuestionCommand, MockQuestionQuery,
};
use crate::domain::{DisplayName, Email, PrincipalResolver, TokenCodec, User, UserId};

use super::state::{HttpState, HttpStatePorts};

pub const TEST_SECRET: &[u8] = b"http-adapter-test-secret";

/// Registered account whose credentials tests can mint on demand.
pub struct TestAccount {
    user: User,
}

impl TestAccount {
    pub fn new() -> Self {
        Self::with_id(UserId::random())
    }

    pub fn with_id(id: UserId) -> Self {
        Self {
            user: User::new(
                id,
                DisplayName::new("Ada Lovelace").expect("fixture name"),
                Email::new("ada@example.com").expect("fixture email"),
            ),
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn id(&self) -> &UserId {
        self.user.id()
    }

    /// Codec sharing the fixed test secret, driven by `clock`.
    pub fn codec(&self, clock: Arc<dyn Clock>) -> TokenCodec {
        TokenCodec::new(TEST_SECRET.to_vec(), clock).expect("test codec")
    }

    /// Fresh credential for this account.
    pub fn credential(&self, clock: Arc<dyn Clock>) -> String {
        self.codec(clock).issue(&self.user).expect("issue credential")
    }

    pub fn bearer(&self, clock: Arc<dyn Clock>) -> String {
        format!("Bearer {}", self.credential(clock))
    }
}

/// Mock implementations of every driving port; set expectations, then
/// convert with [`MockPorts::into_state`].
#[derive(Default)]
pub struct MockPorts {
    pub accounts: MockAccountCommand,
    pub posts: MockPostCommand,
    pub posts_query: MockPostQuery,
    pub questions: MockQuestionCommand,
    pub questions_query: MockQuestionQuery,
}

impl MockPorts {
    pub fn into_state(self, codec: TokenCodec) -> HttpState {
        HttpState::new(
            HttpStatePorts {
                accounts: Arc::new(self.accounts),
                posts: Arc::new(self.posts),
                posts_query: Arc::new(self.posts_query),
                questions: Arc::new(self.questions),
                questions_query: Arc::new(self.questions_query),
            },
            PrincipalResolver::new(Arc::new(codec)),
        )
    }
}
