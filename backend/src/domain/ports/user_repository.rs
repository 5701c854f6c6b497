//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::password::PasswordHash;
use crate::domain::{Email, User};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses this email.
        DuplicateEmail => "email already registered",
    }
}

/// A user together with the hash needed to check their password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub user: User,
    pub password_hash: PasswordHash,
}

/// Storage for accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Fails with
    /// [`UserPersistenceError::DuplicateEmail`] when the email is taken.
    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError>;

    /// Fetch an account by its login email.
    async fn find_by_email(&self, email: &Email)
    -> Result<Option<StoredUser>, UserPersistenceError>;
}
