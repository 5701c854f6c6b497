//! Registration and login.
//!
//! Password hashing and verification run on the blocking pool. Unknown
//! emails still pay for one verification so the response time does not
//! reveal which addresses are registered.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};
use zeroize::Zeroizing;

use crate::domain::password::{PasswordHash, dummy_verify};
use crate::domain::ports::{AccountCommand, LoginResponse, UserPersistenceError, UserRepository};
use crate::domain::{Error, LoginCredentials, Registration, TokenCodec, TraceId, User, UserId};

const LOGIN_MISMATCH: &str = "email and password do not match";

fn map_repository_error(operation: &'static str, error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::DuplicateEmail => Error::invalid_request(error.to_string()),
        UserPersistenceError::Connection { .. } | UserPersistenceError::Query { .. } => {
            error!(operation, %error, "user repository failure");
            Error::internal(format!("user repository error during {operation}"))
        }
    }
}

async fn run_blocking<T, F>(task: F) -> Result<T, Error>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let trace_id = TraceId::current();
    let scoped = move || match trace_id {
        Some(trace_id) => TraceId::sync_scope(trace_id, task),
        None => task(),
    };
    tokio::task::spawn_blocking(scoped).await.map_err(|err| {
        error!(error = %err, "password worker failed");
        Error::internal("password worker failed")
    })
}

/// Account service implementing [`AccountCommand`].
#[derive(Clone)]
pub struct AccountService<R> {
    users: Arc<R>,
    codec: Arc<TokenCodec>,
}

impl<R> AccountService<R> {
    /// Build the service over a user repository and credential codec.
    pub fn new(users: Arc<R>, codec: Arc<TokenCodec>) -> Self {
        Self { users, codec }
    }
}

#[async_trait]
impl<R> AccountCommand for AccountService<R>
where
    R: UserRepository,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let password = Zeroizing::new(registration.password().to_owned());
        let hash = run_blocking(move || PasswordHash::generate(&password))
            .await?
            .map_err(|err| {
                error!(error = %err, "password hashing failed");
                Error::internal("password hashing failed")
            })?;

        let user = User::new(
            UserId::random(),
            registration.name().clone(),
            registration.email().clone(),
        );
        self.users
            .insert(&user, &hash)
            .await
            .map_err(|err| map_repository_error("register", err))?;

        info!(user_id = %user.id(), "registered user");
        Ok(user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<LoginResponse, Error> {
        let stored = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(|err| map_repository_error("login", err))?;
        let password = Zeroizing::new(credentials.password().to_owned());

        let Some(stored) = stored else {
            run_blocking(move || dummy_verify(&password)).await?;
            warn!("login for unknown email");
            return Err(Error::invalid_request(LOGIN_MISMATCH));
        };

        let hash = stored.password_hash.clone();
        let matches = run_blocking(move || hash.verify(&password)).await?;
        if !matches {
            warn!(user_id = %stored.user.id(), "login with wrong password");
            return Err(Error::invalid_request(LOGIN_MISMATCH));
        }

        let token = self.codec.issue(&stored.user).map_err(|err| {
            error!(error = %err, "credential issue failed");
            Error::internal("credential issue failed")
        })?;
        info!(user_id = %stored.user.id(), "issued credential");
        Ok(LoginResponse { token })
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
