//! Driving port for registration and login.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, Registration, User};

/// Successful login payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer credential to send as `Authorization: Bearer <token>`.
    pub token: String,
}

/// Account lifecycle used by the users handlers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account and return its public identity.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Check credentials and issue a fresh bearer credential.
    async fn login(&self, credentials: LoginCredentials) -> Result<LoginResponse, Error>;
}
