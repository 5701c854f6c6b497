//! Account API handlers.
//!
//! ```text
//! POST /api/v1/users/register {"name":"Ada","email":"a@x.com","password":"Abcd1234"}
//! POST /api/v1/users/login {"email":"a@x.com","password":"Abcd1234"}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::LoginResponse;
use crate::domain::{
    CredentialsValidationError, Error, LoginCredentials, Registration, User, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /api/v1/users/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = CredentialsValidationError;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.name, &value.email, &value.password)
    }
}

/// Login request body for `POST /api/v1/users/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = CredentialsValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

fn map_credentials_error(err: CredentialsValidationError) -> Error {
    let (field, code) = match &err {
        CredentialsValidationError::EmptyPassword => ("password", "empty_password"),
        CredentialsValidationError::WeakPassword { .. } => ("password", "weak_password"),
        CredentialsValidationError::User(user) => match user {
            UserValidationError::EmptyDisplayName => ("name", "empty_name"),
            UserValidationError::DisplayNameTooLong { .. } => ("name", "name_too_long"),
            UserValidationError::EmptyEmail => ("email", "empty_email"),
            UserValidationError::EmailTooLong { .. } => ("email", "email_too_long"),
            UserValidationError::EmailMissingSymbols => ("email", "invalid_email"),
            UserValidationError::EmptyId | UserValidationError::InvalidId => {
                ("id", "invalid_user_id")
            }
        },
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = User),
        (status = 400, description = "Invalid request or email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/users/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<User>> {
    let registration =
        Registration::try_from(payload.into_inner()).map_err(map_credentials_error)?;
    let user = state.accounts.register(registration).await?;
    Ok(web::Json(user))
}

/// Exchange email and password for a bearer credential.
///
/// An unknown email and a wrong password produce the same `400` response.
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid request or credentials do not match", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/users/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_credentials_error)?;
    let response = state.accounts.login(credentials).await?;
    Ok(web::Json(response))
}
