//! Domain primitives, services, and ports.
//!
//! Purpose: hold the authentication and ownership rules independent of HTTP
//! and storage. Inbound adapters call the driving ports in [`ports`]; the
//! services here implement them over the driven repository ports.
//!
//! Public surface:
//! - [`TokenCodec`] and [`Principal`] issue and verify bearer credentials.
//! - [`PrincipalResolver`] turns an `Authorization` header into a principal.
//! - [`OwnershipGuard`] decides whether a principal may write a resource.
//! - [`MutationOutcome`] classifies conditional storage commands.
//! - [`Error`] / [`ErrorCode`] are the transport-agnostic failure payload.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod mutation;
pub mod ownership;
pub mod password;
pub mod ports;
pub mod post;
pub mod post_service;
pub mod principal;
pub mod question;
pub mod question_service;
pub mod token;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{CredentialsValidationError, LoginCredentials, Registration};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::mutation::{MutationOutcome, apply_conditional};
pub use self::ownership::{Access, OwnershipDenied, OwnershipGuard};
pub use self::password::{PasswordHash, PasswordHashError};
pub use self::post::{Post, PostContent, PostDraft, PostId, PostTitle, PostValidationError};
pub use self::post_service::{PostCommandService, PostQueryService};
pub use self::principal::{AuthError, PrincipalResolver};
pub use self::question::{
    Question, QuestionId, QuestionText, QuestionValidationError, Signature,
};
pub use self::question_service::{QuestionCommandService, QuestionQueryService};
pub use self::token::{Principal, TokenCodec, TokenError, TokenIssueError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{DisplayName, Email, User, UserId, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use preguntame::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
