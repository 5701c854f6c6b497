//! Turn an `Authorization` header value into an authenticated principal.

use std::sync::Arc;

use crate::domain::token::{Principal, TokenCodec, TokenError};

const BEARER_PREFIX: &str = "Bearer ";

/// Why a request could not be attributed to a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No header, or an empty one.
    #[error("authorization header is missing")]
    MissingCredential,
    /// A header that does not start with `Bearer `.
    #[error("authorization header must use the Bearer scheme")]
    MalformedScheme,
    /// The bearer credential failed verification.
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Resolves bearer credentials through a shared [`TokenCodec`].
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use mockable::DefaultClock;
/// use preguntame::domain::{AuthError, PrincipalResolver, TokenCodec};
///
/// let codec = TokenCodec::new(b"a-very-secret-signing-key".to_vec(), Arc::new(DefaultClock))
///     .expect("codec");
/// let resolver = PrincipalResolver::new(Arc::new(codec));
/// assert_eq!(resolver.resolve(None), Err(AuthError::MissingCredential));
/// assert_eq!(resolver.resolve(Some("Basic abc")), Err(AuthError::MalformedScheme));
/// ```
#[derive(Debug, Clone)]
pub struct PrincipalResolver {
    codec: Arc<TokenCodec>,
}

impl PrincipalResolver {
    /// Build a resolver over `codec`.
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    /// Codec used to verify credentials.
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Resolve the raw header value, if any, into a [`Principal`].
    ///
    /// An empty header counts as absent. The scheme prefix is matched
    /// exactly, including case and the single separating space.
    pub fn resolve(&self, header: Option<&str>) -> Result<Principal, AuthError> {
        let header = header
            .filter(|value| !value.is_empty())
            .ok_or(AuthError::MissingCredential)?;
        let credential = header
            .strip_prefix(BEARER_PREFIX)
            .ok_or(AuthError::MalformedScheme)?;
        Ok(self.codec.verify(credential)?)
    }
}
