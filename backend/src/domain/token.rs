//! Stateless signed credentials.
//!
//! A credential is three base64url (unpadded) segments joined by dots:
//! `header.payload.signature`. The header is `{"alg":"HS256","typ":"JWT"}`,
//! the payload carries `id`, `name`, `email`, `iat` and `exp` (Unix seconds),
//! and the signature is HMAC-SHA256 over `header.payload` with the service
//! secret. Credentials are never renewed in place and there is no revocation
//! list: a credential stays valid until `exp`.

use std::fmt;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeDelta, Utc};
use hmac::{Hmac, Mac};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::domain::user::{DisplayName, Email, User, UserId};

type HmacSha256 = Hmac<Sha256>;

/// Lifetime of a freshly issued credential unless configured otherwise.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

const ALGORITHM: &str = "HS256";
const TOKEN_TYPE: &str = "JWT";

/// Reasons a credential fails verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The signature does not match the header and payload.
    #[error("credential signature is invalid")]
    InvalidSignature,
    /// The current time is at or past the credential's expiry.
    #[error("credential has expired")]
    Expired,
    /// The string is not a well-formed credential.
    #[error("credential is malformed")]
    Malformed,
}

/// Failures while setting up the codec or issuing a credential.
#[derive(Debug, thiserror::Error)]
pub enum TokenIssueError {
    /// The signing secret was empty.
    #[error("signing secret must not be empty")]
    EmptySecret,
    /// The configured lifetime was zero or negative.
    #[error("token lifetime must be positive")]
    NonPositiveTtl,
    /// Header or claims could not be serialised.
    #[error("failed to encode credential: {0}")]
    Encoding(#[from] serde_json::Error),
    /// Issue time plus lifetime is past the last representable instant.
    #[error("credential lifetime overflows the clock")]
    Overflow,
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Claims {
    id: String,
    name: String,
    email: String,
    iat: i64,
    exp: i64,
}

/// Authenticated caller reconstructed from a verified credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    id: UserId,
    name: DisplayName,
    email: Email,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Principal {
    /// Assemble a principal from already validated parts.
    pub fn new(
        id: UserId,
        name: DisplayName,
        email: Email,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            issued_at,
            expires_at,
        }
    }

    /// Identifier of the authenticated user.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Display name captured when the credential was issued.
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Login email captured when the credential was issued.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// When the credential was issued.
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// First instant at which the credential is refused.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    fn from_claims(claims: Claims) -> Result<Self, TokenError> {
        let id = UserId::new(&claims.id).map_err(|_| TokenError::Malformed)?;
        let name = DisplayName::new(claims.name).map_err(|_| TokenError::Malformed)?;
        let email = Email::new(&claims.email).map_err(|_| TokenError::Malformed)?;
        let issued_at =
            DateTime::<Utc>::from_timestamp(claims.iat, 0).ok_or(TokenError::Malformed)?;
        let expires_at =
            DateTime::<Utc>::from_timestamp(claims.exp, 0).ok_or(TokenError::Malformed)?;
        Ok(Self::new(id, name, email, issued_at, expires_at))
    }
}

/// Signs and verifies credentials with a process-wide symmetric secret.
///
/// The secret and clock are injected at construction; the codec itself holds
/// no mutable state and is shared freely across requests.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use mockable::DefaultClock;
/// use preguntame::domain::{DisplayName, Email, TokenCodec, User, UserId};
///
/// let codec = TokenCodec::new(b"a-very-secret-signing-key".to_vec(), Arc::new(DefaultClock))
///     .expect("codec");
/// let user = User::new(
///     UserId::random(),
///     DisplayName::new("Ada").unwrap(),
///     Email::new("a@x.com").unwrap(),
/// );
/// let credential = codec.issue(&user).expect("issue");
/// let principal = codec.verify(&credential).expect("verify");
/// assert_eq!(principal.id(), user.id());
/// ```
#[derive(Clone)]
pub struct TokenCodec {
    mac: HmacSha256,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Build a codec issuing credentials valid for
    /// [`DEFAULT_TOKEN_TTL_HOURS`].
    pub fn new(secret: Vec<u8>, clock: Arc<dyn Clock>) -> Result<Self, TokenIssueError> {
        Self::with_ttl(secret, TimeDelta::hours(DEFAULT_TOKEN_TTL_HOURS), clock)
    }

    /// Build a codec with an explicit credential lifetime.
    pub fn with_ttl(
        secret: Vec<u8>,
        ttl: TimeDelta,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TokenIssueError> {
        let secret = Zeroizing::new(secret);
        if secret.is_empty() {
            return Err(TokenIssueError::EmptySecret);
        }
        if ttl <= TimeDelta::zero() {
            return Err(TokenIssueError::NonPositiveTtl);
        }
        let mac = HmacSha256::new_from_slice(&secret).map_err(|_| TokenIssueError::EmptySecret)?;
        Ok(Self { mac, ttl, clock })
    }

    /// Lifetime applied to newly issued credentials.
    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Issue a fresh credential for `user`, valid from now for the codec TTL.
    pub fn issue(&self, user: &User) -> Result<String, TokenIssueError> {
        let now = self.clock.utc();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or(TokenIssueError::Overflow)?;
        let claims = Claims {
            id: user.id().to_string(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let header = Header {
            alg: ALGORITHM.to_owned(),
            typ: TOKEN_TYPE.to_owned(),
        };

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?),
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?),
        );
        let signature = URL_SAFE_NO_PAD.encode(self.sign(&signing_input));
        Ok(format!("{signing_input}.{signature}"))
    }

    /// Verify `credential` and return the principal it names.
    ///
    /// Checks run in order: shape and header, signature, payload shape,
    /// expiry. A payload altered after signing therefore always reports
    /// [`TokenError::InvalidSignature`].
    pub fn verify(&self, credential: &str) -> Result<Principal, TokenError> {
        let (signing_input, signature) =
            credential.rsplit_once('.').ok_or(TokenError::Malformed)?;
        let (header, payload) = signing_input
            .split_once('.')
            .ok_or(TokenError::Malformed)?;
        if payload.contains('.') {
            return Err(TokenError::Malformed);
        }

        let header: Header = decode_segment(header)?;
        if header.alg != ALGORITHM {
            return Err(TokenError::Malformed);
        }

        let provided = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::Malformed)?;
        let expected = self.sign(signing_input);
        if !bool::from(expected.as_slice().ct_eq(provided.as_slice())) {
            return Err(TokenError::InvalidSignature);
        }

        let claims: Claims = decode_segment(payload)?;
        if self.clock.utc().timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }
        Principal::from_claims(claims)
    }

    fn sign(&self, signing_input: &str) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(signing_input.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

fn decode_segment<T: for<'de> Deserialize<'de>>(segment: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)
}
