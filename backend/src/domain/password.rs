//! Salted one-way password hashing.
//!
//! Stored credentials are Argon2id PHC strings. Verification goes through the
//! Argon2 verifier, which compares digests in constant time.

use std::fmt;

use argon2::{
    Argon2, PasswordHash as PhcHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

/// Failure to produce or parse a password hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// Argon2 could not produce a hash.
    #[error("failed to hash password: {message}")]
    Hash { message: String },
    /// The stored value is not a PHC string.
    #[error("stored password hash is malformed: {message}")]
    Malformed { message: String },
}

/// Argon2id hash of a user's password in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash `password` with a freshly generated salt.
    pub fn generate(password: &str) -> Result<Self, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| PasswordHashError::Hash {
                message: err.to_string(),
            })?;
        Ok(Self(hash.to_string()))
    }

    /// Wrap a PHC string read back from storage, checking that it parses.
    pub fn from_stored(phc: impl Into<String>) -> Result<Self, PasswordHashError> {
        let phc = phc.into();
        PhcHash::new(&phc).map_err(|err| PasswordHashError::Malformed {
            message: err.to_string(),
        })?;
        Ok(Self(phc))
    }

    /// Check `password` against this hash.
    pub fn verify(&self, password: &str) -> bool {
        match PhcHash::new(&self.0) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// PHC string suitable for storage.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

// Argon2id hash of a random throwaway value; never matches.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$cHJlZ3VudGFtZS1kdW1teQ$3Q3lLx1GZb0f3ZC2Cqg3m6qKkq1mJ6y3vGQ2bXJkZ0Q";

/// Burn roughly one verification's worth of work for an unknown account.
///
/// Keeps login latency independent of whether the email exists.
pub fn dummy_verify(password: &str) {
    if let Ok(parsed) = PhcHash::new(DUMMY_HASH) {
        // Only the work matters; the outcome is always a mismatch.
        drop(Argon2::default().verify_password(password.as_bytes(), &parsed));
    }
}
