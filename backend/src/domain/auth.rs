//! Authentication inputs: login credentials and registration requests.
//!
//! Inbound adapters hand raw strings to these constructors so every check on
//! the shape of an email, name, or password happens before a service talks
//! to a port.

use zeroize::Zeroizing;

use crate::domain::user::{DisplayName, Email, UserValidationError};

/// Minimum password length, in bytes.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Domain error returned when login or registration payloads are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// The password was the empty string.
    #[error("password must not be empty")]
    EmptyPassword,
    /// The password misses a required character class or is too short.
    #[error(
        "password must contain an uppercase letter, a lowercase letter and a digit, and be at least {min} characters long"
    )]
    WeakPassword { min: usize },
    /// Name or email failed validation.
    #[error(transparent)]
    User(#[from] UserValidationError),
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` passed [`Email::new`].
/// - `password` is non-empty; whitespace is preserved.
///
/// # Examples
/// ```
/// use preguntame::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("a@x.com", "Abcd1234").unwrap();
/// assert_eq!(creds.email().as_ref(), "a@x.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = Email::new(email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used to look the account up.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    name: DisplayName,
    email: Email,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate a registration payload.
    ///
    /// Passwords need at least [`PASSWORD_MIN_LEN`] bytes and one each of an
    /// uppercase letter, a lowercase letter and a digit.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let name = DisplayName::new(name)?;
        let email = Email::new(email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        if !is_strong_password(password) {
            return Err(CredentialsValidationError::WeakPassword {
                min: PASSWORD_MIN_LEN,
            });
        }
        Ok(Self {
            name,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Name the account will display.
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Email the account will log in with.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Plain-text password, hashed before storage.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

fn is_strong_password(password: &str) -> bool {
    password.len() >= PASSWORD_MIN_LEN
        && password.chars().any(char::is_uppercase)
        && password.chars().any(char::is_lowercase)
        && password.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", CredentialsValidationError::User(UserValidationError::EmptyEmail))]
    #[case(
        "nobody",
        "pw",
        CredentialsValidationError::User(UserValidationError::EmailMissingSymbols)
    )]
    #[case("a@x.com", "", CredentialsValidationError::EmptyPassword)]
    fn invalid_login_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn login_credentials_keep_password_verbatim() {
        let creds = LoginCredentials::try_from_parts(" a@x.com ", " spaced ").expect("valid");
        assert_eq!(creds.email().as_ref(), "a@x.com");
        assert_eq!(creds.password(), " spaced ");
    }

    #[rstest]
    #[case("abcd1234")]
    #[case("ABCD1234")]
    #[case("Abcdefgh")]
    #[case("Abc123")]
    fn registration_rejects_weak_passwords(#[case] password: &str) {
        let err = Registration::try_from_parts("Ada", "a@x.com", password)
            .expect_err("weak password must fail");
        assert_eq!(
            err,
            CredentialsValidationError::WeakPassword {
                min: PASSWORD_MIN_LEN
            }
        );
    }

    #[rstest]
    fn registration_accepts_policy_compliant_password() {
        let registration =
            Registration::try_from_parts("Ada", "a@x.com", "Abcd1234").expect("valid");
        assert_eq!(registration.name().as_ref(), "Ada");
        assert_eq!(registration.email().as_ref(), "a@x.com");
        assert_eq!(registration.password(), "Abcd1234");
    }

    #[rstest]
    fn registration_rejects_blank_name() {
        let err = Registration::try_from_parts("  ", "a@x.com", "Abcd1234")
            .expect_err("blank name must fail");
        assert_eq!(
            err,
            CredentialsValidationError::User(UserValidationError::EmptyDisplayName)
        );
    }
}
