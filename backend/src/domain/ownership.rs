//! Single ownership check shared by every owner-scoped write.
//!
//! Posts are owned by `owner_id`; questions by the user they were asked to.
//! Handlers pass whichever id the route declares as owner and must call the
//! guard before touching a repository.

use tracing::warn;

use crate::domain::error::Error;
use crate::domain::token::Principal;
use crate::domain::user::UserId;

/// Outcome of an ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The principal owns the resource.
    Allow,
    /// The principal is someone else.
    Deny,
}

/// The caller is authenticated but does not own the target resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("caller does not own this resource")]
pub struct OwnershipDenied;

impl From<OwnershipDenied> for Error {
    fn from(value: OwnershipDenied) -> Self {
        Error::forbidden(value.to_string())
    }
}

/// Compares an authenticated principal against a resource's declared owner.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use preguntame::domain::{Access, DisplayName, Email, OwnershipGuard, Principal, UserId};
///
/// let id = UserId::random();
/// let principal = Principal::new(
///     id.clone(),
///     DisplayName::new("Ada").unwrap(),
///     Email::new("a@x.com").unwrap(),
///     Utc::now(),
///     Utc::now(),
/// );
/// assert_eq!(OwnershipGuard::authorize(&principal, &id), Access::Allow);
/// assert_eq!(
///     OwnershipGuard::authorize(&principal, &UserId::random()),
///     Access::Deny
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnershipGuard;

impl OwnershipGuard {
    /// Allow only when the principal id equals `owner_id` exactly.
    pub fn authorize(principal: &Principal, owner_id: &UserId) -> Access {
        if principal.id() == owner_id {
            Access::Allow
        } else {
            Access::Deny
        }
    }

    /// [`authorize`](Self::authorize) as a `Result`, logging denials.
    pub fn require(principal: &Principal, owner_id: &UserId) -> Result<(), OwnershipDenied> {
        match Self::authorize(principal, owner_id) {
            Access::Allow => Ok(()),
            Access::Deny => {
                warn!(
                    principal_id = %principal.id(),
                    owner_id = %owner_id,
                    "ownership check denied"
                );
                Err(OwnershipDenied)
            }
        }
    }
}
