//! Conditional mutations.
//!
//! Every owner-scoped write is a single storage command whose filter already
//! carries the ownership and state preconditions. The command reports how
//! many records it changed; exactly one means the write happened, anything
//! else means the precondition did not hold and nothing changed. Storage
//! faults travel separately as the adapter's error type.

use std::future::Future;

use tracing::warn;

use crate::domain::error::Error;

/// Number of records a conditional command must change to count as applied.
pub const EXPECTED_AFFECTED: usize = 1;

/// Result of a conditional command that ran without a storage fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum MutationOutcome {
    /// The precondition held and exactly one record changed.
    Applied,
    /// The precondition did not hold: missing record, wrong owner, or a
    /// record already in its terminal state.
    NotApplied,
}

impl MutationOutcome {
    /// Classify an affected-record count against [`EXPECTED_AFFECTED`].
    ///
    /// # Examples
    /// ```
    /// use preguntame::domain::MutationOutcome;
    ///
    /// assert_eq!(MutationOutcome::from_affected(1), MutationOutcome::Applied);
    /// assert_eq!(MutationOutcome::from_affected(0), MutationOutcome::NotApplied);
    /// ```
    pub fn from_affected(affected: usize) -> Self {
        Self::from_affected_with(affected, EXPECTED_AFFECTED)
    }

    /// Classify an affected-record count against an explicit expectation.
    pub fn from_affected_with(affected: usize, expected: usize) -> Self {
        if affected == expected {
            Self::Applied
        } else {
            Self::NotApplied
        }
    }

    /// Whether the write took effect.
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }

    /// Turn [`NotApplied`](Self::NotApplied) into a client-facing rejection.
    pub fn ensure_applied(self, rejection: &str) -> Result<(), Error> {
        match self {
            Self::Applied => Ok(()),
            Self::NotApplied => {
                warn!(rejection, "conditional mutation not applied");
                Err(Error::invalid_request(rejection))
            }
        }
    }
}

/// Run a conditional command and classify its affected count.
///
/// `command` must be one atomic storage operation whose filter encodes the
/// full precondition. Its error is passed through untouched as the storage
/// fault.
pub async fn apply_conditional<F, E>(command: F) -> Result<MutationOutcome, E>
where
    F: Future<Output = Result<usize, E>>,
{
    let affected = command.await?;
    Ok(MutationOutcome::from_affected(affected))
}
