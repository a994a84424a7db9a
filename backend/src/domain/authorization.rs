//! Ownership policy applied before any record is read or mutated.
//!
//! The guard only compares identities. Resolving the caller from a credential
//! and fetching the record are the caller's job.

use super::UserId;

/// The caller does not own the record it tried to reach.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("user {caller} may not access a record owned by {owner}")]
pub struct OwnershipDenied {
    pub caller: UserId,
    pub owner: UserId,
}

/// Permit access iff `caller` is `owner`.
///
/// # Examples
/// ```
/// use bank_backend::domain::{UserId, authorize};
///
/// let alice = UserId::new("usr-alice").expect("id");
/// let bob = UserId::new("usr-bob").expect("id");
/// assert!(authorize(&alice, &alice).is_ok());
/// assert!(authorize(&alice, &bob).is_err());
/// ```
pub fn authorize(caller: &UserId, owner: &UserId) -> Result<(), OwnershipDenied> {
    if caller == owner {
        Ok(())
    } else {
        Err(OwnershipDenied {
            caller: caller.clone(),
            owner: owner.clone(),
        })
    }
}
