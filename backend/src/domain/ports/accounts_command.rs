//! Driving port for opening, renaming and closing accounts.

use async_trait::async_trait;

use crate::domain::{Account, AccountDraft, AccountNumber, AccountPatch, Error, UserId};

/// Use-case port for account mutations.
///
/// Every operation except `open` checks that `caller` owns the account
/// before touching it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsCommand: Send + Sync {
    /// Open an account owned by `caller`.
    async fn open(&self, caller: &UserId, draft: AccountDraft) -> Result<Account, Error>;

    async fn update(
        &self,
        caller: &UserId,
        number: &AccountNumber,
        patch: AccountPatch,
    ) -> Result<Account, Error>;

    async fn close(&self, caller: &UserId, number: &AccountNumber) -> Result<(), Error>;
}
