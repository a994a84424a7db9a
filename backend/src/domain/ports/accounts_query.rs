//! Driving port for reading accounts.

use async_trait::async_trait;

use crate::domain::{Account, AccountNumber, Error, UserId};

/// Use-case port for account reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsQuery: Send + Sync {
    /// Accounts owned by `caller`, ordered by account number.
    async fn list(&self, caller: &UserId) -> Result<Vec<Account>, Error>;

    async fn fetch(&self, caller: &UserId, number: &AccountNumber) -> Result<Account, Error>;
}
