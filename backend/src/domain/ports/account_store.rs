//! Driven port for the account store.
//!
//! The store is the sole owner of account balances. `adjust_balance` is the
//! only operation that changes a balance and is atomic per account.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{Account, AccountDraft, AccountNumber, AccountPatch, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by account store adapters.
    pub enum AccountStoreError {
        /// No account exists with the given number.
        NotFound { account_number: String } => "account {account_number} not found",
        /// A withdrawal would have taken the balance below zero.
        InsufficientFunds { account_number: String } =>
            "insufficient funds in account {account_number}",
        /// The adjusted balance is not representable.
        BalanceOverflow { account_number: String } =>
            "balance overflow in account {account_number}",
        /// Every generated account number collided with an existing account.
        IdentifierExhausted { attempts: usize } =>
            "could not allocate a unique account number after {attempts} attempts",
    }
}

/// Keyed store of bank accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Open an empty account for `owner`.
    async fn create(&self, owner: &UserId, draft: AccountDraft)
    -> Result<Account, AccountStoreError>;

    /// Accounts owned by `owner`, ordered by account number.
    async fn list(&self, owner: &UserId) -> Result<Vec<Account>, AccountStoreError>;

    /// Fetch an account by number.
    async fn fetch(&self, number: &AccountNumber) -> Result<Account, AccountStoreError>;

    /// Apply a partial update to the account's name or type.
    async fn update(
        &self,
        number: &AccountNumber,
        patch: AccountPatch,
    ) -> Result<Account, AccountStoreError>;

    /// Remove the account. Its transaction log is left in place.
    async fn delete(&self, number: &AccountNumber) -> Result<(), AccountStoreError>;

    /// Atomically add `delta` to the balance and return the new balance.
    ///
    /// A negative delta whose magnitude exceeds the balance is refused with
    /// [`AccountStoreError::InsufficientFunds`] and changes nothing.
    async fn adjust_balance(
        &self,
        number: &AccountNumber,
        delta: Decimal,
    ) -> Result<Decimal, AccountStoreError>;
}
