//! Driven port for the per-account transaction ledger.

use async_trait::async_trait;

use crate::domain::{AccountNumber, PostingRequest, Transaction, TransactionId};

use super::{AccountStoreError, define_port_error};

define_port_error! {
    /// Errors raised by ledger adapters.
    pub enum LedgerError {
        /// The account vanished before the posting could be applied.
        AccountNotFound { account_number: String } => "account {account_number} not found",
        /// A withdrawal would have taken the balance below zero.
        InsufficientFunds { account_number: String } =>
            "insufficient funds in account {account_number}",
        /// The adjusted balance is not representable.
        BalanceOverflow { account_number: String } =>
            "balance overflow in account {account_number}",
        /// The account has no transaction with this identifier.
        TransactionNotFound { transaction_id: String } =>
            "transaction {transaction_id} not found",
        /// Every generated transaction id collided with an existing entry.
        IdentifierExhausted { attempts: usize } =>
            "could not allocate a unique transaction id after {attempts} attempts",
    }
}

/// Append-only transaction logs keyed by account.
///
/// `post` is the posting protocol: the balance adjustment and the log append
/// succeed or fail together, and per-account log order matches the order in
/// which adjustments were applied.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionLedger: Send + Sync {
    /// Apply a deposit or withdrawal and record it.
    async fn post(
        &self,
        number: &AccountNumber,
        request: PostingRequest,
    ) -> Result<Transaction, LedgerError>;

    /// Entries for the account in posting order; empty when none exist.
    async fn list(&self, number: &AccountNumber) -> Result<Vec<Transaction>, LedgerError>;

    /// Look up a single entry within the account's log.
    async fn fetch(
        &self,
        number: &AccountNumber,
        id: &TransactionId,
    ) -> Result<Transaction, LedgerError>;
}

impl From<AccountStoreError> for LedgerError {
    fn from(value: AccountStoreError) -> Self {
        match value {
            AccountStoreError::NotFound { account_number } => {
                Self::AccountNotFound { account_number }
            }
            AccountStoreError::InsufficientFunds { account_number } => {
                Self::InsufficientFunds { account_number }
            }
            AccountStoreError::BalanceOverflow { account_number } => {
                Self::BalanceOverflow { account_number }
            }
            AccountStoreError::IdentifierExhausted { attempts } => {
                Self::IdentifierExhausted { attempts }
            }
        }
    }
}
