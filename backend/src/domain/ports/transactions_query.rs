//! Driving port for reading transaction history.

use async_trait::async_trait;

use crate::domain::{AccountNumber, Error, Transaction, TransactionId, UserId};

/// Use-case port for ledger reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionsQuery: Send + Sync {
    /// Entries for `number` in posting order.
    async fn list(
        &self,
        caller: &UserId,
        number: &AccountNumber,
    ) -> Result<Vec<Transaction>, Error>;

    async fn fetch(
        &self,
        caller: &UserId,
        number: &AccountNumber,
        id: &TransactionId,
    ) -> Result<Transaction, Error>;
}
