//! Driving port for posting deposits and withdrawals.

use async_trait::async_trait;

use crate::domain::{AccountNumber, Error, PostingRequest, Transaction, UserId};

/// Use-case port for ledger postings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionsCommand: Send + Sync {
    /// Succeeds when `caller` may post against `number`.
    async fn authorize(&self, caller: &UserId, number: &AccountNumber) -> Result<(), Error>;

    /// Post against `number` on behalf of its owner.
    async fn post(
        &self,
        caller: &UserId,
        number: &AccountNumber,
        request: PostingRequest,
    ) -> Result<Transaction, Error>;
}
