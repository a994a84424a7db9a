//! In-memory transaction ledger.
//!
//! Postings run inside [`InMemoryAccountStore::adjust_balance_then`], so the
//! balance change and the log append are one unit under the account's mutex.
//! Locks are always taken account first, then log.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use mockable::Clock;
use tracing::debug;

use super::InMemoryAccountStore;
use crate::domain::ports::{LedgerError, TransactionLedger};
use crate::domain::{AccountNumber, MAX_ID_ATTEMPTS, PostingRequest, Transaction, TransactionId};

type IdSource = Box<dyn Fn() -> TransactionId + Send + Sync>;

/// Append-only per-account logs backed by `DashMap`.
pub struct InMemoryTransactionLedger {
    accounts: Arc<InMemoryAccountStore>,
    logs: DashMap<AccountNumber, Vec<Transaction>>,
    issued: DashMap<TransactionId, AccountNumber>,
    clock: Arc<dyn Clock>,
    next_id: IdSource,
}

impl InMemoryTransactionLedger {
    /// Create an empty ledger posting against `accounts`.
    pub fn new(accounts: Arc<InMemoryAccountStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_id_source(accounts, clock, Box::new(TransactionId::random))
    }

    /// Create an empty ledger drawing transaction ids from `next_id`.
    pub fn with_id_source(
        accounts: Arc<InMemoryAccountStore>,
        clock: Arc<dyn Clock>,
        next_id: IdSource,
    ) -> Self {
        Self {
            accounts,
            logs: DashMap::new(),
            issued: DashMap::new(),
            clock,
            next_id,
        }
    }

    /// Reserve a transaction id that has never been issued before.
    fn reserve_id(&self, number: &AccountNumber) -> Result<TransactionId, LedgerError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = (self.next_id)();
            match self.issued.entry(id.clone()) {
                Entry::Occupied(_) => debug!(transaction_id = %id, "transaction id collision"),
                Entry::Vacant(slot) => {
                    slot.insert(number.clone());
                    return Ok(id);
                }
            }
        }
        Err(LedgerError::identifier_exhausted(MAX_ID_ATTEMPTS))
    }
}

#[async_trait]
impl TransactionLedger for InMemoryTransactionLedger {
    async fn post(
        &self,
        number: &AccountNumber,
        request: PostingRequest,
    ) -> Result<Transaction, LedgerError> {
        let delta = request.transaction_type.signed(request.amount);
        let now = self.clock.utc();
        self.accounts.adjust_balance_then(number, delta, |account| {
            let id = self.reserve_id(number)?;
            let transaction = Transaction::record(id, account.owner().clone(), request, now);
            self.logs
                .entry(number.clone())
                .or_default()
                .push(transaction.clone());
            Ok(transaction)
        })
    }

    async fn list(&self, number: &AccountNumber) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self
            .logs
            .get(number)
            .map(|log| log.value().clone())
            .unwrap_or_default())
    }

    async fn fetch(
        &self,
        number: &AccountNumber,
        id: &TransactionId,
    ) -> Result<Transaction, LedgerError> {
        self.logs
            .get(number)
            .and_then(|log| log.iter().find(|tx| tx.id() == id).cloned())
            .ok_or_else(|| LedgerError::transaction_not_found(id.as_ref()))
    }
}
