//! In-memory adapters for the store and ledger ports.
//!
//! Nothing here is persisted; state lives for the lifetime of the process.

mod account_store;
mod transaction_ledger;
mod user_store;

pub use account_store::InMemoryAccountStore;
pub use transaction_ledger::InMemoryTransactionLedger;
pub use user_store::InMemoryUserStore;
