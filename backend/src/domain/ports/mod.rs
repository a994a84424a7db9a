//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Store`, `TransactionLedger`, `IdentityVerifier`,
//! `TokenIssuer`) are implemented by outbound adapters. Driving ports
//! (`*Command`, `*Query`, `LoginService`) are implemented by domain services
//! and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_store;
mod accounts_command;
mod accounts_query;
mod identity;
mod login_service;
mod transaction_ledger;
mod transactions_command;
mod transactions_query;
mod user_store;
mod users_command;
mod users_query;

#[cfg(test)]
pub use account_store::MockAccountStore;
pub use account_store::{AccountStore, AccountStoreError};
#[cfg(test)]
pub use accounts_command::MockAccountsCommand;
pub use accounts_command::AccountsCommand;
#[cfg(test)]
pub use accounts_query::MockAccountsQuery;
pub use accounts_query::AccountsQuery;
#[cfg(test)]
pub use identity::{MockIdentityVerifier, MockTokenIssuer};
pub use identity::{IdentityError, IdentityVerifier, IssuedToken, TokenIssuer};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use transaction_ledger::MockTransactionLedger;
pub use transaction_ledger::{LedgerError, TransactionLedger};
#[cfg(test)]
pub use transactions_command::MockTransactionsCommand;
pub use transactions_command::TransactionsCommand;
#[cfg(test)]
pub use transactions_query::MockTransactionsQuery;
pub use transactions_query::TransactionsQuery;
#[cfg(test)]
pub use user_store::MockUserStore;
pub use user_store::{UserStore, UserStoreError};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::UsersCommand;
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
