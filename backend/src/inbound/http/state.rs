//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountsCommand, AccountsQuery, IdentityVerifier, LoginService, TransactionsCommand,
    TransactionsQuery, UsersCommand, UsersQuery,
};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use bank_backend::domain::{
///     AccountService, TokenLoginService, TransactionService, UserService,
/// };
/// use bank_backend::inbound::http::state::HttpState;
/// use bank_backend::outbound::memory::{
///     InMemoryAccountStore, InMemoryTransactionLedger, InMemoryUserStore,
/// };
/// use bank_backend::outbound::token::{JwtCodec, SigningKey};
/// use mockable::DefaultClock;
///
/// let clock = Arc::new(DefaultClock);
/// let users = Arc::new(InMemoryUserStore::new(clock.clone()));
/// let accounts = Arc::new(InMemoryAccountStore::new(clock.clone()));
/// let ledger = Arc::new(InMemoryTransactionLedger::new(accounts.clone(), clock.clone()));
/// let codec = Arc::new(JwtCodec::new(
///     SigningKey::generate(),
///     chrono::Duration::hours(1),
///     clock,
/// ));
///
/// let user_service = Arc::new(UserService::new(users.clone()));
/// let account_service = Arc::new(AccountService::new(accounts.clone()));
/// let transaction_service = Arc::new(TransactionService::new(accounts, ledger));
/// let state = HttpState {
///     login: Arc::new(TokenLoginService::new(users, codec.clone())),
///     users_command: user_service.clone(),
///     users_query: user_service,
///     accounts_command: account_service.clone(),
///     accounts_query: account_service,
///     transactions_command: transaction_service.clone(),
///     transactions_query: transaction_service,
///     identity: codec,
/// };
/// let _login = state.login.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users_command: Arc<dyn UsersCommand>,
    pub users_query: Arc<dyn UsersQuery>,
    pub accounts_command: Arc<dyn AccountsCommand>,
    pub accounts_query: Arc<dyn AccountsQuery>,
    pub transactions_command: Arc<dyn TransactionsCommand>,
    pub transactions_query: Arc<dyn TransactionsQuery>,
    /// Resolves bearer credentials for [`super::identity::BearerIdentity`].
    pub identity: Arc<dyn IdentityVerifier>,
}
