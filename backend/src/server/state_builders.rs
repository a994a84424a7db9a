//! Wire the in-memory adapters and domain services into [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use bank_backend::domain::{AccountService, TokenLoginService, TransactionService, UserService};
use bank_backend::inbound::http::state::HttpState;
use bank_backend::inbound::http::token_config::TokenSettings;
use bank_backend::outbound::memory::{
    InMemoryAccountStore, InMemoryTransactionLedger, InMemoryUserStore,
};
use bank_backend::outbound::token::JwtCodec;

/// Build the HTTP state over fresh, empty stores.
///
/// Every worker shares the returned state, so all requests see one ledger.
pub(super) fn build_http_state(tokens: TokenSettings) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let users = Arc::new(InMemoryUserStore::new(Arc::clone(&clock)));
    let accounts = Arc::new(InMemoryAccountStore::new(Arc::clone(&clock)));
    let ledger = Arc::new(InMemoryTransactionLedger::new(
        Arc::clone(&accounts),
        Arc::clone(&clock),
    ));
    let TokenSettings { key, ttl } = tokens;
    let codec = Arc::new(JwtCodec::new(key, ttl, clock));

    let user_service = Arc::new(UserService::new(Arc::clone(&users)));
    let account_service = Arc::new(AccountService::new(Arc::clone(&accounts)));
    let transaction_service = Arc::new(TransactionService::new(accounts, ledger));

    web::Data::new(HttpState {
        login: Arc::new(TokenLoginService::new(users, Arc::clone(&codec))),
        users_command: user_service.clone(),
        users_query: user_service,
        accounts_command: account_service.clone(),
        accounts_query: account_service,
        transactions_command: transaction_service.clone(),
        transactions_query: transaction_service,
        identity: codec,
    })
}
