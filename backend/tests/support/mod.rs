//! Shared wiring for backend integration tests.
//!
//! Integration tests compile as separate crates, so each one pulls this module
//! in with `mod support;` and uses only the helpers it needs.

#![allow(dead_code, reason = "each test crate uses a different subset")]

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use chrono::{DateTime, Duration, TimeZone, Utc};
use mockable::Clock;

use bank_backend::Trace;
use bank_backend::domain::ports::AccountStore;
use bank_backend::domain::{
    AccountDraft, AccountNumber, AccountService, AccountType, TokenLoginService,
    TransactionService, UserId, UserService,
};
use bank_backend::inbound::http::configure_api;
use bank_backend::inbound::http::state::HttpState;
use bank_backend::outbound::memory::{
    InMemoryAccountStore, InMemoryTransactionLedger, InMemoryUserStore,
};
use bank_backend::outbound::token::{JwtCodec, SigningKey};
use bank_backend::test_support::MutableClock;

/// Instant every test bank starts at.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0)
        .single()
        .expect("valid start instant")
}

/// Fully wired in-memory bank with direct access to its driven adapters.
pub struct Bank {
    pub clock: Arc<MutableClock>,
    pub users: Arc<InMemoryUserStore>,
    pub accounts: Arc<InMemoryAccountStore>,
    pub ledger: Arc<InMemoryTransactionLedger>,
    pub state: HttpState,
}

impl Bank {
    pub fn new() -> Self {
        let clock = Arc::new(MutableClock::new(epoch()));
        let shared: Arc<dyn Clock> = clock.clone();
        let users = Arc::new(InMemoryUserStore::new(Arc::clone(&shared)));
        let accounts = Arc::new(InMemoryAccountStore::new(Arc::clone(&shared)));
        let ledger = Arc::new(InMemoryTransactionLedger::new(
            Arc::clone(&accounts),
            Arc::clone(&shared),
        ));
        let codec = Arc::new(JwtCodec::new(
            SigningKey::generate(),
            Duration::hours(1),
            shared,
        ));

        let user_service = Arc::new(UserService::new(Arc::clone(&users)));
        let account_service = Arc::new(AccountService::new(Arc::clone(&accounts)));
        let transaction_service = Arc::new(TransactionService::new(
            Arc::clone(&accounts),
            Arc::clone(&ledger),
        ));
        let state = HttpState {
            login: Arc::new(TokenLoginService::new(Arc::clone(&users), Arc::clone(&codec))),
            users_command: user_service.clone(),
            users_query: user_service,
            accounts_command: account_service.clone(),
            accounts_query: account_service,
            transactions_command: transaction_service.clone(),
            transactions_query: transaction_service,
            identity: codec,
        };

        Self {
            clock,
            users,
            accounts,
            ledger,
            state,
        }
    }

    /// Open a personal account straight through the store.
    pub async fn open_account(&self, owner: &str) -> AccountNumber {
        let owner = UserId::new(owner).expect("owner id");
        self.accounts
            .create(
                &owner,
                AccountDraft {
                    name: "Everyday".to_owned(),
                    account_type: AccountType::Personal,
                },
            )
            .await
            .expect("open account")
            .account_number()
            .clone()
    }

    /// Application serving the `/v1` API over this bank.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .wrap(Trace)
            .configure(configure_api)
    }
}
