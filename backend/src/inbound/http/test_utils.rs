//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use chrono::{DateTime, TimeZone, Utc};

use crate::Trace;
use crate::domain::{
    Account, AccountDraft, AccountNumber, AccountType, Address, EmailAddress, PhoneNumber, User,
    UserId, UserProfile,
};
use crate::domain::ports::{
    MockAccountsCommand, MockAccountsQuery, MockIdentityVerifier, MockLoginService,
    MockTransactionsCommand, MockTransactionsQuery, MockUsersCommand, MockUsersQuery,
};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::HttpState;

/// Bearer header value accepted by [`identity_for`].
pub const TEST_BEARER: &str = "Bearer test-token";

/// Mock port bundle; unset mocks panic if a handler reaches them.
#[derive(Default)]
pub struct TestPorts {
    pub login: MockLoginService,
    pub users_command: MockUsersCommand,
    pub users_query: MockUsersQuery,
    pub accounts_command: MockAccountsCommand,
    pub accounts_query: MockAccountsQuery,
    pub transactions_command: MockTransactionsCommand,
    pub transactions_query: MockTransactionsQuery,
    pub identity: MockIdentityVerifier,
}

impl TestPorts {
    pub fn into_state(self) -> HttpState {
        HttpState {
            login: Arc::new(self.login),
            users_command: Arc::new(self.users_command),
            users_query: Arc::new(self.users_query),
            accounts_command: Arc::new(self.accounts_command),
            accounts_query: Arc::new(self.accounts_query),
            transactions_command: Arc::new(self.transactions_command),
            transactions_query: Arc::new(self.transactions_query),
            identity: Arc::new(self.identity),
        }
    }
}

/// Identity verifier resolving any credential to `caller`.
pub fn identity_for(caller: &str) -> MockIdentityVerifier {
    let caller = UserId::new(caller).expect("caller id");
    let mut identity = MockIdentityVerifier::new();
    identity
        .expect_resolve()
        .returning(move |_| Ok(caller.clone()));
    identity
}

/// Application with the versioned API mounted over `ports`.
pub fn test_app(
    ports: TestPorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(ports.into_state()))
        .wrap(Trace)
        .configure(configure_api)
}

/// Fixed instant used by handler fixtures.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0)
        .single()
        .expect("valid time")
}

/// Registration profile used across handler tests.
pub fn sample_profile() -> UserProfile {
    UserProfile {
        name: "Ada Lovelace".to_owned(),
        address: Address {
            line1: "1 Analytical Way".to_owned(),
            line2: None,
            line3: None,
            town: "London".to_owned(),
            county: "Greater London".to_owned(),
            postcode: "N1 1AA".to_owned(),
        },
        phone_number: PhoneNumber::new("+447700900123").expect("phone"),
        email: EmailAddress::new("ada@example.com").expect("email"),
    }
}

pub fn sample_user(id: &str) -> User {
    User::new(
        UserId::new(id).expect("user id"),
        sample_profile(),
        fixed_now(),
    )
}

pub fn sample_account(number: &str, owner: &str) -> Account {
    Account::open(
        AccountNumber::new(number).expect("account number"),
        UserId::new(owner).expect("owner id"),
        AccountDraft {
            name: "Everyday".to_owned(),
            account_type: AccountType::Personal,
        },
        fixed_now(),
    )
}
