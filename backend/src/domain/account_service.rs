//! Account use-cases.
//!
//! Each operation on an existing account fetches it first, runs the ownership
//! guard against its owner and only then mutates. A missing account is
//! reported as not found before any ownership question arises.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{AccountStore, AccountStoreError, AccountsCommand, AccountsQuery};
use crate::domain::{
    Account, AccountDraft, AccountNumber, AccountPatch, Error, UserId, authorize,
};

/// Account service implementing the account driving ports.
#[derive(Clone)]
pub struct AccountService<A> {
    accounts: Arc<A>,
}

impl<A> AccountService<A> {
    /// Create a new service over the given store.
    pub fn new(accounts: Arc<A>) -> Self {
        Self { accounts }
    }
}

/// Map account store failures onto domain errors.
pub(crate) fn map_account_store_error(error: AccountStoreError) -> Error {
    match error {
        AccountStoreError::NotFound { account_number } => {
            Error::not_found("Bank account was not found")
                .with_details(json!({ "accountNumber": account_number }))
        }
        AccountStoreError::InsufficientFunds { account_number } => {
            Error::insufficient_funds("Insufficient funds to process transaction")
                .with_details(json!({ "accountNumber": account_number }))
        }
        AccountStoreError::BalanceOverflow { .. } | AccountStoreError::IdentifierExhausted { .. } => {
            Error::internal(format!("account store error: {error}"))
        }
    }
}

/// Fetch `number` and confirm `caller` owns it.
pub(crate) async fn fetch_owned<A>(
    accounts: &A,
    caller: &UserId,
    number: &AccountNumber,
    denied_message: &'static str,
) -> Result<Account, Error>
where
    A: AccountStore + ?Sized,
{
    let account = accounts
        .fetch(number)
        .await
        .map_err(map_account_store_error)?;
    authorize(caller, account.owner()).map_err(|denied| {
        debug!(%denied, account_number = %number, "account access denied");
        Error::forbidden(denied_message)
    })?;
    Ok(account)
}

const ACCESS_DENIED: &str = "Forbidden: You can only access your own bank account";

#[async_trait]
impl<A> AccountsCommand for AccountService<A>
where
    A: AccountStore,
{
    async fn open(&self, caller: &UserId, draft: AccountDraft) -> Result<Account, Error> {
        let account = self
            .accounts
            .create(caller, draft)
            .await
            .map_err(map_account_store_error)?;
        info!(
            account_number = %account.account_number(),
            owner = %caller,
            "account opened"
        );
        Ok(account)
    }

    async fn update(
        &self,
        caller: &UserId,
        number: &AccountNumber,
        patch: AccountPatch,
    ) -> Result<Account, Error> {
        fetch_owned(self.accounts.as_ref(), caller, number, ACCESS_DENIED).await?;
        self.accounts
            .update(number, patch)
            .await
            .map_err(map_account_store_error)
    }

    async fn close(&self, caller: &UserId, number: &AccountNumber) -> Result<(), Error> {
        fetch_owned(self.accounts.as_ref(), caller, number, ACCESS_DENIED).await?;
        self.accounts
            .delete(number)
            .await
            .map_err(map_account_store_error)?;
        info!(account_number = %number, "account closed");
        Ok(())
    }
}

#[async_trait]
impl<A> AccountsQuery for AccountService<A>
where
    A: AccountStore,
{
    async fn list(&self, caller: &UserId) -> Result<Vec<Account>, Error> {
        self.accounts
            .list(caller)
            .await
            .map_err(map_account_store_error)
    }

    async fn fetch(&self, caller: &UserId, number: &AccountNumber) -> Result<Account, Error> {
        fetch_owned(self.accounts.as_ref(), caller, number, ACCESS_DENIED).await
    }
}
