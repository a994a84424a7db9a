//! Transaction use-cases.
//!
//! The account is fetched and guarded before the ledger is touched. If the
//! account disappears between the guard and the posting, the ledger's own
//! not-found result is returned and nothing is recorded.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::account_service::fetch_owned;
use crate::domain::ports::{
    AccountStore, LedgerError, TransactionLedger, TransactionsCommand, TransactionsQuery,
};
use crate::domain::{AccountNumber, Error, PostingRequest, Transaction, TransactionId, UserId};

const TRANSACT_DENIED: &str = "Forbidden: You can only transact on your own bank account";
const VIEW_DENIED: &str = "Forbidden: You can only view transactions for your own bank account";

/// Transaction service implementing the ledger driving ports.
#[derive(Clone)]
pub struct TransactionService<A, L> {
    accounts: Arc<A>,
    ledger: Arc<L>,
}

impl<A, L> TransactionService<A, L> {
    /// Create a new service over the given account store and ledger.
    pub fn new(accounts: Arc<A>, ledger: Arc<L>) -> Self {
        Self { accounts, ledger }
    }
}

fn map_ledger_error(error: LedgerError) -> Error {
    match error {
        LedgerError::AccountNotFound { account_number } => {
            Error::not_found("Bank account was not found")
                .with_details(json!({ "accountNumber": account_number }))
        }
        LedgerError::InsufficientFunds { account_number } => {
            Error::insufficient_funds("Insufficient funds to process transaction")
                .with_details(json!({ "accountNumber": account_number }))
        }
        LedgerError::TransactionNotFound { transaction_id } => {
            Error::not_found("Transaction was not found")
                .with_details(json!({ "transactionId": transaction_id }))
        }
        LedgerError::BalanceOverflow { .. } | LedgerError::IdentifierExhausted { .. } => {
            Error::internal(format!("ledger error: {error}"))
        }
    }
}

#[async_trait]
impl<A, L> TransactionsCommand for TransactionService<A, L>
where
    A: AccountStore,
    L: TransactionLedger,
{
    async fn authorize(&self, caller: &UserId, number: &AccountNumber) -> Result<(), Error> {
        fetch_owned(self.accounts.as_ref(), caller, number, TRANSACT_DENIED).await?;
        Ok(())
    }

    async fn post(
        &self,
        caller: &UserId,
        number: &AccountNumber,
        request: PostingRequest,
    ) -> Result<Transaction, Error> {
        fetch_owned(self.accounts.as_ref(), caller, number, TRANSACT_DENIED).await?;
        let transaction = self
            .ledger
            .post(number, request)
            .await
            .map_err(map_ledger_error)?;
        info!(
            account_number = %number,
            transaction_id = %transaction.id(),
            kind = ?transaction.transaction_type(),
            "transaction posted"
        );
        Ok(transaction)
    }
}

#[async_trait]
impl<A, L> TransactionsQuery for TransactionService<A, L>
where
    A: AccountStore,
    L: TransactionLedger,
{
    async fn list(
        &self,
        caller: &UserId,
        number: &AccountNumber,
    ) -> Result<Vec<Transaction>, Error> {
        fetch_owned(self.accounts.as_ref(), caller, number, VIEW_DENIED).await?;
        self.ledger.list(number).await.map_err(map_ledger_error)
    }

    async fn fetch(
        &self,
        caller: &UserId,
        number: &AccountNumber,
        id: &TransactionId,
    ) -> Result<Transaction, Error> {
        fetch_owned(self.accounts.as_ref(), caller, number, VIEW_DENIED).await?;
        self.ledger.fetch(number, id).await.map_err(map_ledger_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{AccountStoreError, MockAccountStore, MockTransactionLedger};
    use crate::domain::{
        Account, AccountDraft, AccountType, Amount, Currency, ErrorCode, TransactionType,
    };
    use chrono::Utc;
    use rstest::{fixture, rstest};
    use rust_decimal_macros::dec;

    #[fixture]
    fn owner() -> UserId {
        UserId::new("usr-owner1").expect("owner id")
    }

    #[fixture]
    fn number() -> AccountNumber {
        AccountNumber::new("01000001").expect("account number")
    }

    fn withdrawal(amount: rust_decimal::Decimal) -> PostingRequest {
        PostingRequest {
            amount: Amount::new(amount).expect("valid amount"),
            currency: Currency::Gbp,
            transaction_type: TransactionType::Withdrawal,
            reference: None,
        }
    }

    fn accounts_owned_by(owner: &UserId, number: &AccountNumber) -> MockAccountStore {
        let account = Account::open(
            number.clone(),
            owner.clone(),
            AccountDraft {
                name: "Everyday".to_owned(),
                account_type: AccountType::Personal,
            },
            Utc::now(),
        );
        let mut store = MockAccountStore::new();
        store
            .expect_fetch()
            .times(1)
            .return_once(move |_| Ok(account));
        store
    }

    fn make_service(
        accounts: MockAccountStore,
        ledger: MockTransactionLedger,
    ) -> TransactionService<MockAccountStore, MockTransactionLedger> {
        TransactionService::new(Arc::new(accounts), Arc::new(ledger))
    }

    #[rstest]
    #[tokio::test]
    async fn post_by_non_owner_never_reaches_ledger(owner: UserId, number: AccountNumber) {
        let accounts = accounts_owned_by(&owner, &number);
        let mut ledger = MockTransactionLedger::new();
        ledger.expect_post().times(0);

        let intruder = UserId::new("usr-intruder").expect("id");
        let err = make_service(accounts, ledger)
            .post(&intruder, &number, withdrawal(dec!(10)))
            .await
            .expect_err("must be forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(err.message(), TRANSACT_DENIED);
    }

    #[rstest]
    #[tokio::test]
    async fn authorize_uses_the_posting_denial(owner: UserId, number: AccountNumber) {
        let service = make_service(
            accounts_owned_by(&owner, &number),
            MockTransactionLedger::new(),
        );
        let intruder = UserId::new("usr-intruder").expect("id");
        let err = service
            .authorize(&intruder, &number)
            .await
            .expect_err("must be forbidden");
        assert_eq!(err.message(), TRANSACT_DENIED);
    }

    #[rstest]
    #[tokio::test]
    async fn insufficient_funds_propagates(owner: UserId, number: AccountNumber) {
        let accounts = accounts_owned_by(&owner, &number);
        let mut ledger = MockTransactionLedger::new();
        ledger
            .expect_post()
            .times(1)
            .return_once(|n, _| Err(LedgerError::insufficient_funds(n.as_ref())));

        let err = make_service(accounts, ledger)
            .post(&owner, &number, withdrawal(dec!(150)))
            .await
            .expect_err("must be refused");
        assert_eq!(err.code(), ErrorCode::InsufficientFunds);
    }

    #[rstest]
    #[tokio::test]
    async fn deleted_between_guard_and_post_is_not_found(owner: UserId, number: AccountNumber) {
        let accounts = accounts_owned_by(&owner, &number);
        let mut ledger = MockTransactionLedger::new();
        ledger
            .expect_post()
            .times(1)
            .return_once(|n, _| Err(LedgerError::account_not_found(n.as_ref())));

        let err = make_service(accounts, ledger)
            .post(&owner, &number, withdrawal(dec!(1)))
            .await
            .expect_err("must be missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn list_for_missing_account_is_not_found(number: AccountNumber) {
        let mut accounts = MockAccountStore::new();
        accounts
            .expect_fetch()
            .times(1)
            .return_once(|n| Err(AccountStoreError::not_found(n.as_ref())));
        let mut ledger = MockTransactionLedger::new();
        ledger.expect_list().times(0);

        let caller = UserId::new("usr-anyone").expect("id");
        let err = make_service(accounts, ledger)
            .list(&caller, &number)
            .await
            .expect_err("must be missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn fetch_unknown_transaction_is_not_found(owner: UserId, number: AccountNumber) {
        let accounts = accounts_owned_by(&owner, &number);
        let mut ledger = MockTransactionLedger::new();
        ledger
            .expect_fetch()
            .times(1)
            .return_once(|_, id| Err(LedgerError::transaction_not_found(id.as_ref())));

        let id = TransactionId::new("tan-missing").expect("id");
        let err = make_service(accounts, ledger)
            .fetch(&owner, &number, &id)
            .await
            .expect_err("must be missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "Transaction was not found");
    }
}
