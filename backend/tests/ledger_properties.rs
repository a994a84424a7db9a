//! Balance invariants of the in-memory ledger under arbitrary and concurrent
//! postings.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bank_backend::domain::ports::{
    AccountStore, AccountStoreError, LedgerError, TransactionLedger, UserStore,
};
use bank_backend::domain::{
    AccountDraft, AccountNumber, AccountType, Address, Amount, Currency, EmailAddress,
    MAX_ID_ATTEMPTS, PhoneNumber, PostingRequest, TransactionType, UserId, UserProfile,
};
use bank_backend::outbound::memory::InMemoryAccountStore;
use bank_backend::test_support::MutableClock;
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mod support;

use support::{Bank, epoch};

fn posting(kind: TransactionType, amount: Decimal) -> PostingRequest {
    PostingRequest {
        amount: Amount::new(amount).expect("valid amount"),
        currency: Currency::Gbp,
        transaction_type: kind,
        reference: None,
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("tokio runtime")
}

fn operation() -> impl Strategy<Value = (TransactionType, Decimal)> {
    (
        prop_oneof![Just(TransactionType::Deposit), Just(TransactionType::Withdrawal)],
        1_i64..=1_000_000,
    )
        .prop_map(|(kind, pence)| (kind, Decimal::new(pence, 2)))
}

proptest! {
    #[test]
    fn balance_tracks_the_log_and_never_goes_negative(
        ops in proptest::collection::vec(operation(), 1..60)
    ) {
        runtime().block_on(async {
            let bank = Bank::new();
            let number = bank.open_account("usr-owner1").await;
            let mut expected = Decimal::ZERO;

            for (kind, amount) in ops {
                let result = bank.ledger.post(&number, posting(kind, amount)).await;
                let would_overdraw =
                    kind == TransactionType::Withdrawal && amount > expected;
                if would_overdraw {
                    prop_assert_eq!(
                        result,
                        Err(LedgerError::insufficient_funds(number.as_ref()))
                    );
                } else {
                    prop_assert!(result.is_ok());
                    expected += kind.signed(Amount::new(amount).expect("valid amount"));
                }

                let balance = bank.accounts.fetch(&number).await.expect("account").balance();
                prop_assert!(balance >= Decimal::ZERO);
                prop_assert_eq!(balance, expected);
            }

            let log = bank.ledger.list(&number).await.expect("log");
            let replayed: Decimal = log.iter().map(|tx| tx.signed_amount()).sum();
            prop_assert_eq!(replayed, expected);
            Ok(())
        })?;
    }
}

#[rstest]
#[case(20, dec!(10), dec!(50), 5)]
#[case(16, dec!(25), dec!(100), 4)]
#[case(8, dec!(30), dec!(20), 0)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_withdrawals_never_overdraw(
    #[case] attempts: usize,
    #[case] each: Decimal,
    #[case] opening: Decimal,
    #[case] expected_successes: usize,
) {
    let bank = Bank::new();
    let number = bank.open_account("usr-owner1").await;
    bank.ledger
        .post(&number, posting(TransactionType::Deposit, opening))
        .await
        .expect("opening deposit");

    let handles: Vec<_> = (0..attempts)
        .map(|_| {
            let ledger = Arc::clone(&bank.ledger);
            let number = number.clone();
            tokio::spawn(async move {
                ledger
                    .post(&number, posting(TransactionType::Withdrawal, each))
                    .await
            })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.await.expect("task completes") {
            Ok(_) => successes += 1,
            Err(err) => assert_eq!(err, LedgerError::insufficient_funds(number.as_ref())),
        }
    }

    assert_eq!(successes, expected_successes);
    let balance = bank.accounts.fetch(&number).await.expect("account").balance();
    assert_eq!(balance, opening - each * Decimal::from(expected_successes));
    let log = bank.ledger.list(&number).await.expect("log");
    assert_eq!(log.len(), expected_successes + 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_deposits_are_all_counted() {
    let bank = Bank::new();
    let number = bank.open_account("usr-owner1").await;

    let handles: Vec<_> = (0..50)
        .map(|_| {
            let ledger = Arc::clone(&bank.ledger);
            let number = number.clone();
            tokio::spawn(async move {
                ledger
                    .post(&number, posting(TransactionType::Deposit, dec!(1.25)))
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.expect("task completes").expect("deposit");
    }

    let balance = bank.accounts.fetch(&number).await.expect("account").balance();
    assert_eq!(balance, dec!(62.50));
    assert_eq!(bank.ledger.list(&number).await.expect("log").len(), 50);
}

#[tokio::test]
async fn accounts_are_isolated_from_each_other() {
    let bank = Bank::new();
    let first = bank.open_account("usr-owner1").await;
    let second = bank.open_account("usr-owner1").await;

    bank.ledger
        .post(&first, posting(TransactionType::Deposit, dec!(100)))
        .await
        .expect("deposit");
    let refused = bank
        .ledger
        .post(&second, posting(TransactionType::Withdrawal, dec!(1)))
        .await;

    assert_eq!(refused, Err(LedgerError::insufficient_funds(second.as_ref())));
    assert!(bank.ledger.list(&second).await.expect("log").is_empty());
    assert_eq!(
        bank.accounts.fetch(&first).await.expect("account").balance(),
        dec!(100)
    );
}

fn profile() -> UserProfile {
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

fn draft() -> AccountDraft {
    AccountDraft {
        name: "Everyday".to_owned(),
        account_type: AccountType::Personal,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creation_issues_distinct_identifiers() {
    const CALLERS: usize = 64;
    let bank = Bank::new();
    let owner = UserId::new("usr-owner1").expect("owner id");

    let user_tasks: Vec<_> = (0..CALLERS)
        .map(|_| {
            let users = Arc::clone(&bank.users);
            tokio::spawn(async move { users.create(profile()).await })
        })
        .collect();
    let account_tasks: Vec<_> = (0..CALLERS)
        .map(|_| {
            let accounts = Arc::clone(&bank.accounts);
            let owner = owner.clone();
            tokio::spawn(async move { accounts.create(&owner, draft()).await })
        })
        .collect();

    let mut user_ids = HashSet::new();
    for task in user_tasks {
        let user = task.await.expect("task completes").expect("create user");
        user_ids.insert(user.id().clone());
    }
    let mut numbers = Vec::new();
    for task in account_tasks {
        let account = task.await.expect("task completes").expect("open account");
        numbers.push(account.account_number().clone());
    }
    let distinct_numbers: HashSet<_> = numbers.iter().cloned().collect();

    assert_eq!(user_ids.len(), CALLERS);
    assert_eq!(distinct_numbers.len(), CALLERS);
    assert_eq!(bank.accounts.list(&owner).await.expect("list").len(), CALLERS);

    let posting_tasks: Vec<_> = numbers
        .iter()
        .flat_map(|number| std::iter::repeat_n(number.clone(), 4))
        .map(|number| {
            let ledger = Arc::clone(&bank.ledger);
            tokio::spawn(async move {
                ledger
                    .post(&number, posting(TransactionType::Deposit, dec!(1)))
                    .await
            })
        })
        .collect();
    let mut transaction_ids = HashSet::new();
    for task in posting_tasks {
        let tx = task.await.expect("task completes").expect("deposit");
        transaction_ids.insert(tx.id().clone());
    }
    assert_eq!(transaction_ids.len(), CALLERS * 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn colliding_numbers_never_overwrite_under_contention() {
    const POOL: usize = 4;
    const CALLERS: usize = 16;
    let cursor = AtomicUsize::new(0);
    let accounts = Arc::new(InMemoryAccountStore::with_number_source(
        Arc::new(MutableClock::new(epoch())),
        Box::new(move || {
            let slot = cursor.fetch_add(1, Ordering::Relaxed) % POOL;
            AccountNumber::new(format!("0100000{slot}")).expect("scripted number")
        }),
    ));

    let tasks: Vec<_> = (0..CALLERS)
        .map(|caller| {
            let accounts = Arc::clone(&accounts);
            tokio::spawn(async move {
                let owner = UserId::new(format!("usr-caller{caller}")).expect("owner id");
                accounts.create(&owner, draft()).await
            })
        })
        .collect();

    let mut opened = Vec::new();
    for task in tasks {
        match task.await.expect("task completes") {
            Ok(account) => opened.push(account),
            Err(err) => assert_eq!(
                err,
                AccountStoreError::identifier_exhausted(MAX_ID_ATTEMPTS)
            ),
        }
    }

    assert!(!opened.is_empty());
    assert!(opened.len() <= POOL);
    let distinct: HashSet<_> = opened.iter().map(|a| a.account_number().clone()).collect();
    assert_eq!(distinct.len(), opened.len());
    for account in &opened {
        let stored = accounts
            .fetch(account.account_number())
            .await
            .expect("account");
        assert_eq!(&stored, account);
    }
}
