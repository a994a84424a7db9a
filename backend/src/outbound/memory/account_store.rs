//! In-memory account store.
//!
//! Each account lives behind its own `parking_lot::Mutex` inside a
//! `DashMap`, so balance adjustments on one account serialise while other
//! accounts proceed in parallel. Map shard guards are never held while an
//! account mutex is being acquired.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use mockable::Clock;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::ports::{AccountStore, AccountStoreError};
use crate::domain::{
    Account, AccountDraft, AccountNumber, AccountPatch, BalanceError, MAX_ID_ATTEMPTS, UserId,
};

type AccountHandle = Arc<Mutex<Account>>;
type NumberSource = Box<dyn Fn() -> AccountNumber + Send + Sync>;

/// `DashMap`-backed [`AccountStore`].
pub struct InMemoryAccountStore {
    accounts: DashMap<AccountNumber, AccountHandle>,
    retired: DashSet<AccountNumber>,
    clock: Arc<dyn Clock>,
    next_number: NumberSource,
}

impl InMemoryAccountStore {
    /// Create an empty store drawing random account numbers.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_number_source(clock, Box::new(AccountNumber::random))
    }

    /// Create an empty store drawing account numbers from `next_number`.
    pub fn with_number_source(clock: Arc<dyn Clock>, next_number: NumberSource) -> Self {
        Self {
            accounts: DashMap::new(),
            retired: DashSet::new(),
            clock,
            next_number,
        }
    }

    fn handle(&self, number: &AccountNumber) -> Result<AccountHandle, AccountStoreError> {
        self.accounts
            .get(number)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| AccountStoreError::not_found(number.as_ref()))
    }

    fn is_current(&self, number: &AccountNumber, handle: &AccountHandle) -> bool {
        self.accounts
            .get(number)
            .is_some_and(|entry| Arc::ptr_eq(entry.value(), handle))
    }

    /// Run `f` with the account's mutex held.
    ///
    /// Fails with not found if the account was removed (or replaced) between
    /// the lookup and acquiring the lock.
    fn with_locked<T, E>(
        &self,
        number: &AccountNumber,
        f: impl FnOnce(&mut Account) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<AccountStoreError>,
    {
        let handle = self.handle(number)?;
        let mut account = handle.lock();
        if !self.is_current(number, &handle) {
            return Err(AccountStoreError::not_found(number.as_ref()).into());
        }
        f(&mut *account)
    }

    /// Adjust the balance by `delta` and run `commit` inside the same
    /// critical section.
    ///
    /// `commit` sees the account as it will be after the adjustment. The
    /// adjustment is only applied when `commit` succeeds, so a failing commit
    /// leaves the account untouched. Anything `commit` writes happens-after
    /// every earlier adjustment of this account and before any later one.
    ///
    /// # Errors
    /// Not found when the account does not exist, insufficient funds when a
    /// negative delta exceeds the balance, or whatever `commit` returns.
    pub fn adjust_balance_then<T, E>(
        &self,
        number: &AccountNumber,
        delta: Decimal,
        commit: impl FnOnce(&Account) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<AccountStoreError>,
    {
        self.with_locked(number, |account| {
            let mut staged = account.clone();
            staged
                .adjust(delta, self.clock.utc())
                .map_err(|err| match err {
                    BalanceError::InsufficientFunds => {
                        AccountStoreError::insufficient_funds(number.as_ref())
                    }
                    BalanceError::Overflow => AccountStoreError::balance_overflow(number.as_ref()),
                })?;
            let out = commit(&staged)?;
            *account = staged;
            Ok(out)
        })
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn create(
        &self,
        owner: &UserId,
        draft: AccountDraft,
    ) -> Result<Account, AccountStoreError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let number = (self.next_number)();
            if self.retired.contains(&number) {
                continue;
            }
            match self.accounts.entry(number.clone()) {
                Entry::Occupied(_) => {
                    debug!(account_number = %number, "account number collision, retrying");
                }
                Entry::Vacant(slot) => {
                    let account = Account::open(number, owner.clone(), draft, self.clock.utc());
                    slot.insert(Arc::new(Mutex::new(account.clone())));
                    return Ok(account);
                }
            }
        }
        Err(AccountStoreError::identifier_exhausted(MAX_ID_ATTEMPTS))
    }

    async fn list(&self, owner: &UserId) -> Result<Vec<Account>, AccountStoreError> {
        let handles: Vec<AccountHandle> = self
            .accounts
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        let mut owned: Vec<Account> = handles
            .iter()
            .filter_map(|handle| {
                let account = handle.lock();
                (account.owner() == owner).then(|| account.clone())
            })
            .collect();
        owned.sort_by(|a, b| a.account_number().cmp(b.account_number()));
        Ok(owned)
    }

    async fn fetch(&self, number: &AccountNumber) -> Result<Account, AccountStoreError> {
        let handle = self.handle(number)?;
        let account = handle.lock().clone();
        Ok(account)
    }

    async fn update(
        &self,
        number: &AccountNumber,
        patch: AccountPatch,
    ) -> Result<Account, AccountStoreError> {
        let now = self.clock.utc();
        self.with_locked(number, |account| {
            account.apply(patch, now);
            Ok(account.clone())
        })
    }

    async fn delete(&self, number: &AccountNumber) -> Result<(), AccountStoreError> {
        // Retire before removing so a concurrent create cannot reissue it.
        let newly_retired = self.retired.insert(number.clone());
        if self.accounts.remove(number).is_some() {
            return Ok(());
        }
        if newly_retired {
            self.retired.remove(number);
        }
        Err(AccountStoreError::not_found(number.as_ref()))
    }

    async fn adjust_balance(
        &self,
        number: &AccountNumber,
        delta: Decimal,
    ) -> Result<Decimal, AccountStoreError> {
        self.adjust_balance_then(number, delta, |account| {
            Ok::<_, AccountStoreError>(account.balance())
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::AccountType;
    use crate::test_support::MutableClock;
    use chrono::{Duration, TimeZone, Utc};
    use rstest::{fixture, rstest};
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        Arc::new(MutableClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0)
                .single()
                .expect("valid time"),
        ))
    }

    #[fixture]
    fn owner() -> UserId {
        UserId::new("usr-owner1").expect("owner id")
    }

    fn draft(name: &str) -> AccountDraft {
        AccountDraft {
            name: name.to_owned(),
            account_type: AccountType::Personal,
        }
    }

    fn scripted(numbers: &'static [&'static str]) -> NumberSource {
        let cursor = AtomicUsize::new(0);
        Box::new(move || {
            let index = cursor.fetch_add(1, Ordering::SeqCst) % numbers.len();
            let value = numbers.get(index).expect("scripted index in range");
            AccountNumber::new(*value).expect("scripted number")
        })
    }

    #[rstest]
    #[tokio::test]
    async fn create_then_fetch(clock: Arc<MutableClock>, owner: UserId) {
        let store = InMemoryAccountStore::new(clock);
        let created = store.create(&owner, draft("Bills")).await.expect("create");
        let fetched = store
            .fetch(created.account_number())
            .await
            .expect("fetch");
        assert_eq!(created, fetched);
        assert_eq!(fetched.balance(), Decimal::ZERO);
    }

    #[rstest]
    #[tokio::test]
    async fn collisions_are_retried(clock: Arc<MutableClock>, owner: UserId) {
        let store = InMemoryAccountStore::with_number_source(
            clock,
            scripted(&["01000001", "01000001", "01000002"]),
        );
        let first = store.create(&owner, draft("A")).await.expect("first");
        let second = store.create(&owner, draft("B")).await.expect("second");

        assert_eq!(first.account_number().as_ref(), "01000001");
        assert_eq!(second.account_number().as_ref(), "01000002");
        assert_eq!(
            store
                .fetch(first.account_number())
                .await
                .expect("first survives")
                .name(),
            "A"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn exhausted_numbers_are_reported(clock: Arc<MutableClock>, owner: UserId) {
        let store = InMemoryAccountStore::with_number_source(clock, scripted(&["01000001"]));
        store.create(&owner, draft("A")).await.expect("first");
        let err = store
            .create(&owner, draft("B"))
            .await
            .expect_err("must exhaust");
        assert_eq!(err, AccountStoreError::identifier_exhausted(MAX_ID_ATTEMPTS));
    }

    #[rstest]
    #[tokio::test]
    async fn deleted_numbers_are_never_reissued(clock: Arc<MutableClock>, owner: UserId) {
        let store = InMemoryAccountStore::with_number_source(
            clock,
            scripted(&["01000001", "01000001", "01000009"]),
        );
        let first = store.create(&owner, draft("A")).await.expect("first");
        store
            .delete(first.account_number())
            .await
            .expect("delete");
        let second = store.create(&owner, draft("B")).await.expect("second");
        assert_eq!(second.account_number().as_ref(), "01000009");
    }

    #[rstest]
    #[tokio::test]
    async fn list_filters_by_owner_and_sorts(clock: Arc<MutableClock>, owner: UserId) {
        let store = InMemoryAccountStore::with_number_source(
            clock,
            scripted(&["01000005", "01000002", "01000003"]),
        );
        let other = UserId::new("usr-other").expect("id");
        store.create(&owner, draft("A")).await.expect("create");
        store.create(&other, draft("B")).await.expect("create");
        store.create(&owner, draft("C")).await.expect("create");

        let numbers: Vec<String> = store
            .list(&owner)
            .await
            .expect("list")
            .iter()
            .map(|account| account.account_number().to_string())
            .collect();
        assert_eq!(numbers, vec!["01000003", "01000005"]);
    }

    #[rstest]
    #[tokio::test]
    async fn update_touches_only_patched_fields(clock: Arc<MutableClock>, owner: UserId) {
        let store = InMemoryAccountStore::new(clock.clone());
        let created = store.create(&owner, draft("Bills")).await.expect("create");
        clock.advance(Duration::minutes(5));

        let updated = store
            .update(
                created.account_number(),
                AccountPatch {
                    name: Some("Rent".to_owned()),
                    account_type: None,
                },
            )
            .await
            .expect("update");
        assert_eq!(updated.name(), "Rent");
        assert_eq!(updated.account_type(), AccountType::Personal);
        assert_eq!(updated.created_timestamp(), created.created_timestamp());
        assert!(updated.updated_timestamp() > created.updated_timestamp());
    }

    #[rstest]
    #[tokio::test]
    async fn missing_accounts_are_not_found(clock: Arc<MutableClock>) {
        let store = InMemoryAccountStore::new(clock);
        let number = AccountNumber::new("01999999").expect("number");
        assert!(matches!(
            store.fetch(&number).await,
            Err(AccountStoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.delete(&number).await,
            Err(AccountStoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.adjust_balance(&number, dec!(1)).await,
            Err(AccountStoreError::NotFound { .. })
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn overdraft_is_refused(clock: Arc<MutableClock>, owner: UserId) {
        let store = InMemoryAccountStore::new(clock);
        let account = store.create(&owner, draft("Bills")).await.expect("create");
        let number = account.account_number();

        assert_eq!(store.adjust_balance(number, dec!(100)).await, Ok(dec!(100)));
        assert_eq!(
            store.adjust_balance(number, dec!(-150)).await,
            Err(AccountStoreError::insufficient_funds(number.as_ref()))
        );
        assert_eq!(store.adjust_balance(number, dec!(-100)).await, Ok(dec!(0)));
    }

    #[rstest]
    #[tokio::test]
    async fn failed_commit_leaves_balance_untouched(clock: Arc<MutableClock>, owner: UserId) {
        let store = InMemoryAccountStore::new(clock);
        let account = store.create(&owner, draft("Bills")).await.expect("create");
        let number = account.account_number();

        let result: Result<(), AccountStoreError> =
            store.adjust_balance_then(number, dec!(25), |_| {
                Err(AccountStoreError::identifier_exhausted(1_usize))
            });
        assert!(result.is_err());
        assert_eq!(
            store.fetch(number).await.expect("fetch").balance(),
            Decimal::ZERO
        );
    }
}
