//! In-memory user store.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{UserStore, UserStoreError};
use crate::domain::{MAX_ID_ATTEMPTS, User, UserId, UserPatch, UserProfile};

type IdSource = Box<dyn Fn() -> UserId + Send + Sync>;

/// `DashMap`-backed [`UserStore`].
pub struct InMemoryUserStore {
    users: DashMap<UserId, User>,
    clock: Arc<dyn Clock>,
    next_id: IdSource,
}

impl InMemoryUserStore {
    /// Create an empty store drawing random user ids.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_id_source(clock, Box::new(UserId::random))
    }

    /// Create an empty store drawing user ids from `next_id`.
    pub fn with_id_source(clock: Arc<dyn Clock>, next_id: IdSource) -> Self {
        Self {
            users: DashMap::new(),
            clock,
            next_id,
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, profile: UserProfile) -> Result<User, UserStoreError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = (self.next_id)();
            match self.users.entry(id.clone()) {
                Entry::Occupied(_) => debug!(user_id = %id, "user id collision, retrying"),
                Entry::Vacant(slot) => {
                    let user = User::new(id, profile, self.clock.utc());
                    slot.insert(user.clone());
                    return Ok(user);
                }
            }
        }
        Err(UserStoreError::identifier_exhausted(MAX_ID_ATTEMPTS))
    }

    async fn fetch(&self, id: &UserId) -> Result<User, UserStoreError> {
        self.users
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| UserStoreError::not_found(id.as_ref()))
    }

    async fn update(&self, id: &UserId, patch: UserPatch) -> Result<User, UserStoreError> {
        let now = self.clock.utc();
        let mut entry = self
            .users
            .get_mut(id)
            .ok_or_else(|| UserStoreError::not_found(id.as_ref()))?;
        entry.apply(patch, now);
        Ok(entry.value().clone())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{Address, AddressPatch, EmailAddress, PhoneNumber};
    use crate::test_support::MutableClock;
    use chrono::{Duration, TimeZone, Utc};
    use rstest::{fixture, rstest};
    use std::collections::HashSet;

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        Arc::new(MutableClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0)
                .single()
                .expect("valid time"),
        ))
    }

    #[fixture]
    fn profile() -> UserProfile {
        UserProfile {
            name: "Ada Lovelace".to_owned(),
            address: Address {
                line1: "1 Analytical Way".to_owned(),
                line2: Some("Flat 2".to_owned()),
                line3: None,
                town: "London".to_owned(),
                county: "Greater London".to_owned(),
                postcode: "N1 1AA".to_owned(),
            },
            phone_number: PhoneNumber::new("+447700900123").expect("phone"),
            email: EmailAddress::new("ada@example.com").expect("email"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn identical_profiles_get_distinct_ids(clock: Arc<MutableClock>, profile: UserProfile) {
        let store = InMemoryUserStore::new(clock);
        let mut ids = HashSet::new();
        for _ in 0..20 {
            let user = store.create(profile.clone()).await.expect("create");
            assert!(user.id().as_ref().starts_with("usr-"));
            ids.insert(user.id().clone());
        }
        assert_eq!(ids.len(), 20);
    }

    #[rstest]
    #[tokio::test]
    async fn collisions_never_overwrite(clock: Arc<MutableClock>, profile: UserProfile) {
        let store = InMemoryUserStore::with_id_source(
            clock,
            Box::new(|| UserId::new("usr-fixed").expect("id")),
        );
        let first = store.create(profile.clone()).await.expect("first");
        let err = store.create(profile).await.expect_err("second collides");

        assert_eq!(err, UserStoreError::identifier_exhausted(MAX_ID_ATTEMPTS));
        assert_eq!(store.fetch(first.id()).await.expect("fetch"), first);
    }

    #[rstest]
    #[tokio::test]
    async fn update_merges_nested_address(clock: Arc<MutableClock>, profile: UserProfile) {
        let store = InMemoryUserStore::new(clock.clone());
        let created = store.create(profile).await.expect("create");
        clock.advance(Duration::hours(1));

        let updated = store
            .update(
                created.id(),
                UserPatch {
                    address: Some(AddressPatch {
                        postcode: Some("N2 2BB".to_owned()),
                        ..AddressPatch::default()
                    }),
                    ..UserPatch::default()
                },
            )
            .await
            .expect("update");

        assert_eq!(updated.address().postcode, "N2 2BB");
        assert_eq!(updated.address().line2.as_deref(), Some("Flat 2"));
        assert_eq!(updated.created_timestamp(), created.created_timestamp());
        assert_eq!(
            updated.updated_timestamp(),
            created.updated_timestamp() + Duration::hours(1)
        );
        assert_eq!(store.fetch(created.id()).await.expect("fetch"), updated);
    }

    #[rstest]
    #[tokio::test]
    async fn update_never_creates(clock: Arc<MutableClock>) {
        let store = InMemoryUserStore::new(clock);
        let ghost = UserId::new("usr-ghost").expect("id");
        let err = store
            .update(&ghost, UserPatch::default())
            .await
            .expect_err("must be missing");
        assert_eq!(err, UserStoreError::not_found("usr-ghost"));
        assert!(store.fetch(&ghost).await.is_err());
    }
}
