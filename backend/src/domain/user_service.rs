//! User profile use-cases.
//!
//! Registration is open. Reads and updates run the ownership guard against the
//! target id itself, since a user owns their own record.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{UserStore, UserStoreError, UsersCommand, UsersQuery};
use crate::domain::{Error, User, UserId, UserPatch, UserProfile, authorize};

/// User service implementing the user driving ports.
#[derive(Clone)]
pub struct UserService<S> {
    users: Arc<S>,
}

impl<S> UserService<S> {
    /// Create a new service over the given store.
    pub fn new(users: Arc<S>) -> Self {
        Self { users }
    }
}

/// Map user store failures onto domain errors.
pub(crate) fn map_user_store_error(error: UserStoreError) -> Error {
    match error {
        UserStoreError::NotFound { user_id } => {
            Error::not_found("User not found").with_details(json!({ "userId": user_id }))
        }
        UserStoreError::IdentifierExhausted { .. } => {
            Error::internal(format!("user store error: {error}"))
        }
    }
}

impl<S> UserService<S> {
    fn guard(caller: &UserId, target: &UserId) -> Result<(), Error> {
        authorize(caller, target).map_err(|denied| {
            debug!(%denied, "user record access denied");
            Error::forbidden("Forbidden: You can only access your own user details")
        })
    }
}

#[async_trait]
impl<S> UsersCommand for UserService<S>
where
    S: UserStore,
{
    async fn register(&self, profile: UserProfile) -> Result<User, Error> {
        let user = self
            .users
            .create(profile)
            .await
            .map_err(map_user_store_error)?;
        info!(user_id = %user.id(), "user registered");
        Ok(user)
    }

    async fn update(
        &self,
        caller: &UserId,
        target: &UserId,
        patch: UserPatch,
    ) -> Result<User, Error> {
        Self::guard(caller, target)?;
        self.users
            .update(target, patch)
            .await
            .map_err(map_user_store_error)
    }
}

#[async_trait]
impl<S> UsersQuery for UserService<S>
where
    S: UserStore,
{
    async fn fetch(&self, caller: &UserId, target: &UserId) -> Result<User, Error> {
        Self::guard(caller, target)?;
        self.users.fetch(target).await.map_err(map_user_store_error)
    }
}
