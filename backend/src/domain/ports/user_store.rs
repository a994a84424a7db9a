//! Driven port for the user profile store.

use async_trait::async_trait;

use crate::domain::{User, UserId, UserPatch, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user store adapters.
    pub enum UserStoreError {
        /// No user exists with the given identifier.
        NotFound { user_id: String } => "user {user_id} not found",
        /// Every generated identifier collided with an existing user.
        IdentifierExhausted { attempts: usize } =>
            "could not allocate a unique user id after {attempts} attempts",
    }
}

/// Keyed store of user profiles.
///
/// Implementations own identifier generation and must never overwrite an
/// existing user when allocating a new id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Register a new user with a fresh identifier.
    async fn create(&self, profile: UserProfile) -> Result<User, UserStoreError>;

    /// Fetch a user by identifier.
    async fn fetch(&self, id: &UserId) -> Result<User, UserStoreError>;

    /// Apply a partial update to an existing user.
    async fn update(&self, id: &UserId, patch: UserPatch) -> Result<User, UserStoreError>;
}
