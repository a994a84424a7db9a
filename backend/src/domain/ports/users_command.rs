//! Driving port for user registration and profile updates.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId, UserPatch, UserProfile};

/// Use-case port for writing user profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Register a new user. Registration needs no caller identity.
    async fn register(&self, profile: UserProfile) -> Result<User, Error>;

    /// Update `target` on behalf of `caller`, who must be the same user.
    async fn update(&self, caller: &UserId, target: &UserId, patch: UserPatch)
    -> Result<User, Error>;
}
