//! Driving port for reading user profiles.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Use-case port for reading a user profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch `target` on behalf of `caller`, who must be the same user.
    async fn fetch(&self, caller: &UserId, target: &UserId) -> Result<User, Error>;
}
