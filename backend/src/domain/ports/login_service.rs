//! Driving port for login.
//!
//! Inbound adapters exchange a user id for a bearer token here without
//! knowing how tokens are signed.

use async_trait::async_trait;

use crate::domain::{Error, UserId};

use super::IssuedToken;

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Issue a token for an existing user.
    async fn login(&self, user_id: &UserId) -> Result<IssuedToken, Error>;
}
