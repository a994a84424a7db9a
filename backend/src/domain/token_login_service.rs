//! Login use-case: exchange a known user id for a bearer token.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{IssuedToken, LoginService, TokenIssuer, UserStore};
use crate::domain::user_service::map_user_store_error;
use crate::domain::{Error, UserId};

/// Issues tokens only for users that exist in the store.
#[derive(Clone)]
pub struct TokenLoginService<S, T> {
    users: Arc<S>,
    issuer: Arc<T>,
}

impl<S, T> TokenLoginService<S, T> {
    pub fn new(users: Arc<S>, issuer: Arc<T>) -> Self {
        Self { users, issuer }
    }
}

#[async_trait]
impl<S, T> LoginService for TokenLoginService<S, T>
where
    S: UserStore,
    T: TokenIssuer,
{
    async fn login(&self, user_id: &UserId) -> Result<IssuedToken, Error> {
        self.users
            .fetch(user_id)
            .await
            .map_err(map_user_store_error)?;
        let token = self
            .issuer
            .issue(user_id)
            .await
            .map_err(|err| Error::internal(format!("token issuance failed: {err}")))?;
        info!(user_id = %user_id, expires_at = %token.expires_at, "token issued");
        Ok(token)
    }
}
