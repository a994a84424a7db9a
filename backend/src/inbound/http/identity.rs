//! Bearer credential extraction.
//!
//! Handlers take a [`BearerIdentity`] argument to require an authenticated
//! caller. The credential is resolved exactly once per request through the
//! [`crate::domain::ports::IdentityVerifier`] held in [`HttpState`].

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, error};

use crate::domain::{Error, UserId};
use crate::inbound::http::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";
const UNAUTHORIZED_MESSAGE: &str = "Access token is missing or invalid";

/// Identity of the authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerIdentity(UserId);

impl BearerIdentity {
    /// The verified caller id.
    pub fn user_id(&self) -> &UserId {
        &self.0
    }

    pub fn into_inner(self) -> UserId {
        self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix(BEARER_PREFIX)?.trim();
    (!token.is_empty()).then(|| token.to_owned())
}

impl FromRequest for BearerIdentity {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let Some(state) = state else {
                error!("HttpState missing from application data");
                return Err(Error::internal("identity verifier not configured"));
            };
            let Some(token) = token else {
                return Err(Error::unauthorized(UNAUTHORIZED_MESSAGE));
            };
            match state.identity.resolve(&token).await {
                Ok(user_id) => Ok(Self(user_id)),
                Err(reason) => {
                    debug!(%reason, "bearer credential rejected");
                    Err(Error::unauthorized(UNAUTHORIZED_MESSAGE))
                }
            }
        })
    }
}
