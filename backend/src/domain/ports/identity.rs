//! Driven ports for bearer credentials.
//!
//! [`IdentityVerifier`] turns an opaque credential into the caller's
//! [`UserId`]. [`TokenIssuer`] mints such credentials after login.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential adapters.
    pub enum IdentityError {
        /// The credential is malformed, forged or expired.
        InvalidCredential { reason: String } => "invalid credential: {reason}",
        /// A credential could not be produced.
        Issuance { message: String } => "credential issuance failed: {message}",
    }
}

/// A freshly minted bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Resolve a bearer credential to the identity it was issued for.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn resolve(&self, credential: &str) -> Result<UserId, IdentityError>;
}

/// Mint bearer credentials for a subject.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn issue(&self, subject: &UserId) -> Result<IssuedToken, IdentityError>;
}
