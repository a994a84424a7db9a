//! HS256 JSON Web Token codec.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use super::SigningKey;
use crate::domain::UserId;
use crate::domain::ports::{IdentityError, IdentityVerifier, IssuedToken, TokenIssuer};

/// Registered claims carried by every token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies HS256 bearer tokens with `sub`, `iat` and `exp` claims.
///
/// Expiry is checked against the injected clock rather than the system time.
#[derive(Clone)]
pub struct JwtCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtCodec {
    /// Create a codec issuing tokens valid for `ttl`.
    pub fn new(key: SigningKey, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "iat", "exp"]);
        Self {
            encoding: EncodingKey::from_secret(key.as_bytes()),
            decoding: DecodingKey::from_secret(key.as_bytes()),
            validation,
            ttl,
            clock,
        }
    }
}

#[async_trait]
impl TokenIssuer for JwtCodec {
    async fn issue(&self, subject: &UserId) -> Result<IssuedToken, IdentityError> {
        let now = self.clock.utc();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
            .ok_or_else(|| IdentityError::issuance("expiry out of range"))?;
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| IdentityError::issuance(err.to_string()))?;
        Ok(IssuedToken { token, expires_at })
    }
}

#[async_trait]
impl IdentityVerifier for JwtCodec {
    async fn resolve(&self, credential: &str) -> Result<UserId, IdentityError> {
        let claims = decode::<Claims>(credential, &self.decoding, &self.validation)
            .map_err(|err| match err.kind() {
                ErrorKind::InvalidSignature => {
                    IdentityError::invalid_credential("signature mismatch")
                }
                _ => IdentityError::invalid_credential("malformed token"),
            })?
            .claims;
        if claims.exp <= self.clock.utc().timestamp() {
            return Err(IdentityError::invalid_credential("token expired"));
        }
        UserId::new(&claims.sub).map_err(|err| IdentityError::invalid_credential(err.to_string()))
    }
}
