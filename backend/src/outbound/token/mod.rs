//! HS256 JSON Web Tokens for bearer authentication.
//!
//! Tokens carry `sub` (the user id), `iat` and `exp` claims. The codec
//! implements both [`crate::domain::ports::IdentityVerifier`] and
//! [`crate::domain::ports::TokenIssuer`].

mod jwt_codec;
mod signing_key;

pub use jwt_codec::JwtCodec;
pub use signing_key::{SigningKey, key_fingerprint};
