//! Token signing key material and fingerprinting.
//!
//! The fingerprint is a truncated SHA-256 of the key so operators can tell
//! which key is active from startup logs without exposing the key itself.

use std::fmt;

use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Length of the fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;
/// Size of keys produced by [`SigningKey::generate`].
const GENERATED_KEY_LEN: usize = 64;

/// Secret used to sign and verify bearer tokens. Wiped on drop.
#[derive(Clone)]
pub struct SigningKey(Zeroizing<Vec<u8>>);

impl SigningKey {
    /// Wrap existing key bytes.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Generate a random key for development use.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = vec![0_u8; GENERATED_KEY_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::from_bytes(bytes)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningKey")
            .field(&key_fingerprint(self))
            .finish()
    }
}

/// Generate a truncated SHA-256 fingerprint of the key.
///
/// Returns the first 8 bytes of the hash as a 16-character lowercase hex
/// string.
///
/// # Examples
///
/// ```rust
/// use bank_backend::outbound::token::{SigningKey, key_fingerprint};
///
/// let fp = key_fingerprint(&SigningKey::generate());
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn key_fingerprint(key: &SigningKey) -> String {
    let digest = Sha256::digest(key.as_bytes());
    hex::encode(digest.iter().take(FINGERPRINT_BYTES).copied().collect::<Vec<u8>>())
}
