//! Bearer token configuration parsing and validation.
//!
//! Token settings come from the environment so they can be validated the same
//! way in every entry point and tested in isolation through `mockable::Env`.

use std::path::PathBuf;

use chrono::Duration;
use mockable::Env;
use tracing::{info, warn};

use crate::outbound::token::{SigningKey, key_fingerprint};

const TOKEN_KEY_DEFAULT_PATH: &str = "/var/run/secrets/token_key";
const TOKEN_KEY_MIN_LEN: usize = 32;
const TOKEN_TTL_DEFAULT_SECS: i64 = 3600;
const TOKEN_TTL_MAX_SECS: i64 = 86_400;
const KEY_FILE_ENV: &str = "TOKEN_KEY_FILE";
const TTL_ENV: &str = "TOKEN_TTL_SECS";
const ALLOW_EPHEMERAL_ENV: &str = "TOKEN_ALLOW_EPHEMERAL";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const TTL_EXPECTED: &str = "whole seconds between 1 and 86400";

/// Build mode for token configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require an explicit, adequately sized key.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bank_backend::inbound::http::token_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Token settings derived from the environment.
#[derive(Debug)]
pub struct TokenSettings {
    /// Key used to sign and verify bearer tokens.
    pub key: SigningKey,
    /// Lifetime of newly issued tokens.
    pub ttl: Duration,
}

/// Errors raised while validating token configuration.
#[derive(thiserror::Error, Debug)]
pub enum TokenConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the key file failed.
    #[error("failed to read token key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The key file exists but is too short for release builds.
    #[error("token key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// Release builds must not allow ephemeral keys.
    #[error("TOKEN_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Build token settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use bank_backend::inbound::http::token_config::{BuildMode, token_settings_from_env};
/// use mockable::MockEnv;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let key_path = std::env::temp_dir().join("token_key_example");
/// std::fs::write(&key_path, vec![b'a'; 32])?;
///
/// let key_path = key_path.to_str().expect("valid path").to_string();
/// let mut env = MockEnv::new();
/// env.expect_string()
///     .returning(move |name| match name {
///         "TOKEN_KEY_FILE" => Some(key_path.clone()),
///         "TOKEN_TTL_SECS" => Some("900".to_string()),
///         "TOKEN_ALLOW_EPHEMERAL" => Some("0".to_string()),
///         _ => None,
///     });
///
/// let settings = token_settings_from_env(&env, BuildMode::Release)?;
/// assert_eq!(settings.ttl.num_seconds(), 900);
///
/// std::fs::remove_file(std::env::temp_dir().join("token_key_example"))?;
/// # Ok(())
/// # }
/// ```
pub fn token_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSettings, TokenConfigError> {
    let ttl = ttl_from_env(env, mode)?;
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let key = signing_key_from_env(env, mode, allow_ephemeral)?;
    info!(
        fingerprint = %key_fingerprint(&key),
        ttl_secs = ttl.num_seconds(),
        "token signing key loaded"
    );
    Ok(TokenSettings { key, ttl })
}

fn ttl_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Duration, TokenConfigError> {
    let Some(value) = env.string(TTL_ENV) else {
        return Ok(Duration::seconds(TOKEN_TTL_DEFAULT_SECS));
    };
    match value.trim().parse::<i64>() {
        Ok(secs) if (1..=TOKEN_TTL_MAX_SECS).contains(&secs) => Ok(Duration::seconds(secs)),
        _ if mode.is_debug() => {
            warn!(value = %value, "invalid TOKEN_TTL_SECS; defaulting to one hour");
            Ok(Duration::seconds(TOKEN_TTL_DEFAULT_SECS))
        }
        _ => Err(TokenConfigError::InvalidEnv {
            name: TTL_ENV,
            value,
            expected: TTL_EXPECTED,
        }),
    }
}

fn allow_ephemeral_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, TokenConfigError> {
    match env.string(ALLOW_EPHEMERAL_ENV) {
        Some(value) => match parse_bool(&value) {
            Some(true) if mode.is_debug() => Ok(true),
            Some(true) => Err(TokenConfigError::EphemeralNotAllowed),
            Some(false) => Ok(false),
            None if mode.is_debug() => {
                warn!(
                    value = %value,
                    "invalid TOKEN_ALLOW_EPHEMERAL; defaulting to disabled"
                );
                Ok(false)
            }
            None => Err(TokenConfigError::InvalidEnv {
                name: ALLOW_EPHEMERAL_ENV,
                value,
                expected: BOOL_EXPECTED,
            }),
        },
        None if mode.is_debug() => {
            warn!("TOKEN_ALLOW_EPHEMERAL not set; defaulting to disabled");
            Ok(false)
        }
        None => Err(TokenConfigError::MissingEnv {
            name: ALLOW_EPHEMERAL_ENV,
        }),
    }
}

fn signing_key_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<SigningKey, TokenConfigError> {
    let key_path = env
        .string(KEY_FILE_ENV)
        .unwrap_or_else(|| TOKEN_KEY_DEFAULT_PATH.to_string());
    let path = PathBuf::from(key_path);

    match std::fs::read(&path) {
        Ok(bytes) => {
            let key = SigningKey::from_bytes(bytes);
            let length = key.len();
            if mode == BuildMode::Release && length < TOKEN_KEY_MIN_LEN {
                return Err(TokenConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: TOKEN_KEY_MIN_LEN,
                });
            }
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary token key (dev only)"
            );
            Ok(SigningKey::generate())
        }
        Err(error) => Err(TokenConfigError::KeyRead {
            path,
            source: error,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
