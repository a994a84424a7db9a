//! Identifier newtypes for users, accounts and transactions.
//!
//! Each identifier validates its canonical string form on construction and
//! serialises back to that string. Generation uses an OS-seeded random suffix
//! so identifiers never depend on store size; stores reserve generated values
//! through an atomic check-and-insert and retry on collision.

use std::fmt;
use std::sync::OnceLock;

use rand::Rng;
use rand::distributions::{Alphanumeric, DistString};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Prefix carried by every user identifier.
pub const USER_ID_PREFIX: &str = "usr-";
/// Prefix carried by every transaction identifier.
pub const TRANSACTION_ID_PREFIX: &str = "tan-";
/// Prefix carried by every account number.
pub const ACCOUNT_NUMBER_PREFIX: &str = "01";

/// Length of the random suffix appended to generated prefixed identifiers.
const GENERATED_SUFFIX_LEN: usize = 7;
/// Number of random digits following [`ACCOUNT_NUMBER_PREFIX`].
const ACCOUNT_NUMBER_DIGITS: u32 = 6;

/// Upper bound on generate-and-reserve attempts before a store gives up.
pub const MAX_ID_ATTEMPTS: usize = 32;

/// Validation errors raised when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdValidationError {
    InvalidUserId,
    InvalidAccountNumber,
    InvalidTransactionId,
}

impl fmt::Display for IdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUserId => write!(f, "user id must match usr-<alphanumeric>"),
            Self::InvalidAccountNumber => {
                write!(f, "account number must be 01 followed by six digits")
            }
            Self::InvalidTransactionId => {
                write!(f, "transaction id must match tan-<alphanumeric>")
            }
        }
    }
}

impl std::error::Error for IdValidationError {}

fn compiled(cell: &'static OnceLock<Regex>, pattern: &'static str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("identifier regex failed to compile: {error}"))
    })
}

fn user_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, "^usr-[A-Za-z0-9]+$")
}

fn account_number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, r"^01\d{6}$")
}

fn transaction_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, "^tan-[A-Za-z0-9]+$")
}

fn random_suffix() -> String {
    Alphanumeric
        .sample_string(&mut rand::thread_rng(), GENERATED_SUFFIX_LEN)
        .to_ascii_lowercase()
}

macro_rules! string_identifier {
    (
        $(#[$meta:meta])*
        $name:ident, $regex:ident, $error:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and construct the identifier from borrowed input.
            pub fn new(id: impl AsRef<str>) -> Result<Self, IdValidationError> {
                Self::from_owned(id.as_ref().to_owned())
            }

            fn from_owned(id: String) -> Result<Self, IdValidationError> {
                if $regex().is_match(&id) {
                    Ok(Self(id))
                } else {
                    Err(IdValidationError::$error)
                }
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_ref())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::from_owned(value)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

string_identifier! {
    /// Stable user identifier of the form `usr-<suffix>`.
    UserId, user_id_regex, InvalidUserId
}

string_identifier! {
    /// Eight-digit account number of the form `01dddddd`.
    AccountNumber, account_number_regex, InvalidAccountNumber
}

string_identifier! {
    /// Transaction identifier of the form `tan-<suffix>`.
    TransactionId, transaction_id_regex, InvalidTransactionId
}

impl UserId {
    /// Generate a fresh random user identifier.
    pub fn random() -> Self {
        Self(format!("{USER_ID_PREFIX}{}", random_suffix()))
    }
}

impl AccountNumber {
    /// Generate a fresh random account number.
    pub fn random() -> Self {
        let upper = 10_u32.pow(ACCOUNT_NUMBER_DIGITS);
        let digits = rand::thread_rng().gen_range(0..upper);
        Self(format!("{ACCOUNT_NUMBER_PREFIX}{digits:06}"))
    }
}

impl TransactionId {
    /// Generate a fresh random transaction identifier.
    pub fn random() -> Self {
        Self(format!("{TRANSACTION_ID_PREFIX}{}", random_suffix()))
    }
}
