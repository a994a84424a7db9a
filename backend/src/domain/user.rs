//! User profile data model.
//!
//! A [`User`] is created once from a validated [`UserProfile`], updated in
//! place through [`UserPatch`] and never deleted.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::UserId;

/// Validation errors raised while building user profile values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    InvalidPhoneNumber,
    InvalidEmail,
}

impl UserValidationError {
    /// Name of the offending request field in its wire spelling.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidPhoneNumber => "phoneNumber",
            Self::InvalidEmail => "email",
        }
    }

    /// Stable machine-readable validation code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidPhoneNumber => "invalid_phone_number",
            Self::InvalidEmail => "invalid_email",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPhoneNumber => write!(f, "invalid phoneNumber format"),
            Self::InvalidEmail => write!(f, "invalid email format"),
        }
    }
}

impl std::error::Error for UserValidationError {}

static PHONE_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn phone_regex() -> &'static Regex {
    PHONE_RE.get_or_init(|| {
        Regex::new(r"^\+[1-9]\d{1,14}$")
            .unwrap_or_else(|error| panic!("phone number regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// E.164-style phone number, for example `+447700900123`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validate and construct a [`PhoneNumber`].
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::try_from(raw.into())
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if phone_regex().is_match(&value) {
            Ok(Self(value))
        } else {
            Err(UserValidationError::InvalidPhoneNumber)
        }
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Contact email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::try_from(raw.into())
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if email_regex().is_match(&value) {
            Ok(Self(value))
        } else {
            Err(UserValidationError::InvalidEmail)
        }
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line3: Option<String>,
    pub town: String,
    pub county: String,
    pub postcode: String,
}

/// Partial address update; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressPatch {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub line3: Option<String>,
    pub town: Option<String>,
    pub county: Option<String>,
    pub postcode: Option<String>,
}

impl Address {
    fn apply(&mut self, patch: AddressPatch) {
        let AddressPatch {
            line1,
            line2,
            line3,
            town,
            county,
            postcode,
        } = patch;
        if let Some(value) = line1 {
            self.line1 = value;
        }
        if line2.is_some() {
            self.line2 = line2;
        }
        if line3.is_some() {
            self.line3 = line3;
        }
        if let Some(value) = town {
            self.town = value;
        }
        if let Some(value) = county {
            self.county = value;
        }
        if let Some(value) = postcode {
            self.postcode = value;
        }
    }
}

/// Validated registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub address: Address,
    pub phone_number: PhoneNumber,
    pub email: EmailAddress,
}

/// Partial profile update; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub address: Option<AddressPatch>,
    pub phone_number: Option<PhoneNumber>,
    pub email: Option<EmailAddress>,
}

/// Registered bank customer.
///
/// ## Invariants
/// - `id` is unique within the user store and never changes.
/// - `updated_timestamp` is never earlier than `created_timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    name: String,
    address: Address,
    phone_number: PhoneNumber,
    email: EmailAddress,
    created_timestamp: DateTime<Utc>,
    updated_timestamp: DateTime<Utc>,
}

impl User {
    /// Build a freshly registered user stamped at `now`.
    pub fn new(id: UserId, profile: UserProfile, now: DateTime<Utc>) -> Self {
        let UserProfile {
            name,
            address,
            phone_number,
            email,
        } = profile;
        Self {
            id,
            name,
            address,
            phone_number,
            email,
            created_timestamp: now,
            updated_timestamp: now,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn phone_number(&self) -> &PhoneNumber {
        &self.phone_number
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn created_timestamp(&self) -> DateTime<Utc> {
        self.created_timestamp
    }

    pub fn updated_timestamp(&self) -> DateTime<Utc> {
        self.updated_timestamp
    }

    /// Overwrite the fields present in `patch` and refresh the update stamp.
    ///
    /// The stamp is refreshed even when the patch is empty.
    pub fn apply(&mut self, patch: UserPatch, now: DateTime<Utc>) {
        let UserPatch {
            name,
            address,
            phone_number,
            email,
        } = patch;
        if let Some(value) = name {
            self.name = value;
        }
        if let Some(value) = address {
            self.address.apply(value);
        }
        if let Some(value) = phone_number {
            self.phone_number = value;
        }
        if let Some(value) = email {
            self.email = value;
        }
        self.updated_timestamp = now;
    }
}
