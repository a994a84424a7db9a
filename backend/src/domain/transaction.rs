//! Ledger entries and posting input.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Currency, TransactionId, UnsupportedValue, UserId};

/// Largest amount accepted for a single posting.
pub const MAX_POSTING_AMOUNT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 2);
/// Maximum number of fractional digits in a posting amount.
pub const AMOUNT_SCALE: u32 = 2;

/// Direction of a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
}

impl FromStr for TransactionType {
    type Err = UnsupportedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(Self::Deposit),
            "withdrawal" => Ok(Self::Withdrawal),
            other => Err(UnsupportedValue(other.to_owned())),
        }
    }
}

impl TransactionType {
    /// Balance delta produced by posting `amount` in this direction.
    pub fn signed(self, amount: Amount) -> Decimal {
        match self {
            Self::Deposit => amount.value(),
            Self::Withdrawal => -amount.value(),
        }
    }
}

/// Validation errors for posting amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountValidationError {
    NotPositive,
    TooPrecise { max_scale: u32 },
    AboveLimit { max: Decimal },
}

impl AmountValidationError {
    /// Stable machine-readable validation code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotPositive => "amount_not_positive",
            Self::TooPrecise { .. } => "amount_too_precise",
            Self::AboveLimit { .. } => "amount_above_limit",
        }
    }
}

impl fmt::Display for AmountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPositive => write!(f, "amount must be greater than zero"),
            Self::TooPrecise { max_scale } => {
                write!(f, "amount must have at most {max_scale} decimal places")
            }
            Self::AboveLimit { max } => write!(f, "amount must not exceed {max}"),
        }
    }
}

impl std::error::Error for AmountValidationError {}

/// Strictly positive monetary amount with at most two decimal places.
///
/// # Examples
/// ```
/// use bank_backend::domain::Amount;
/// use rust_decimal::Decimal;
///
/// assert!(Amount::new(Decimal::new(1050, 2)).is_ok());
/// assert!(Amount::new(Decimal::ZERO).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(Decimal);

impl Amount {
    /// Validate and construct an [`Amount`].
    pub fn new(value: Decimal) -> Result<Self, AmountValidationError> {
        if value <= Decimal::ZERO {
            return Err(AmountValidationError::NotPositive);
        }
        if value.normalize().scale() > AMOUNT_SCALE {
            return Err(AmountValidationError::TooPrecise {
                max_scale: AMOUNT_SCALE,
            });
        }
        if value > MAX_POSTING_AMOUNT {
            return Err(AmountValidationError::AboveLimit {
                max: MAX_POSTING_AMOUNT,
            });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> Decimal {
        self.0
    }
}

/// Validated request to post money against an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingRequest {
    pub amount: Amount,
    pub currency: Currency,
    pub transaction_type: TransactionType,
    pub reference: Option<String>,
}

/// Immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    id: TransactionId,
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
    currency: Currency,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
    user_id: UserId,
    created_timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Record a posting made on behalf of `user_id` at `now`.
    pub fn record(
        id: TransactionId,
        user_id: UserId,
        request: PostingRequest,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            amount: request.amount.value(),
            currency: request.currency,
            transaction_type: request.transaction_type,
            reference: request.reference,
            user_id,
            created_timestamp: now,
        }
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn created_timestamp(&self) -> DateTime<Utc> {
        self.created_timestamp
    }

    /// Signed effect of this entry on the account balance.
    pub fn signed_amount(&self) -> Decimal {
        match self.transaction_type {
            TransactionType::Deposit => self.amount,
            TransactionType::Withdrawal => -self.amount,
        }
    }
}
