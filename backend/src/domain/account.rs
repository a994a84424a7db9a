//! Bank account data model.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AccountNumber, UserId};

/// Sort code shared by every account in this bank.
pub const SORT_CODE: &str = "10-10-10";

/// Account product type. Only personal accounts are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Personal,
}

/// A wire value that names no known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported value: {0}")]
pub struct UnsupportedValue(pub String);

impl FromStr for AccountType {
    type Err = UnsupportedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "personal" => Ok(Self::Personal),
            other => Err(UnsupportedValue(other.to_owned())),
        }
    }
}

/// Settlement currency. All balances are held in pounds sterling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    #[serde(rename = "GBP")]
    Gbp,
}

impl FromStr for Currency {
    type Err = UnsupportedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GBP" => Ok(Self::Gbp),
            other => Err(UnsupportedValue(other.to_owned())),
        }
    }
}

impl Currency {
    /// ISO 4217 code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Gbp => "GBP",
        }
    }
}

/// Input for opening a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDraft {
    pub name: String,
    pub account_type: AccountType,
}

/// Partial account update; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub account_type: Option<AccountType>,
}

/// Reasons a balance adjustment can be refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BalanceError {
    #[error("insufficient funds to process transaction")]
    InsufficientFunds,
    #[error("balance arithmetic overflowed")]
    Overflow,
}

/// Customer bank account.
///
/// ## Invariants
/// - `owner` is set at creation and never changes.
/// - `balance` starts at zero and only moves through [`Account::adjust`].
/// - A negative delta larger than the balance is refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    account_number: AccountNumber,
    sort_code: &'static str,
    #[serde(rename = "userId")]
    owner: UserId,
    name: String,
    account_type: AccountType,
    #[serde(with = "rust_decimal::serde::float")]
    balance: Decimal,
    currency: Currency,
    created_timestamp: DateTime<Utc>,
    updated_timestamp: DateTime<Utc>,
}

impl Account {
    /// Open an empty account for `owner` stamped at `now`.
    pub fn open(
        account_number: AccountNumber,
        owner: UserId,
        draft: AccountDraft,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            account_number,
            sort_code: SORT_CODE,
            owner,
            name: draft.name,
            account_type: draft.account_type,
            balance: Decimal::ZERO,
            currency: Currency::Gbp,
            created_timestamp: now,
            updated_timestamp: now,
        }
    }

    pub fn account_number(&self) -> &AccountNumber {
        &self.account_number
    }

    pub fn sort_code(&self) -> &'static str {
        self.sort_code
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn created_timestamp(&self) -> DateTime<Utc> {
        self.created_timestamp
    }

    pub fn updated_timestamp(&self) -> DateTime<Utc> {
        self.updated_timestamp
    }

    /// Overwrite present fields and refresh the update stamp.
    pub fn apply(&mut self, patch: AccountPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(account_type) = patch.account_type {
            self.account_type = account_type;
        }
        self.updated_timestamp = now;
    }

    /// Add `delta` to the balance, refusing to go below zero.
    ///
    /// On refusal the account is left untouched.
    ///
    /// # Examples
    /// ```
    /// use bank_backend::domain::{
    ///     Account, AccountDraft, AccountNumber, AccountType, BalanceError, UserId,
    /// };
    /// use chrono::Utc;
    /// use rust_decimal::Decimal;
    ///
    /// let mut account = Account::open(
    ///     AccountNumber::new("01000001").expect("number"),
    ///     UserId::new("usr-abc123").expect("user"),
    ///     AccountDraft { name: "Bills".into(), account_type: AccountType::Personal },
    ///     Utc::now(),
    /// );
    /// assert_eq!(account.adjust(Decimal::new(-1, 0), Utc::now()), Err(BalanceError::InsufficientFunds));
    /// assert_eq!(account.adjust(Decimal::new(5, 0), Utc::now()), Ok(Decimal::new(5, 0)));
    /// ```
    pub fn adjust(&mut self, delta: Decimal, now: DateTime<Utc>) -> Result<Decimal, BalanceError> {
        let next = self
            .balance
            .checked_add(delta)
            .ok_or(BalanceError::Overflow)?;
        if delta < Decimal::ZERO && next < Decimal::ZERO {
            return Err(BalanceError::InsufficientFunds);
        }
        self.balance = next;
        self.updated_timestamp = now;
        Ok(next)
    }
}
