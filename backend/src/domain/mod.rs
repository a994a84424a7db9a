//! Domain primitives, policies and use-case services.
//!
//! Purpose: define the banking entities, the ownership guard and the services
//! that sequence identity, lookup, authorisation and mutation. Nothing here
//! depends on HTTP or on a particular storage engine; adapters reach the
//! domain through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - UserId / AccountNumber / TransactionId: validated identifiers.
//! - User, Account, Transaction: stored records.
//! - `authorize`: the ownership policy.
//! - UserService, AccountService, TransactionService, TokenLoginService.

pub mod account;
pub mod account_service;
pub mod authorization;
pub mod error;
pub mod ids;
pub mod ports;
pub mod token_login_service;
pub mod trace_id;
pub mod transaction;
pub mod transaction_service;
pub mod user;
pub mod user_service;

pub use self::account::{
    Account, AccountDraft, AccountPatch, AccountType, BalanceError, Currency, SORT_CODE,
    UnsupportedValue,
};
pub use self::account_service::AccountService;
pub use self::authorization::{OwnershipDenied, authorize};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{AccountNumber, IdValidationError, MAX_ID_ATTEMPTS, TransactionId, UserId};
pub use self::token_login_service::TokenLoginService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::transaction::{
    Amount, AmountValidationError, MAX_POSTING_AMOUNT, PostingRequest, Transaction,
    TransactionType,
};
pub use self::transaction_service::TransactionService;
pub use self::user::{
    Address, AddressPatch, EmailAddress, PhoneNumber, User, UserPatch, UserProfile,
    UserValidationError,
};
pub use self::user_service::UserService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use bank_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
