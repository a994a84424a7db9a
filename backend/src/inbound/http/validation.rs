//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure is a `400` with the summary message [`INVALID_DETAILS`] and
//! `details = {"field", "code"}` naming what was rejected.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, web};
use serde_json::json;
use tracing::debug;

use crate::domain::{
    AccountNumber, AmountValidationError, Error, TransactionId, UserId, UserValidationError,
};

/// Summary message for every request validation failure.
pub const INVALID_DETAILS: &str = "Invalid details supplied";

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidFormat,
    InvalidValue,
    InvalidJson,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidFormat => "invalid_format",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::InvalidJson => "invalid_json",
        }
    }
}

fn field_error(field: &str, code: &str) -> Error {
    Error::invalid_request(INVALID_DETAILS).with_details(json!({
        "field": field,
        "code": code,
    }))
}

pub(crate) fn missing_field_error(field: &'static str) -> Error {
    field_error(field, ErrorCode::MissingField.as_str())
}

pub(crate) fn invalid_value_error(field: &'static str) -> Error {
    field_error(field, ErrorCode::InvalidValue.as_str())
}

/// Unwrap a required request field.
pub(crate) fn require<T>(value: Option<T>, field: &'static str) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Require text that is present and not blank.
pub(crate) fn require_text(value: String, field: &'static str) -> Result<String, Error> {
    if value.trim().is_empty() {
        return Err(missing_field_error(field));
    }
    Ok(value)
}

pub(crate) fn parse_user_id(raw: &str, field: &'static str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|_| field_error(field, ErrorCode::InvalidFormat.as_str()))
}

pub(crate) fn parse_account_number(raw: &str) -> Result<AccountNumber, Error> {
    AccountNumber::new(raw)
        .map_err(|_| field_error("accountNumber", ErrorCode::InvalidFormat.as_str()))
}

pub(crate) fn parse_transaction_id(raw: &str) -> Result<TransactionId, Error> {
    TransactionId::new(raw)
        .map_err(|_| field_error("transactionId", ErrorCode::InvalidFormat.as_str()))
}

pub(crate) fn map_user_validation_error(err: &UserValidationError) -> Error {
    field_error(err.field(), err.code())
}

pub(crate) fn map_amount_validation_error(err: &AmountValidationError) -> Error {
    field_error("amount", err.code())
}

/// JSON extractor configuration that reports malformed bodies in the shared
/// error shape instead of Actix's plain-text default.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejecting malformed JSON body");
    field_error("body", ErrorCode::InvalidJson.as_str()).into()
}
