//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their wire shape and live in the inbound adapter layer
//! where framework concerns belong.

#![expect(
    dead_code,
    reason = "Schema wrappers are used only for OpenAPI generation via utoipa"
)]

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The caller does not own the target record.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// A withdrawal would take the balance below zero.
    #[schema(rename = "insufficient_funds")]
    InsufficientFunds,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = domain::Error)]
#[schema(rename_all = "camelCase")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Invalid details supplied")]
    message: String,
    /// Correlation identifier matching the `trace-id` response header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details, such as the rejected `field` and its `code`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Address`].
#[derive(ToSchema)]
#[schema(as = domain::Address)]
pub struct AddressSchema {
    #[schema(example = "1 Analytical Way")]
    line1: String,
    line2: Option<String>,
    line3: Option<String>,
    #[schema(example = "London")]
    town: String,
    #[schema(example = "Greater London")]
    county: String,
    #[schema(example = "N1 1AA")]
    postcode: String,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = domain::User)]
#[schema(rename_all = "camelCase")]
pub struct UserSchema {
    #[schema(example = "usr-abc123")]
    id: String,
    #[schema(example = "Ada Lovelace")]
    name: String,
    address: AddressSchema,
    #[schema(example = "+447700900123")]
    phone_number: String,
    #[schema(example = "ada@example.com")]
    email: String,
    #[schema(format = DateTime)]
    created_timestamp: String,
    #[schema(format = DateTime)]
    updated_timestamp: String,
}

/// OpenAPI schema for [`crate::domain::Account`].
#[derive(ToSchema)]
#[schema(as = domain::Account)]
#[schema(rename_all = "camelCase")]
pub struct AccountSchema {
    #[schema(example = "01234567")]
    account_number: String,
    #[schema(example = "10-10-10")]
    sort_code: String,
    #[schema(example = "usr-abc123")]
    user_id: String,
    #[schema(example = "Everyday")]
    name: String,
    #[schema(example = "personal")]
    account_type: String,
    #[schema(example = 60.0)]
    balance: f64,
    #[schema(example = "GBP")]
    currency: String,
    #[schema(format = DateTime)]
    created_timestamp: String,
    #[schema(format = DateTime)]
    updated_timestamp: String,
}

/// OpenAPI schema for [`crate::domain::Transaction`].
#[derive(ToSchema)]
#[schema(as = domain::Transaction)]
#[schema(rename_all = "camelCase")]
pub struct TransactionSchema {
    #[schema(example = "tan-abc123")]
    id: String,
    #[schema(example = 40.0)]
    amount: f64,
    #[schema(example = "GBP")]
    currency: String,
    #[schema(rename = "type", example = "withdrawal")]
    transaction_type: String,
    reference: Option<String>,
    #[schema(example = "usr-abc123")]
    user_id: String,
    #[schema(format = DateTime)]
    created_timestamp: String,
}
