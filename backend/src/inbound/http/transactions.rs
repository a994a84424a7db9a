//! Transaction API handlers, nested under an account.
//!
//! ```text
//! POST /v1/accounts/{accountNumber}/transactions
//! GET  /v1/accounts/{accountNumber}/transactions
//! GET  /v1/accounts/{accountNumber}/transactions/{transactionId}
//! ```

use actix_web::{HttpResponse, get, post, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Amount, Currency, Error, PostingRequest, Transaction, TransactionType};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::BearerIdentity;
use crate::inbound::http::schemas::{ErrorSchema, TransactionSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    invalid_value_error, map_amount_validation_error, parse_account_number, parse_transaction_id,
    require,
};

/// Request body for posting a deposit or withdrawal.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    #[schema(value_type = Option<f64>, example = 100.0)]
    pub amount: Option<Decimal>,
    #[schema(example = "GBP")]
    pub currency: Option<String>,
    #[serde(rename = "type")]
    #[schema(example = "deposit")]
    pub transaction_type: Option<String>,
    pub reference: Option<String>,
}

/// Response body for listing an account's transactions.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListTransactionsResponse {
    #[schema(value_type = Vec<TransactionSchema>)]
    pub transactions: Vec<Transaction>,
}

fn parse_posting(payload: CreateTransactionRequest) -> Result<PostingRequest, Error> {
    let amount = Amount::new(require(payload.amount, "amount")?)
        .map_err(|err| map_amount_validation_error(&err))?;
    let currency: Currency = require(payload.currency, "currency")?
        .parse()
        .map_err(|_| invalid_value_error("currency"))?;
    let transaction_type: TransactionType = require(payload.transaction_type, "type")?
        .parse()
        .map_err(|_| invalid_value_error("type"))?;
    Ok(PostingRequest {
        amount,
        currency,
        transaction_type,
        reference: payload.reference,
    })
}

/// Deposit into or withdraw from one of the caller's accounts.
///
/// Ownership is settled before the body is validated, so strangers and
/// missing accounts never learn which fields were wrong.
#[utoipa::path(
    post,
    path = "/v1/accounts/{accountNumber}/transactions",
    params(("accountNumber" = String, Path, description = "Account number")),
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction recorded", body = TransactionSchema),
        (status = 400, description = "Invalid details supplied", body = ErrorSchema),
        (status = 401, description = "Access token is missing or invalid", body = ErrorSchema),
        (status = 403, description = "Caller does not own the account", body = ErrorSchema),
        (status = 404, description = "Bank account was not found", body = ErrorSchema),
        (status = 422, description = "Insufficient funds to process transaction", body = ErrorSchema)
    ),
    tags = ["transactions"],
    operation_id = "createTransaction"
)]
#[post("/accounts/{account_number}/transactions")]
pub async fn post_transaction(
    state: web::Data<HttpState>,
    caller: BearerIdentity,
    path: web::Path<String>,
    payload: web::Json<CreateTransactionRequest>,
) -> ApiResult<HttpResponse> {
    let number = parse_account_number(&path.into_inner())?;
    state
        .transactions_command
        .authorize(caller.user_id(), &number)
        .await?;
    let request = parse_posting(payload.into_inner())?;
    let transaction = state
        .transactions_command
        .post(caller.user_id(), &number, request)
        .await?;
    Ok(HttpResponse::Created().json(transaction))
}

/// List an account's transactions in posting order.
#[utoipa::path(
    get,
    path = "/v1/accounts/{accountNumber}/transactions",
    params(("accountNumber" = String, Path, description = "Account number")),
    responses(
        (status = 200, description = "Transactions", body = ListTransactionsResponse),
        (status = 400, description = "Invalid details supplied", body = ErrorSchema),
        (status = 401, description = "Access token is missing or invalid", body = ErrorSchema),
        (status = 403, description = "Caller does not own the account", body = ErrorSchema),
        (status = 404, description = "Bank account was not found", body = ErrorSchema)
    ),
    tags = ["transactions"],
    operation_id = "listAccountTransaction"
)]
#[get("/accounts/{account_number}/transactions")]
pub async fn list_transactions(
    state: web::Data<HttpState>,
    caller: BearerIdentity,
    path: web::Path<String>,
) -> ApiResult<web::Json<ListTransactionsResponse>> {
    let number = parse_account_number(&path.into_inner())?;
    let transactions = state
        .transactions_query
        .list(caller.user_id(), &number)
        .await?;
    Ok(web::Json(ListTransactionsResponse { transactions }))
}

/// Fetch a single transaction on one of the caller's accounts.
#[utoipa::path(
    get,
    path = "/v1/accounts/{accountNumber}/transactions/{transactionId}",
    params(
        ("accountNumber" = String, Path, description = "Account number"),
        ("transactionId" = String, Path, description = "Transaction identifier")
    ),
    responses(
        (status = 200, description = "Transaction", body = TransactionSchema),
        (status = 400, description = "Invalid details supplied", body = ErrorSchema),
        (status = 401, description = "Access token is missing or invalid", body = ErrorSchema),
        (status = 403, description = "Caller does not own the account", body = ErrorSchema),
        (status = 404, description = "Account or transaction was not found", body = ErrorSchema)
    ),
    tags = ["transactions"],
    operation_id = "fetchAccountTransactionByID"
)]
#[get("/accounts/{account_number}/transactions/{transaction_id}")]
pub async fn get_transaction(
    state: web::Data<HttpState>,
    caller: BearerIdentity,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<Transaction>> {
    let (raw_number, raw_id) = path.into_inner();
    let number = parse_account_number(&raw_number)?;
    let id = parse_transaction_id(&raw_id)?;
    let transaction = state
        .transactions_query
        .fetch(caller.user_id(), &number, &id)
        .await?;
    Ok(web::Json(transaction))
}
