//! Bank account API handlers.
//!
//! ```text
//! POST   /v1/accounts
//! GET    /v1/accounts
//! GET    /v1/accounts/{accountNumber}
//! PATCH  /v1/accounts/{accountNumber}
//! DELETE /v1/accounts/{accountNumber}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Account, AccountDraft, AccountPatch, AccountType, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::BearerIdentity;
use crate::inbound::http::schemas::{AccountSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    invalid_value_error, parse_account_number, require, require_text,
};

/// Request body for `POST /v1/accounts`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    #[schema(example = "Everyday")]
    pub name: Option<String>,
    #[schema(example = "personal")]
    pub account_type: Option<String>,
}

/// Request body for `PATCH /v1/accounts/{accountNumber}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub name: Option<String>,
    pub account_type: Option<String>,
}

/// Response body for `GET /v1/accounts`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListAccountsResponse {
    #[schema(value_type = Vec<AccountSchema>)]
    pub accounts: Vec<Account>,
}

fn account_name(raw: String) -> Result<String, Error> {
    require_text(raw, "name")
}

fn account_type(raw: &str) -> Result<AccountType, Error> {
    raw.parse().map_err(|_| invalid_value_error("accountType"))
}

fn parse_create_account(payload: CreateAccountRequest) -> Result<AccountDraft, Error> {
    Ok(AccountDraft {
        name: account_name(require(payload.name, "name")?)?,
        account_type: account_type(&require(payload.account_type, "accountType")?)?,
    })
}

fn parse_update_account(payload: UpdateAccountRequest) -> Result<AccountPatch, Error> {
    Ok(AccountPatch {
        name: payload.name.map(account_name).transpose()?,
        account_type: payload
            .account_type
            .as_deref()
            .map(account_type)
            .transpose()?,
    })
}

/// Open an account owned by the caller.
#[utoipa::path(
    post,
    path = "/v1/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account opened", body = AccountSchema),
        (status = 400, description = "Invalid details supplied", body = ErrorSchema),
        (status = 401, description = "Access token is missing or invalid", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "createAccount"
)]
#[post("/accounts")]
pub async fn open_account(
    state: web::Data<HttpState>,
    caller: BearerIdentity,
    payload: web::Json<CreateAccountRequest>,
) -> ApiResult<HttpResponse> {
    let draft = parse_create_account(payload.into_inner())?;
    let account = state.accounts_command.open(caller.user_id(), draft).await?;
    Ok(HttpResponse::Created().json(account))
}

/// List the caller's accounts.
#[utoipa::path(
    get,
    path = "/v1/accounts",
    responses(
        (status = 200, description = "Caller's accounts", body = ListAccountsResponse),
        (status = 401, description = "Access token is missing or invalid", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "listAccounts"
)]
#[get("/accounts")]
pub async fn list_accounts(
    state: web::Data<HttpState>,
    caller: BearerIdentity,
) -> ApiResult<web::Json<ListAccountsResponse>> {
    let accounts = state.accounts_query.list(caller.user_id()).await?;
    Ok(web::Json(ListAccountsResponse { accounts }))
}

/// Fetch one of the caller's accounts.
#[utoipa::path(
    get,
    path = "/v1/accounts/{accountNumber}",
    params(("accountNumber" = String, Path, description = "Account number")),
    responses(
        (status = 200, description = "Account", body = AccountSchema),
        (status = 400, description = "Invalid details supplied", body = ErrorSchema),
        (status = 401, description = "Access token is missing or invalid", body = ErrorSchema),
        (status = 403, description = "Caller does not own the account", body = ErrorSchema),
        (status = 404, description = "Bank account was not found", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "fetchAccountByAccountNumber"
)]
#[get("/accounts/{account_number}")]
pub async fn get_account(
    state: web::Data<HttpState>,
    caller: BearerIdentity,
    path: web::Path<String>,
) -> ApiResult<web::Json<Account>> {
    let number = parse_account_number(&path.into_inner())?;
    let account = state.accounts_query.fetch(caller.user_id(), &number).await?;
    Ok(web::Json(account))
}

/// Rename or retype one of the caller's accounts.
#[utoipa::path(
    patch,
    path = "/v1/accounts/{accountNumber}",
    params(("accountNumber" = String, Path, description = "Account number")),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Updated account", body = AccountSchema),
        (status = 400, description = "Invalid details supplied", body = ErrorSchema),
        (status = 401, description = "Access token is missing or invalid", body = ErrorSchema),
        (status = 403, description = "Caller does not own the account", body = ErrorSchema),
        (status = 404, description = "Bank account was not found", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "updateAccountByAccountNumber"
)]
#[patch("/accounts/{account_number}")]
pub async fn update_account(
    state: web::Data<HttpState>,
    caller: BearerIdentity,
    path: web::Path<String>,
    payload: web::Json<UpdateAccountRequest>,
) -> ApiResult<web::Json<Account>> {
    let number = parse_account_number(&path.into_inner())?;
    let patch = parse_update_account(payload.into_inner())?;
    let account = state
        .accounts_command
        .update(caller.user_id(), &number, patch)
        .await?;
    Ok(web::Json(account))
}

/// Close one of the caller's accounts. Its transaction history is retained.
#[utoipa::path(
    delete,
    path = "/v1/accounts/{accountNumber}",
    params(("accountNumber" = String, Path, description = "Account number")),
    responses(
        (status = 204, description = "Account closed"),
        (status = 400, description = "Invalid details supplied", body = ErrorSchema),
        (status = 401, description = "Access token is missing or invalid", body = ErrorSchema),
        (status = 403, description = "Caller does not own the account", body = ErrorSchema),
        (status = 404, description = "Bank account was not found", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "deleteAccountByAccountNumber"
)]
#[delete("/accounts/{account_number}")]
pub async fn close_account(
    state: web::Data<HttpState>,
    caller: BearerIdentity,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let number = parse_account_number(&path.into_inner())?;
    state
        .accounts_command
        .close(caller.user_id(), &number)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
