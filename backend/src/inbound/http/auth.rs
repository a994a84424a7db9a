//! Login handler.
//!
//! ```text
//! POST /v1/auth/login {"userId":"usr-..."}
//! ```
//!
//! Registration is open, so possession of a user id is the only credential.
//! The token returned here is what every other `/v1` route expects in its
//! `Authorization: Bearer` header.

use actix_web::{post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_user_id, require};

/// Request body for `POST /v1/auth/login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "usr-3f9a1c2b7d4e")]
    pub user_id: Option<String>,
}

/// Bearer credential issued on login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[schema(value_type = String, format = DateTime)]
    pub expires_at: DateTime<Utc>,
}

/// Issue a bearer token for an existing user.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Invalid details supplied", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let raw = require(payload.into_inner().user_id, "userId")?;
    let user_id = parse_user_id(&raw, "userId")?;
    let issued = state.login.login(&user_id).await?;
    Ok(web::Json(LoginResponse {
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}
