//! Users API handlers.
//!
//! ```text
//! POST  /v1/users            register (no credential required)
//! GET   /v1/users/{userId}
//! PATCH /v1/users/{userId}
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Address, AddressPatch, EmailAddress, Error, PhoneNumber, User, UserPatch, UserProfile,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::BearerIdentity;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    map_user_validation_error, parse_user_id, require, require_text,
};

/// Postal address as supplied by clients.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub line3: Option<String>,
    pub town: Option<String>,
    pub county: Option<String>,
    pub postcode: Option<String>,
}

/// Request body for `POST /v1/users`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub address: Option<AddressRequest>,
    #[schema(example = "+447700900123")]
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

/// Request body for `PATCH /v1/users/{userId}`. Absent fields are unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub address: Option<AddressRequest>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, Error> {
    require_text(require(value, field)?, field)
}

fn present_text(value: Option<String>, field: &'static str) -> Result<Option<String>, Error> {
    value
        .map(|raw| require_text(raw, field))
        .transpose()
}

fn phone_number(raw: String) -> Result<PhoneNumber, Error> {
    PhoneNumber::new(raw).map_err(|err| map_user_validation_error(&err))
}

fn email_address(raw: String) -> Result<EmailAddress, Error> {
    EmailAddress::new(raw).map_err(|err| map_user_validation_error(&err))
}

fn parse_create_user(payload: CreateUserRequest) -> Result<UserProfile, Error> {
    let name = required_text(payload.name, "name")?;
    let address = require(payload.address, "address")?;
    let address = Address {
        line1: required_text(address.line1, "address.line1")?,
        line2: address.line2,
        line3: address.line3,
        town: required_text(address.town, "address.town")?,
        county: required_text(address.county, "address.county")?,
        postcode: required_text(address.postcode, "address.postcode")?,
    };
    let phone_number = phone_number(require(payload.phone_number, "phoneNumber")?)?;
    let email = email_address(require(payload.email, "email")?)?;
    Ok(UserProfile {
        name,
        address,
        phone_number,
        email,
    })
}

fn parse_update_user(payload: UpdateUserRequest) -> Result<UserPatch, Error> {
    let address = payload
        .address
        .map(|address| {
            Ok::<_, Error>(AddressPatch {
                line1: present_text(address.line1, "address.line1")?,
                line2: address.line2,
                line3: address.line3,
                town: present_text(address.town, "address.town")?,
                county: present_text(address.county, "address.county")?,
                postcode: present_text(address.postcode, "address.postcode")?,
            })
        })
        .transpose()?;
    Ok(UserPatch {
        name: present_text(payload.name, "name")?,
        address,
        phone_number: payload.phone_number.map(phone_number).transpose()?,
        email: payload.email.map(email_address).transpose()?,
    })
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserSchema),
        (status = 400, description = "Invalid details supplied", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser",
    security([])
)]
#[post("/users")]
pub async fn register_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let profile = parse_create_user(payload.into_inner())?;
    let user = state.users_command.register(profile).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Fetch the caller's own user record.
#[utoipa::path(
    get,
    path = "/v1/users/{userId}",
    params(("userId" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserSchema),
        (status = 400, description = "Invalid details supplied", body = ErrorSchema),
        (status = 401, description = "Access token is missing or invalid", body = ErrorSchema),
        (status = 403, description = "Caller does not own this user", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "fetchUserByID"
)]
#[get("/users/{user_id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    caller: BearerIdentity,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let target = parse_user_id(&path.into_inner(), "userId")?;
    let user = state.users_query.fetch(caller.user_id(), &target).await?;
    Ok(web::Json(user))
}

/// Update the caller's own user record.
#[utoipa::path(
    patch,
    path = "/v1/users/{userId}",
    params(("userId" = String, Path, description = "User identifier")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserSchema),
        (status = 400, description = "Invalid details supplied", body = ErrorSchema),
        (status = 401, description = "Access token is missing or invalid", body = ErrorSchema),
        (status = 403, description = "Caller does not own this user", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUserByID"
)]
#[patch("/users/{user_id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    caller: BearerIdentity,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<User>> {
    let target = parse_user_id(&path.into_inner(), "userId")?;
    let patch = parse_update_user(payload.into_inner())?;
    let user = state
        .users_command
        .update(caller.user_id(), &target, patch)
        .await?;
    Ok(web::Json(user))
}
