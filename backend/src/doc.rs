//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/v1` handler, the health probes and the
//! schema wrappers from [`crate::inbound::http::schemas`], which keep the
//! domain types free of `utoipa` derives. The document is served by Swagger
//! UI in debug builds and printed by `cargo run --bin openapi-dump`.

use crate::inbound::http::accounts::{
    CreateAccountRequest, ListAccountsResponse, UpdateAccountRequest,
};
use crate::inbound::http::auth::{LoginRequest, LoginResponse};
use crate::inbound::http::schemas::{
    AccountSchema, AddressSchema, ErrorCodeSchema, ErrorSchema, TransactionSchema, UserSchema,
};
use crate::inbound::http::transactions::{CreateTransactionRequest, ListTransactionsResponse};
use crate::inbound::http::users::{AddressRequest, CreateUserRequest, UpdateUserRequest};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the bearer security scheme referenced by protected operations.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Register the bearer token scheme issued by `POST /v1/auth/login`.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let scheme = HttpBuilder::new()
            .scheme(HttpAuthScheme::Bearer)
            .bearer_format("JWT")
            .description(Some("Token issued by POST /v1/auth/login."))
            .build();
        components.add_security_scheme(BEARER_SCHEME, SecurityScheme::Http(scheme));
    }
}

/// OpenAPI document for the banking API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Bank backend API",
        description = "Users, bank accounts and their transactions, held in memory.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::users::register_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::accounts::open_account,
        crate::inbound::http::accounts::list_accounts,
        crate::inbound::http::accounts::get_account,
        crate::inbound::http::accounts::update_account,
        crate::inbound::http::accounts::close_account,
        crate::inbound::http::transactions::post_transaction,
        crate::inbound::http::transactions::list_transactions,
        crate::inbound::http::transactions::get_transaction,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        AddressSchema,
        UserSchema,
        AccountSchema,
        TransactionSchema,
        LoginRequest,
        LoginResponse,
        AddressRequest,
        CreateUserRequest,
        UpdateUserRequest,
        CreateAccountRequest,
        UpdateAccountRequest,
        ListAccountsResponse,
        CreateTransactionRequest,
        ListTransactionsResponse,
    )),
    tags(
        (name = "auth", description = "Bearer token issuance"),
        (name = "users", description = "Customer records"),
        (name = "accounts", description = "Bank accounts owned by the caller"),
        (name = "transactions", description = "Deposits and withdrawals"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn object_fields(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let schemas = doc.components.expect("components").schemas;
        match schemas.get(name).unwrap_or_else(|| panic!("{name} schema")) {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => panic!("expected {name} to be an object schema"),
        }
    }

    #[rstest]
    #[case("domain.Error", &["code", "message", "traceId", "details"])]
    #[case("domain.User", &["id", "name", "address", "phoneNumber", "email"])]
    #[case("domain.Account", &["accountNumber", "sortCode", "balance", "currency"])]
    #[case("domain.Transaction", &["id", "amount", "currency", "type", "userId"])]
    fn schemas_expose_wire_fields(#[case] name: &str, #[case] expected: &[&str]) {
        let fields = object_fields(name);
        for field in expected {
            assert!(
                fields.iter().any(|f| f == field),
                "{name} should have field '{field}', found {fields:?}"
            );
        }
    }

    #[rstest]
    #[case("/v1/auth/login")]
    #[case("/v1/users/{userId}")]
    #[case("/v1/accounts/{accountNumber}")]
    #[case("/v1/accounts/{accountNumber}/transactions/{transactionId}")]
    #[case("/health/ready")]
    fn paths_are_registered(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key(BEARER_SCHEME));
    }
}
