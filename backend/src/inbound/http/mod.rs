//! HTTP inbound adapter exposing REST endpoints.
//!
//! All banking endpoints live under `/v1`; health probes sit at the root.

pub mod accounts;
pub mod auth;
pub mod error;
pub mod health;
pub mod identity;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod token_config;
pub mod transactions;
pub mod users;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register the versioned API scope and its JSON extractor configuration.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use bank_backend::inbound::http::configure_api;
///
/// let _app = App::new().configure(configure_api);
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config()).service(
        web::scope("/v1")
            .service(auth::login)
            .service(users::register_user)
            .service(users::get_user)
            .service(users::update_user)
            .service(accounts::open_account)
            .service(accounts::list_accounts)
            .service(accounts::get_account)
            .service(accounts::update_account)
            .service(accounts::close_account)
            .service(transactions::post_transaction)
            .service(transactions::list_transactions)
            .service(transactions::get_transaction),
    );
}
