//! Backend entry-point: load settings, initialise tracing and serve the
//! banking API.

mod server;

use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use bank_backend::inbound::http::health::HealthState;
use bank_backend::inbound::http::token_config::{BuildMode, token_settings_from_env};
use server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|e| io::Error::other(format!("failed to load server settings: {e}")))?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let tokens = token_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(io::Error::other)?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, ServerConfig::new(tokens, bind_addr))?;
    info!(%bind_addr, "bank backend listening");
    server.await
}
