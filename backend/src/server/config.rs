//! HTTP server settings and the configuration object built from them.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use bank_backend::inbound::http::token_config::TokenSettings;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Listener settings loaded from `BANK_*` environment variables, config
/// files and command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BANK")]
pub struct ServerSettings {
    /// IP address to listen on.
    pub host: Option<String>,
    /// TCP port to listen on.
    #[ortho_config(default = 8080)]
    pub port: u16,
}

/// Raised when the configured host is not an IP literal.
#[derive(Debug, thiserror::Error)]
#[error("BANK_HOST must be an IP address, got {value:?}")]
pub struct InvalidHost {
    value: String,
}

impl ServerSettings {
    /// Resolve the listen address, falling back to `0.0.0.0` for the host.
    pub fn bind_addr(&self) -> Result<SocketAddr, InvalidHost> {
        let host = match self.host.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_HOST,
            Some(raw) => raw.parse().map_err(|_| InvalidHost {
                value: raw.to_owned(),
            })?,
        };
        Ok(SocketAddr::new(host, self.port))
    }
}

/// Everything [`super::create_server`] needs to serve the API.
pub struct ServerConfig {
    pub(crate) tokens: TokenSettings,
    pub(crate) bind_addr: SocketAddr,
}

impl ServerConfig {
    #[must_use]
    pub fn new(tokens: TokenSettings, bind_addr: SocketAddr) -> Self {
        Self { tokens, bind_addr }
    }
}
