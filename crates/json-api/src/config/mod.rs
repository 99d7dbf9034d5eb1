//! Server configuration module

use clap::Parser;

use crate::config::{
    catalog::CatalogSettings, db::DatabaseConfig, logging::LoggingConfig,
    server::ServerRuntimeConfig,
};

pub(crate) mod catalog;
pub(crate) mod db;
pub(crate) mod logging;
pub(crate) mod server;

/// Pricedrop JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "pricedrop-json", about = "Pricedrop JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Commerce platform client settings.
    #[command(flatten)]
    pub catalog: CatalogSettings,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}
