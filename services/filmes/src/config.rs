//! Service configuration
//!
//! Values are layered from built-in defaults, an optional `filmes.toml`
//! (or any other format the `config` crate understands) in the working
//! directory, and `FILMES_*` environment variables, in that order.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Where movie records are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// PostgreSQL, configured through `DATABASE_*` variables
    Postgres,
    /// Process memory; records are lost on shutdown
    Memory,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`)
    pub host: String,
    /// Bind port (default: `5000`)
    pub port: u16,
    /// Storage backend (default: `postgres`)
    pub storage: StorageBackend,
    /// Per-request timeout in seconds (default: `30`)
    pub request_timeout_secs: u64,
    /// `tracing` filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl ServerConfig {
    /// Load the configuration
    ///
    /// # Environment Variables
    /// - `FILMES_HOST`
    /// - `FILMES_PORT`
    /// - `FILMES_STORAGE`: `postgres` or `memory`
    /// - `FILMES_REQUEST_TIMEOUT_SECS`
    /// - `FILMES_LOG_FILTER`
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 5000_i64)?
            .set_default("storage", "postgres")?
            .set_default("request_timeout_secs", 30_i64)?
            .set_default("log_filter", "filmes=info,tower_http=info")?
            .add_source(File::with_name("filmes").required(false))
            .add_source(Environment::with_prefix("FILMES").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// `host:port` to bind the listener to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
