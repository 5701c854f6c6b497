//! Server settings loaded via OrthoConfig.

use std::net::SocketAddr;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use preguntame::domain::token::DEFAULT_TOKEN_TTL_HOURS;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 8080);

/// Settings that parsed but cannot be turned into runtime values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// `token_ttl_hours` does not fit a duration.
    #[error("token_ttl_hours {hours} is outside the representable range")]
    TokenTtlOutOfRange { hours: i64 },
}

/// Values controlling the listener, storage, and credential lifetime.
///
/// Every field may be set through `PREGUNTAME_*` environment variables,
/// a configuration file, or the command line.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PREGUNTAME")]
pub struct ServerSettings {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL connection string; in-memory storage is used when absent.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Lifetime of issued credentials, in hours.
    pub token_ttl_hours: Option<i64>,
}

impl ServerSettings {
    /// Return the configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from(DEFAULT_BIND_ADDR))
    }

    /// Return the credential lifetime, falling back to the codec default.
    pub fn token_ttl(&self) -> Result<TimeDelta, SettingsError> {
        let hours = self.token_ttl_hours.unwrap_or(DEFAULT_TOKEN_TTL_HOURS);
        TimeDelta::try_hours(hours).ok_or(SettingsError::TokenTtlOutOfRange { hours })
    }
}
