//! Backend entry-point: loads configuration, wires storage, and serves the
//! REST API.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use preguntame::domain::TokenCodec;
use preguntame::inbound::http::health::HealthState;
use preguntame::inbound::http::token_config::{BuildMode, token_settings_from_env};
use preguntame::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        ServerSettings::load().map_err(|err| std::io::Error::other(err.to_string()))?;
    let token_settings = token_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let token_ttl = settings.token_ttl().map_err(std::io::Error::other)?;

    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let codec = TokenCodec::with_ttl(token_settings.into_secret(), token_ttl, clock.clone())
        .map_err(std::io::Error::other)?;

    let mut config = ServerConfig::new(settings.bind_addr(), Arc::new(codec), clock);
    match settings.database_url.as_deref() {
        Some(url) => {
            run_pending_migrations(url)
                .await
                .map_err(std::io::Error::other)?;
            let mut pool_config = PoolConfig::new(url);
            if let Some(max_size) = settings.db_max_connections {
                pool_config = pool_config.with_max_size(max_size);
            }
            let pool = DbPool::new(pool_config)
                .await
                .map_err(std::io::Error::other)?;
            config = config.with_db_pool(pool);
        }
        None => warn!("no database configured; using in-memory storage"),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(addr = %settings.bind_addr(), "listening");
    server.await
}
