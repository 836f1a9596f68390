//! Marketplace server entry-point.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use marketplace::inbound::http::health::HealthState;
use marketplace::inbound::http::multipart::UploadLimits;
use marketplace::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use marketplace::settings::ServerSettings;
use server::{ServerConfig, create_server};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().wrap_err("failed to load server settings")?;
    let mut config = ServerConfig::new(settings.bind_addr(), settings.upload_dir())
        .with_upload_limits(UploadLimits::new(settings.max_image_bytes()));

    match settings.database_url() {
        Some(url) => {
            if settings.run_migrations {
                run_pending_migrations(url)
                    .await
                    .wrap_err("failed to apply database migrations")?;
                info!("database migrations applied");
            }
            let pool = DbPool::new(
                PoolConfig::new(url).with_max_size(settings.db_max_connections()),
            );
            config = config.with_db_pool(pool);
        }
        None => warn!("no database URL configured; using in-memory storage"),
    }

    info!(
        bind_addr = %config.bind_addr(),
        upload_dir = %config.upload_dir().display(),
        "starting marketplace server"
    );
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, &config).wrap_err("failed to start HTTP server")?;
    server.await.wrap_err("HTTP server terminated with an error")
}
