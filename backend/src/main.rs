//! CityInfo entry-point: loads settings, prepares the city store, and serves
//! the REST API.

mod server;

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use cityinfo::inbound::http::health::HealthState;
use cityinfo::outbound::notification::LogMailSender;
use cityinfo::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::session_key::{BuildMode, load_session_key};
use server::settings::AppSettings;
use server::{ServerConfig, create_server};

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

    let settings = AppSettings::load().map_err(|err| std::io::Error::other(err.to_string()))?;
    let key = load_session_key(
        &settings.session_key_file(),
        settings.session_allow_ephemeral,
        BuildMode::from_debug_assertions(),
    )
    .map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let transport = settings.mail_transport().map_err(std::io::Error::other)?;
    let notifier = LogMailSender::new(
        settings.mail_settings().map_err(std::io::Error::other)?,
        transport,
    );

    let mut config = ServerConfig::new(key, settings.cookie_secure(), bind_addr, Arc::new(notifier))
        .with_required_city_claim(settings.required_city_claim());

    if let Some(database_url) = settings.database_url() {
        run_pending_migrations(database_url.to_owned())
            .await
            .map_err(std::io::Error::other)?;
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .map_err(std::io::Error::other)?;
        config = config.with_db_pool(pool);
    }

    #[cfg(feature = "metrics")]
    {
        let store = if settings.database_url().is_some() {
            "postgres"
        } else {
            "memory"
        };
        config = config.with_metrics(Some(server::make_metrics(store)?));
    }

    info!(%bind_addr, mail_transport = %transport, "starting CityInfo server");
    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
