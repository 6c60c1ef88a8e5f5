//! Library server entry-point: loads settings, wires storage and starts the
//! HTTP server with the overdue scanner alongside.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use library_backend::domain::OverdueScannerConfig;
use library_backend::domain::ports::Mailer;
use library_backend::inbound::http::health::HealthState;
use library_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use library_backend::outbound::mail::{HttpRelayMailer, LogMailer};
use library_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use library_backend::settings::LibrarySettings;

use server::{BootstrapAdmin, ServerConfig, create_server};

fn build_mailer(settings: &LibrarySettings) -> Result<Arc<dyn Mailer>> {
    match settings.mail_relay_url.as_deref() {
        Some(raw) => {
            let endpoint = Url::parse(raw).wrap_err("invalid mail relay URL")?;
            let mailer =
                HttpRelayMailer::new(endpoint, settings.mail_from(), settings.mail_timeout())
                    .wrap_err("failed to build mail relay client")?;
            Ok(Arc::new(mailer))
        }
        None => {
            warn!("no mail relay configured; outgoing mail is only logged");
            Ok(Arc::new(LogMailer::new()))
        }
    }
}

async fn connect_database(settings: &LibrarySettings) -> Result<Option<DbPool>> {
    let Some(url) = settings.database_url.as_deref() else {
        warn!("no database configured; using the in-memory store");
        return Ok(None);
    };
    if settings.run_migrations {
        run_pending_migrations(url)
            .await
            .wrap_err("failed to apply migrations")?;
    }
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.db_max_connections()))
        .await
        .wrap_err("failed to build database pool")?;
    info!("database pool ready");
    Ok(Some(pool))
}

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

    let settings =
        LibrarySettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::current())
        .wrap_err("invalid session configuration")?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        settings.bind_addr()?,
    )
    .with_mailer(build_mailer(&settings)?)
    .with_scanner(OverdueScannerConfig {
        interval: settings.overdue_scan_interval(),
        window_days: settings.overdue_window_days(),
    })
    .with_public_base_url(settings.public_base_url())
    .with_password_cost(settings.password_hash_cost())
    .with_bootstrap_admin(settings.bootstrap_admin().map(|(email, password)| {
        BootstrapAdmin {
            email: email.to_owned(),
            password: password.to_owned(),
        }
    }));
    if let Some(pool) = connect_database(&settings).await? {
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config).await?;
    server.await?;
    health_state.mark_unhealthy();
    Ok(())
}
