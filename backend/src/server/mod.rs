//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{BootstrapAdmin, ServerConfig};
pub use state_builders::{LibraryServices, build_services};

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use library_backend::Trace;
use library_backend::inbound::http::configure;
use library_backend::inbound::http::health::{HealthState, live, ready};
use library_backend::inbound::http::state::HttpState;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(session)
        .wrap(Trace)
        .configure(configure)
        .service(ready)
        .service(live)
}

/// Wire services, bootstrap the admin account, start the overdue scanner
/// and bind the HTTP server.
///
/// Must be called from within the actix system; the scanner is spawned on
/// its local runtime.
///
/// # Errors
/// Fails when the admin bootstrap fails or the socket cannot be bound.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let LibraryServices {
        http_state,
        accounts,
        scanner,
    } = build_services(&config);

    if let Some(admin) = &config.bootstrap_admin {
        let admin_id = accounts
            .ensure_admin(&admin.email, &admin.password)
            .await
            .map_err(|err| std::io::Error::other(format!("admin bootstrap failed: {err}")))?;
        info!(user_id = %admin_id, "bootstrap admin ready");
    }

    let http_state = web::Data::new(http_state);
    let server_health_state = health_state.clone();
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        ..
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    actix_web::rt::spawn(scanner);
    health_state.mark_ready();
    info!(%bind_addr, "library server listening");
    Ok(server)
}
