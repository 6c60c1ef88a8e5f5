//! Live server harness for the lending flow scenarios.
//!
//! Services run over the in-memory store with a recording mailer so steps
//! can read verification links and reminders. Actix needs `spawn_local`, so
//! the world owns a current-thread runtime plus a `LocalSet`; dropping the
//! `WorldFixture` stops the server even when a step panics.

use std::cell::RefCell;
use std::net::{SocketAddr, TcpListener};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use actix_session::SessionMiddleware;
use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Key, SameSite, time::Duration as CookieDuration};
use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer, web};
use library_backend::Trace;
use library_backend::domain::OverdueScannerConfig;
use library_backend::inbound::http::configure;
use library_backend::inbound::http::state::HttpState;
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

use crate::recording_mailer::RecordingMailer;
use crate::server::{LibraryServices, ServerConfig, build_services};

pub(crate) const ADMIN_EMAIL: &str = "admin@library.test";
pub(crate) const ADMIN_PASSWORD: &str = "admin-secret";
pub(crate) const SCAN_INTERVAL: Duration = Duration::from_millis(100);

pub(crate) struct LendingWorld {
    pub(crate) runtime: Runtime,
    pub(crate) local: LocalSet,
    pub(crate) base_url: String,
    pub(crate) server: ServerHandle,
    pub(crate) mailer: Arc<RecordingMailer>,
    pub(crate) reader_cookie: Option<String>,
    pub(crate) other_reader_cookie: Option<String>,
    pub(crate) book_id: Option<i64>,
    pub(crate) last_status: Option<u16>,
    pub(crate) last_body: Option<Value>,
}

pub(crate) type SharedWorld = Rc<RefCell<LendingWorld>>;

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        let ctx = self.world.borrow();
        let server = ctx.server.clone();
        ctx.local.block_on(&ctx.runtime, async move {
            server.stop(true).await;
        });
    }
}

/// Run `operation` on the world's runtime with the server's base URL.
///
/// The world stays borrowed for the duration, so `operation` must not
/// touch it.
pub(crate) fn with_world_async<R, F>(world: &SharedWorld, operation: impl FnOnce(String) -> F) -> R
where
    F: std::future::Future<Output = R>,
{
    let ctx = world.borrow();
    let base_url = ctx.base_url.clone();
    ctx.local.block_on(&ctx.runtime, operation(base_url))
}

fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(false)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(PersistentSession::default().session_ttl(CookieDuration::hours(2)))
        .build()
}

async fn spawn_library_server(
    mailer: Arc<RecordingMailer>,
) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr: SocketAddr = listener.local_addr().map_err(|err| err.to_string())?;
    let key = Key::generate();

    let config = ServerConfig::new(key.clone(), false, SameSite::Lax, addr)
        .with_mailer(mailer)
        .with_password_cost(4)
        .with_scanner(OverdueScannerConfig {
            interval: SCAN_INTERVAL,
            window_days: 3,
        });
    let LibraryServices {
        http_state,
        accounts,
        scanner,
    } = build_services(&config);
    accounts
        .ensure_admin(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .map_err(|err| err.to_string())?;

    let http_data: web::Data<HttpState> = web::Data::new(http_state);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(http_data.clone())
            .wrap(session_middleware(key.clone()))
            .wrap(Trace)
            .configure(configure)
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();
    let handle = server.handle();
    actix_web::rt::spawn(server);
    actix_web::rt::spawn(scanner);
    Ok((format!("http://{addr}"), handle))
}

pub(crate) fn world() -> WorldFixture {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();
    let mailer = Arc::new(RecordingMailer::default());
    let (base_url, server) = local
        .block_on(&runtime, spawn_library_server(mailer.clone()))
        .expect("library server");

    WorldFixture {
        world: Rc::new(RefCell::new(LendingWorld {
            runtime,
            local,
            base_url,
            server,
            mailer,
            reader_cookie: None,
            other_reader_cookie: None,
            book_id: None,
            last_status: None,
            last_body: None,
        })),
    }
}
