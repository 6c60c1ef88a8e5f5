//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use library_backend::domain::OverdueScannerConfig;
use library_backend::domain::ports::Mailer;
use library_backend::outbound::mail::LogMailer;
use library_backend::outbound::persistence::DbPool;
use mockable::{Clock, DefaultClock};

const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";

/// Credentials for the admin account ensured at startup.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

/// Builder-style configuration for creating the HTTP server.
///
/// Without a database pool the server runs on the in-memory store.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) mailer: Arc<dyn Mailer>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) scanner: OverdueScannerConfig,
    pub(crate) public_base_url: String,
    pub(crate) bootstrap_admin: Option<BootstrapAdmin>,
    pub(crate) password_cost: u32,
}

impl ServerConfig {
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            mailer: Arc::new(LogMailer::new()),
            clock: Arc::new(DefaultClock),
            scanner: OverdueScannerConfig::default(),
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_owned(),
            bootstrap_admin: None,
            password_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Use diesel repositories over `pool` instead of the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = mailer;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_scanner(mut self, scanner: OverdueScannerConfig) -> Self {
        self.scanner = scanner;
        self
    }

    /// Base URL used in verification links.
    #[must_use]
    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_bootstrap_admin(mut self, admin: Option<BootstrapAdmin>) -> Self {
        self.bootstrap_admin = admin;
        self
    }

    /// bcrypt work factor for newly stored password hashes.
    #[must_use]
    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost;
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
