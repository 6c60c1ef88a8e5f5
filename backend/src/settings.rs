//! Application settings loaded via OrthoConfig.
//!
//! Values come from `LIBRARY_*` environment variables, configuration files
//! and command-line flags. Optional fields fall back to the defaults below
//! through their accessors.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_SCAN_INTERVAL_SECS: u64 = 86_400;
const DEFAULT_OVERDUE_WINDOW_DAYS: i64 = 3;
const DEFAULT_MAIL_FROM: &str = "no-reply@library.invalid";
const DEFAULT_MAIL_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Runtime configuration for the library server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LIBRARY")]
pub struct LibrarySettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; when absent the in-memory store is used.
    pub database_url: Option<String>,
    pub db_max_connections: Option<u32>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = false)]
    pub run_migrations: bool,
    pub overdue_scan_interval_secs: Option<u64>,
    /// Orders due within this many days are reminded.
    pub overdue_window_days: Option<i64>,
    /// HTTP mail relay endpoint; when absent mail is only logged.
    pub mail_relay_url: Option<String>,
    pub mail_from: Option<String>,
    pub mail_timeout_secs: Option<u64>,
    /// Base used to build verification links.
    pub public_base_url: Option<String>,
    pub bootstrap_admin_email: Option<String>,
    pub bootstrap_admin_password: Option<String>,
    /// bcrypt work factor for new password hashes.
    pub password_hash_cost: Option<u32>,
}

impl LibrarySettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    pub fn overdue_scan_interval(&self) -> Duration {
        Duration::from_secs(
            self.overdue_scan_interval_secs
                .unwrap_or(DEFAULT_SCAN_INTERVAL_SECS)
                .max(1),
        )
    }

    pub fn overdue_window_days(&self) -> i64 {
        self.overdue_window_days
            .unwrap_or(DEFAULT_OVERDUE_WINDOW_DAYS)
    }

    pub fn mail_from(&self) -> &str {
        self.mail_from.as_deref().unwrap_or(DEFAULT_MAIL_FROM)
    }

    pub fn mail_timeout(&self) -> Duration {
        Duration::from_secs(self.mail_timeout_secs.unwrap_or(DEFAULT_MAIL_TIMEOUT_SECS))
    }

    /// Base URL without a trailing slash.
    pub fn public_base_url(&self) -> &str {
        self.public_base_url
            .as_deref()
            .unwrap_or(DEFAULT_PUBLIC_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn password_hash_cost(&self) -> u32 {
        self.password_hash_cost.unwrap_or(bcrypt::DEFAULT_COST)
    }

    /// Bootstrap admin credentials, present only when both halves are set.
    pub fn bootstrap_admin(&self) -> Option<(&str, &str)> {
        match (
            self.bootstrap_admin_email.as_deref(),
            self.bootstrap_admin_password.as_deref(),
        ) {
            (Some(email), Some(password)) => Some((email, password)),
            _ => None,
        }
    }
}
