//! Outbound email adapters implementing the [`Mailer`] port.
//!
//! [`LogMailer`] writes messages to the trace log and is the default when no
//! relay is configured. [`HttpRelayMailer`] posts messages as JSON to an
//! HTTP mail relay.
//!
//! [`Mailer`]: crate::domain::ports::Mailer

mod http_relay;
mod log_mailer;

pub use http_relay::HttpRelayMailer;
pub use log_mailer::LogMailer;
