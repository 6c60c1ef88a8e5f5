//! Port for outbound email delivery.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by mail adapters.
    pub enum MailerError {
        /// The relay did not answer within the configured timeout.
        Timeout { message: String } => "mail relay timed out: {message}",
        /// The relay rejected the message.
        Rejected { message: String } => "mail relay rejected message: {message}",
        /// Network or relay failure.
        Transport { message: String } => "mail transport failed: {message}",
    }
}

/// Plain-text message addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<(), MailerError>;
}
