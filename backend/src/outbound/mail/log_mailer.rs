//! Mailer that writes messages to the trace log instead of sending them.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{MailMessage, Mailer, MailerError};

/// Logs every message at `info` and keeps nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

impl LogMailer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailerError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.body,
            "mail relay not configured; logging message"
        );
        Ok(())
    }
}
