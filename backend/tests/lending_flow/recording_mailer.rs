//! Mailer double that keeps every accepted message for later assertions.

use std::sync::Mutex;

use async_trait::async_trait;
use library_backend::domain::ports::{MailMessage, Mailer, MailerError};

#[derive(Debug, Default)]
pub(crate) struct RecordingMailer {
    sent: Mutex<Vec<MailMessage>>,
}

impl RecordingMailer {
    /// Messages accepted so far, oldest first.
    pub(crate) fn sent(&self) -> Vec<MailMessage> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailerError> {
        self.sent
            .lock()
            .map_err(|_| MailerError::transport("recording mailer lock poisoned"))?
            .push(message.clone());
        Ok(())
    }
}
