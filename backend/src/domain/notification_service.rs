//! Mail-backed notifications.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::Error;
use crate::domain::ports::{MailMessage, Mailer, NotificationSender, OverdueNotifier};
use crate::domain::repository_errors::map_mailer_error;

/// Subject line of the due-date reminder.
pub const OVERDUE_SUBJECT: &str = "Notification to remind you to turn in your book";

/// Reminder body; `{title}` is replaced with the book title.
pub const OVERDUE_BODY_TEMPLATE: &str = "Dear Customer, please return the book {title} as the due date is approaching. Sincerely, Online Library.";

/// Notification service delivering every message through a [`Mailer`].
pub struct MailNotificationService<M: ?Sized> {
    mailer: Arc<M>,
}

impl<M: ?Sized> MailNotificationService<M> {
    pub fn new(mailer: Arc<M>) -> Self {
        Self { mailer }
    }
}

#[async_trait]
impl<M> NotificationSender for MailNotificationService<M>
where
    M: Mailer + ?Sized,
{
    async fn send_email_notification(
        &self,
        email: &str,
        subject: &str,
        message: &str,
    ) -> Result<(), Error> {
        let mail = MailMessage {
            to: email.to_owned(),
            subject: subject.to_owned(),
            body: message.to_owned(),
        };
        self.mailer.send(&mail).await.map_err(map_mailer_error)?;
        info!(recipient = email, subject, "notification sent");
        Ok(())
    }
}

#[async_trait]
impl<M> OverdueNotifier for MailNotificationService<M>
where
    M: Mailer + ?Sized,
{
    async fn send_overdue_notification(&self, email: &str, book_title: &str) -> Result<(), Error> {
        let body = OVERDUE_BODY_TEMPLATE.replace("{title}", book_title);
        self.send_email_notification(email, OVERDUE_SUBJECT, &body)
            .await
    }
}
