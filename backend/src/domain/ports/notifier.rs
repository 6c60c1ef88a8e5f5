//! Driving ports for user notifications.
//!
//! Services that need to reach a borrower depend on these traits rather than
//! on a mail adapter so delivery can change without touching them.

use async_trait::async_trait;

use crate::domain::Error;

/// Reminder sent by the overdue scanner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OverdueNotifier: Send + Sync {
    async fn send_overdue_notification(&self, email: &str, book_title: &str) -> Result<(), Error>;
}

/// Free-form notification used by account workflows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send_email_notification(
        &self,
        email: &str,
        subject: &str,
        message: &str,
    ) -> Result<(), Error>;
}
