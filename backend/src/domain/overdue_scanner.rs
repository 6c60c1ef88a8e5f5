//! Periodic sweep reminding borrowers of books that are nearly due.
//!
//! Each pass loads every outstanding order and notifies the borrower when the
//! due date is at most `window_days` away (overdue orders included). No
//! record of sent reminders is kept, so every pass notifies again.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use mockable::Clock;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::domain::Error;
use crate::domain::ports::{OrderRepository, OverdueNotifier};
use crate::domain::repository_errors::map_lending_error;

/// Default number of days before the due date when reminders start.
pub const DEFAULT_OVERDUE_WINDOW_DAYS: i64 = 3;

/// Scanner schedule and threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverdueScannerConfig {
    /// Delay between the start of consecutive passes.
    pub interval: Duration,
    /// Orders due within this many days are reminded.
    pub window_days: i64,
}

impl Default for OverdueScannerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(24 * 60 * 60),
            window_days: DEFAULT_OVERDUE_WINDOW_DAYS,
        }
    }
}

/// Counts from one scanner pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverdueScanReport {
    pub scanned: usize,
    pub notified: usize,
    pub failed: usize,
}

/// Overdue reminder sweep.
pub struct OverdueScanner<O> {
    orders: Arc<O>,
    notifier: Arc<dyn OverdueNotifier>,
    clock: Arc<dyn Clock>,
    config: OverdueScannerConfig,
}

impl<O> OverdueScanner<O>
where
    O: OrderRepository,
{
    pub fn new(
        orders: Arc<O>,
        notifier: Arc<dyn OverdueNotifier>,
        clock: Arc<dyn Clock>,
        config: OverdueScannerConfig,
    ) -> Self {
        Self {
            orders,
            notifier,
            clock,
            config,
        }
    }

    /// Run one pass as of `today`.
    ///
    /// A failed notification is logged and counted; the pass continues with
    /// the next order. Only a failure to load orders aborts the pass.
    pub async fn scan_once(&self, today: NaiveDate) -> Result<OverdueScanReport, Error> {
        let outstanding = self
            .orders
            .list_outstanding()
            .await
            .map_err(map_lending_error)?;
        let mut report = OverdueScanReport {
            scanned: outstanding.len(),
            ..OverdueScanReport::default()
        };

        for order in outstanding
            .iter()
            .filter(|order| order.days_until_due(today) <= self.config.window_days)
        {
            match self
                .notifier
                .send_overdue_notification(&order.user_email, &order.book_title)
                .await
            {
                Ok(()) => report.notified += 1,
                Err(error) => {
                    report.failed += 1;
                    warn!(
                        order_id = %order.order_id,
                        error = %error,
                        "overdue notification failed"
                    );
                }
            }
        }
        Ok(report)
    }

    /// Run passes forever on the configured interval.
    ///
    /// The first pass starts immediately. Passes are awaited in sequence so
    /// they never overlap; ticks missed by a slow pass are skipped.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let today = self.clock.utc().date_naive();
            match self.scan_once(today).await {
                Ok(report) => info!(
                    scanned = report.scanned,
                    notified = report.notified,
                    failed = report.failed,
                    "overdue scan finished"
                ),
                Err(error) => warn!(error = %error, "overdue scan aborted"),
            }
        }
    }
}
