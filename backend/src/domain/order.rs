//! Loan ledger entities: orders and their append-only history.
//!
//! An [`Order`] is one loan. It is created by a checkout with no return date
//! and receives `actual_return_date` exactly once. Every checkout and return
//! also appends an [`OrderHistoryEntry`]; history rows are never mutated.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{BookId, OrderHistoryId, OrderId, UserId};

/// Audit status recorded for each ledger transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// The book was checked out.
    Taking,
    /// The book was handed back.
    Returning,
}

impl OrderStatus {
    /// Storage and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Taking => "TAKING",
            Self::Returning => "RETURNING",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status: {0}")]
pub struct UnknownOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TAKING" => Ok(Self::Taking),
            "RETURNING" => Ok(Self::Returning),
            other => Err(UnknownOrderStatus(other.to_owned())),
        }
    }
}

/// One loan record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub book_id: BookId,
    pub order_date: NaiveDate,
    pub return_due_date: NaiveDate,
    pub actual_return_date: Option<NaiveDate>,
}

impl Order {
    /// An order is outstanding until its return is recorded.
    pub fn is_outstanding(&self) -> bool {
        self.actual_return_date.is_none()
    }

    /// Whether `user` borrowed this book.
    pub fn is_borrowed_by(&self, user: UserId) -> bool {
        self.user_id == user
    }
}

/// Everything needed to record a checkout in one atomic unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    pub user_id: UserId,
    pub book_id: BookId,
    pub order_date: NaiveDate,
    pub return_due_date: NaiveDate,
    pub action_at: DateTime<Utc>,
}

/// Result of an atomic checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Inventory was decremented, the order and its `TAKING` row stored.
    Created(Order),
    /// No copies were left when the conditional decrement ran.
    BookUnavailable,
}

/// Everything needed to record a return in one atomic unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookReturn {
    pub order_id: OrderId,
    pub returned_on: NaiveDate,
    pub action_at: DateTime<Utc>,
}

/// Result of an atomic return attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnOutcome {
    /// Return date set, inventory incremented and `RETURNING` row stored.
    Returned(Order),
    /// The order already carried a return date; nothing changed.
    AlreadyReturned,
    /// The order vanished between lookup and update.
    Missing,
}

/// Order joined with borrower email and book title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderView {
    pub order: Order,
    pub user_email: String,
    pub book_title: String,
}

/// Response summary returned by checkout, return and order listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub user_email: String,
    pub book_title: String,
    pub order_date: NaiveDate,
}

impl From<OrderView> for OrderSummary {
    fn from(view: OrderView) -> Self {
        Self {
            user_email: view.user_email,
            book_title: view.book_title,
            order_date: view.order.order_date,
        }
    }
}

/// Outstanding order data needed by the overdue scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutstandingOrder {
    pub order_id: OrderId,
    pub user_email: String,
    pub book_title: String,
    pub return_due_date: NaiveDate,
}

impl OutstandingOrder {
    /// Whole days from `today` until the due date; negative once overdue.
    pub fn days_until_due(&self, today: NaiveDate) -> i64 {
        (self.return_due_date - today).num_days()
    }
}

/// Immutable audit row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderHistoryEntry {
    pub id: OrderHistoryId,
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub action_date: DateTime<Utc>,
}

/// Audit row joined with borrower email and book title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserHistoryEntry {
    pub order_id: OrderId,
    pub user_email: String,
    pub book_title: String,
    pub status: OrderStatus,
    pub action_date: DateTime<Utc>,
}
