//! Driving ports for checkout, return and order listings.
//!
//! Inbound adapters call these with an explicit [`Caller`]; implementations
//! never read identity from ambient state.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{BookId, Caller, Error, OrderId, OrderSummary};

/// Checkout input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TakeBookRequest {
    pub book_id: BookId,
    pub return_due_date: NaiveDate,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderCommand: Send + Sync {
    /// Check out one copy of a book for the caller.
    async fn take_book(
        &self,
        caller: &Caller,
        request: TakeBookRequest,
    ) -> Result<OrderSummary, Error>;

    /// Return a book previously checked out by the caller.
    async fn return_book(&self, caller: &Caller, order_id: OrderId)
    -> Result<OrderSummary, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderQuery: Send + Sync {
    /// Every order in storage order.
    async fn all_orders(&self) -> Result<Vec<OrderSummary>, Error>;
}
