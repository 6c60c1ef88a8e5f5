//! Ports for the loan ledger: orders and their audit history.
//!
//! `checkout` and `record_return` are the only operations that touch book
//! inventory. Adapters must apply each one as a single atomic unit so that
//! quantity, order state and history never disagree.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    BookReturn, Checkout, CheckoutOutcome, Order, OrderHistoryEntry, OrderId, OrderStatus,
    OrderView, OutstandingOrder, ReturnOutcome, UserHistoryEntry, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by order and order history adapters.
    pub enum LendingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "lending repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "lending repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Decrement stock if a copy is left, insert the order and its `TAKING`
    /// history row. Nothing is written when no copy is left.
    async fn checkout(&self, checkout: &Checkout)
    -> Result<CheckoutOutcome, LendingRepositoryError>;

    /// Set the return date if still outstanding, increment stock and insert a
    /// `RETURNING` history row. Nothing is written for a returned order.
    async fn record_return(
        &self,
        book_return: &BookReturn,
    ) -> Result<ReturnOutcome, LendingRepositoryError>;

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, LendingRepositoryError>;

    /// Every order in id order, joined with borrower email and book title.
    async fn list_all(&self) -> Result<Vec<OrderView>, LendingRepositoryError>;

    /// Orders without a return date.
    async fn list_outstanding(&self) -> Result<Vec<OutstandingOrder>, LendingRepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderHistoryRepository: Send + Sync {
    /// Append one audit row; `None` when the order does not exist.
    async fn append(
        &self,
        order_id: OrderId,
        status: OrderStatus,
        action_date: DateTime<Utc>,
    ) -> Result<Option<OrderHistoryEntry>, LendingRepositoryError>;

    async fn list_by_order(
        &self,
        order_id: OrderId,
    ) -> Result<Vec<OrderHistoryEntry>, LendingRepositoryError>;

    async fn list_all(&self) -> Result<Vec<OrderHistoryEntry>, LendingRepositoryError>;

    /// Rows whose order was borrowed by `user_id`.
    async fn list_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<UserHistoryEntry>, LendingRepositoryError>;
}
