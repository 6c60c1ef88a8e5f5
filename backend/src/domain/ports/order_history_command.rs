//! Driving ports for the order audit trail.

use async_trait::async_trait;

use crate::domain::{Caller, Error, OrderHistoryEntry, OrderId, OrderStatus, UserHistoryEntry};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderHistoryCommand: Send + Sync {
    /// Append an audit row stamped with the current time.
    async fn create_order_history(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<OrderHistoryEntry, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderHistoryQuery: Send + Sync {
    async fn history_by_order(&self, order_id: OrderId) -> Result<Vec<OrderHistoryEntry>, Error>;

    async fn all_history(&self) -> Result<Vec<OrderHistoryEntry>, Error>;

    /// History rows for orders borrowed by the caller.
    async fn user_history(&self, caller: &Caller) -> Result<Vec<UserHistoryEntry>, Error>;
}
