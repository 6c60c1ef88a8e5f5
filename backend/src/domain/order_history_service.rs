//! Order history audit trail service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{OrderHistoryCommand, OrderHistoryQuery, OrderHistoryRepository};
use crate::domain::repository_errors::map_lending_error;
use crate::domain::{Caller, Error, OrderHistoryEntry, OrderId, OrderStatus, UserHistoryEntry};

/// Service implementing [`OrderHistoryCommand`] and [`OrderHistoryQuery`].
#[derive(Clone)]
pub struct OrderHistoryService<R> {
    history: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> OrderHistoryService<R> {
    pub fn new(history: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { history, clock }
    }
}

#[async_trait]
impl<R> OrderHistoryCommand for OrderHistoryService<R>
where
    R: OrderHistoryRepository,
{
    async fn create_order_history(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<OrderHistoryEntry, Error> {
        self.history
            .append(order_id, status, self.clock.utc())
            .await
            .map_err(map_lending_error)?
            .ok_or_else(|| Error::not_found(format!("Order with id: {order_id} not found!")))
    }
}

#[async_trait]
impl<R> OrderHistoryQuery for OrderHistoryService<R>
where
    R: OrderHistoryRepository,
{
    async fn history_by_order(&self, order_id: OrderId) -> Result<Vec<OrderHistoryEntry>, Error> {
        self.history
            .list_by_order(order_id)
            .await
            .map_err(map_lending_error)
    }

    async fn all_history(&self) -> Result<Vec<OrderHistoryEntry>, Error> {
        self.history.list_all().await.map_err(map_lending_error)
    }

    async fn user_history(&self, caller: &Caller) -> Result<Vec<UserHistoryEntry>, Error> {
        self.history
            .list_by_user(caller.id)
            .await
            .map_err(map_lending_error)
    }
}
