//! Loan ledger ports over the in-memory tables.
//!
//! Checkout and return hold the store lock for the whole unit: the quantity
//! check, the inventory change, the order write and the history append.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{LendingRepositoryError, OrderHistoryRepository, OrderRepository};
use crate::domain::{
    BookReturn, Checkout, CheckoutOutcome, Order, OrderHistoryEntry, OrderHistoryId, OrderId,
    OrderStatus, OrderView, OutstandingOrder, ReturnOutcome, UserHistoryEntry, UserId,
};

use super::{MemoryStore, State};

type Result<T> = std::result::Result<T, LendingRepositoryError>;

fn record(
    state: &mut State,
    order_id: OrderId,
    status: OrderStatus,
    action_date: DateTime<Utc>,
) -> OrderHistoryEntry {
    state.history.insert_with(|id| OrderHistoryEntry {
        id: OrderHistoryId::new(id),
        order_id,
        status,
        action_date,
    })
}

/// Borrower email and book title for an order, when both still resolve.
fn labels(state: &State, order: &Order) -> Option<(String, String)> {
    let user = state.users.get(order.user_id.get())?;
    let book = state.books.get(order.book_id.get())?;
    Some((user.email.clone(), book.title.clone()))
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn checkout(&self, checkout: &Checkout) -> Result<CheckoutOutcome> {
        let mut state = self.lock(LendingRepositoryError::query)?;
        if state.users.get(checkout.user_id.get()).is_none() {
            return Err(LendingRepositoryError::query("unknown user reference"));
        }
        match state.books.get_mut(checkout.book_id.get()) {
            Some(book) if book.quantity > 0 => book.quantity -= 1,
            _ => return Ok(CheckoutOutcome::BookUnavailable),
        }
        let order = state.orders.insert_with(|id| Order {
            id: OrderId::new(id),
            user_id: checkout.user_id,
            book_id: checkout.book_id,
            order_date: checkout.order_date,
            return_due_date: checkout.return_due_date,
            actual_return_date: None,
        });
        record(&mut state, order.id, OrderStatus::Taking, checkout.action_at);
        Ok(CheckoutOutcome::Created(order))
    }

    async fn record_return(&self, book_return: &BookReturn) -> Result<ReturnOutcome> {
        let mut state = self.lock(LendingRepositoryError::query)?;
        let Some(order) = state.orders.get_mut(book_return.order_id.get()) else {
            return Ok(ReturnOutcome::Missing);
        };
        if !order.is_outstanding() {
            return Ok(ReturnOutcome::AlreadyReturned);
        }
        order.actual_return_date = Some(book_return.returned_on);
        let order = order.clone();
        if let Some(book) = state.books.get_mut(order.book_id.get()) {
            book.quantity += 1;
        }
        record(&mut state, order.id, OrderStatus::Returning, book_return.action_at);
        Ok(ReturnOutcome::Returned(order))
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        let state = self.lock(LendingRepositoryError::query)?;
        Ok(state.orders.get(id.get()).cloned())
    }

    async fn list_all(&self) -> Result<Vec<OrderView>> {
        let state = self.lock(LendingRepositoryError::query)?;
        Ok(state
            .orders
            .values()
            .filter_map(|order| {
                let (user_email, book_title) = labels(&state, order)?;
                Some(OrderView {
                    order: order.clone(),
                    user_email,
                    book_title,
                })
            })
            .collect())
    }

    async fn list_outstanding(&self) -> Result<Vec<OutstandingOrder>> {
        let state = self.lock(LendingRepositoryError::query)?;
        let mut outstanding: Vec<OutstandingOrder> = state
            .orders
            .values()
            .filter(|order| order.is_outstanding())
            .filter_map(|order| {
                let (user_email, book_title) = labels(&state, order)?;
                Some(OutstandingOrder {
                    order_id: order.id,
                    user_email,
                    book_title,
                    return_due_date: order.return_due_date,
                })
            })
            .collect();
        outstanding.sort_by_key(|order| order.return_due_date);
        Ok(outstanding)
    }
}

#[async_trait]
impl OrderHistoryRepository for MemoryStore {
    async fn append(
        &self,
        order_id: OrderId,
        status: OrderStatus,
        action_date: DateTime<Utc>,
    ) -> Result<Option<OrderHistoryEntry>> {
        let mut state = self.lock(LendingRepositoryError::query)?;
        if state.orders.get(order_id.get()).is_none() {
            return Ok(None);
        }
        Ok(Some(record(&mut state, order_id, status, action_date)))
    }

    async fn list_by_order(&self, order_id: OrderId) -> Result<Vec<OrderHistoryEntry>> {
        let state = self.lock(LendingRepositoryError::query)?;
        Ok(state
            .history
            .values()
            .filter(|entry| entry.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<OrderHistoryEntry>> {
        let state = self.lock(LendingRepositoryError::query)?;
        Ok(state.history.values().cloned().collect())
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<UserHistoryEntry>> {
        let state = self.lock(LendingRepositoryError::query)?;
        Ok(state
            .history
            .values()
            .filter_map(|entry| {
                let order = state.orders.get(entry.order_id.get())?;
                if !order.is_borrowed_by(user_id) {
                    return None;
                }
                let (user_email, book_title) = labels(&state, order)?;
                Some(UserHistoryEntry {
                    order_id: entry.order_id,
                    user_email,
                    book_title,
                    status: entry.status,
                    action_date: entry.action_date,
                })
            })
            .collect())
    }
}
