//! Checkout and return orchestration.
//!
//! The service validates the request against current catalogue and ledger
//! state, then hands the whole state change to [`OrderRepository`] as one
//! atomic call. A checkout that loses a race for the last copy is reported
//! the same way as one that found no copies up front.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    BookRepository, OrderCommand, OrderQuery, OrderRepository, TakeBookRequest,
};
use crate::domain::repository_errors::{map_catalogue_error, map_lending_error};
use crate::domain::{
    BookId, BookReturn, Caller, Checkout, CheckoutOutcome, Error, OrderId, OrderSummary,
    ReturnOutcome,
};

fn book_not_found(id: BookId) -> Error {
    Error::not_found(format!("Book with id: {id} not found!"))
}

fn book_unavailable() -> Error {
    Error::not_found("Book is not available!")
}

fn order_not_found(id: OrderId) -> Error {
    Error::not_found(format!("Order with id: {id} not found!"))
}

fn already_returned(id: OrderId) -> Error {
    Error::conflict(format!("Order with id: {id} is already returned!"))
}

/// Lending service implementing [`OrderCommand`] and [`OrderQuery`].
#[derive(Clone)]
pub struct OrderService<O, B> {
    orders: Arc<O>,
    books: Arc<B>,
    clock: Arc<dyn Clock>,
}

impl<O, B> OrderService<O, B> {
    pub fn new(orders: Arc<O>, books: Arc<B>, clock: Arc<dyn Clock>) -> Self {
        Self {
            orders,
            books,
            clock,
        }
    }
}

#[async_trait]
impl<O, B> OrderCommand for OrderService<O, B>
where
    O: OrderRepository,
    B: BookRepository,
{
    async fn take_book(
        &self,
        caller: &Caller,
        request: TakeBookRequest,
    ) -> Result<OrderSummary, Error> {
        let now = self.clock.utc();
        let today = now.date_naive();
        if request.return_due_date < today {
            return Err(
                Error::invalid_request("Return due date cannot be in the past").with_details(
                    json!({
                        "field": "return_due_date",
                        "code": "due_date_in_past",
                        "value": request.return_due_date,
                    }),
                ),
            );
        }

        let book = self
            .books
            .find_by_id(request.book_id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| book_not_found(request.book_id))?;
        if !book.is_available() {
            return Err(book_unavailable());
        }

        let checkout = Checkout {
            user_id: caller.id,
            book_id: book.id,
            order_date: today,
            return_due_date: request.return_due_date,
            action_at: now,
        };
        match self
            .orders
            .checkout(&checkout)
            .await
            .map_err(map_lending_error)?
        {
            CheckoutOutcome::Created(order) => {
                info!(
                    order_id = %order.id,
                    book_id = %book.id,
                    user_id = %caller.id,
                    "book checked out"
                );
                Ok(OrderSummary {
                    user_email: caller.email.clone(),
                    book_title: book.title,
                    order_date: order.order_date,
                })
            }
            CheckoutOutcome::BookUnavailable => Err(book_unavailable()),
        }
    }

    async fn return_book(
        &self,
        caller: &Caller,
        order_id: OrderId,
    ) -> Result<OrderSummary, Error> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await
            .map_err(map_lending_error)?
            .ok_or_else(|| order_not_found(order_id))?;
        if !order.is_borrowed_by(caller.id) {
            return Err(Error::forbidden("That's not your order!"));
        }
        if !order.is_outstanding() {
            return Err(already_returned(order_id));
        }

        let now = self.clock.utc();
        let book_return = BookReturn {
            order_id,
            returned_on: now.date_naive(),
            action_at: now,
        };
        let returned = match self
            .orders
            .record_return(&book_return)
            .await
            .map_err(map_lending_error)?
        {
            ReturnOutcome::Returned(order) => order,
            ReturnOutcome::AlreadyReturned => return Err(already_returned(order_id)),
            ReturnOutcome::Missing => return Err(order_not_found(order_id)),
        };

        let book = self
            .books
            .find_by_id(returned.book_id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| {
                Error::internal(format!(
                    "order {order_id} references missing book {}",
                    returned.book_id
                ))
            })?;
        info!(order_id = %order_id, book_id = %book.id, user_id = %caller.id, "book returned");

        Ok(OrderSummary {
            user_email: caller.email.clone(),
            book_title: book.title,
            order_date: returned.order_date,
        })
    }
}

#[async_trait]
impl<O, B> OrderQuery for OrderService<O, B>
where
    O: OrderRepository,
    B: BookRepository,
{
    async fn all_orders(&self) -> Result<Vec<OrderSummary>, Error> {
        let orders = self.orders.list_all().await.map_err(map_lending_error)?;
        Ok(orders.into_iter().map(OrderSummary::from).collect())
    }
}

#[cfg(test)]
#[path = "order_service_tests.rs"]
mod tests;
