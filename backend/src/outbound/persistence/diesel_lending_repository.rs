//! PostgreSQL-backed loan ledger: orders, inventory and order history.
//!
//! Checkout and return each run in one transaction. Inventory moves through
//! conditional updates (`quantity > 0`, `actual_return_date IS NULL`) so two
//! racing requests can never both succeed against the same copy or order.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{LendingRepositoryError, OrderHistoryRepository, OrderRepository};
use crate::domain::{
    BookReturn, Checkout, CheckoutOutcome, Order, OrderHistoryEntry, OrderId, OrderStatus,
    OrderView, OutstandingOrder, ReturnOutcome, UserHistoryEntry, UserId,
};

use super::diesel_helpers::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewOrderHistoryRow, NewOrderRow, OrderHistoryRow, OrderRow};
use super::pool::{DbPool, PoolError};
use super::schema::{books, order_history, orders, users};

/// Diesel-backed implementation of the order and order history ports.
#[derive(Clone)]
pub struct DieselLendingRepository {
    pool: DbPool,
}

impl DieselLendingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> LendingRepositoryError {
    map_basic_pool_error(error, LendingRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> LendingRepositoryError {
    map_basic_diesel_error(
        error,
        "lending",
        LendingRepositoryError::query,
        LendingRepositoryError::connection,
    )
}

async fn append_history(
    conn: &mut AsyncPgConnection,
    order_id: i64,
    status: OrderStatus,
    action_date: DateTime<Utc>,
) -> QueryResult<OrderHistoryRow> {
    diesel::insert_into(order_history::table)
        .values(&NewOrderHistoryRow {
            order_id,
            status: status.as_str(),
            action_date,
        })
        .returning(OrderHistoryRow::as_returning())
        .get_result(conn)
        .await
}

async fn order_exists(conn: &mut AsyncPgConnection, order_id: i64) -> QueryResult<bool> {
    let found: Option<i64> = orders::table
        .find(order_id)
        .select(orders::id)
        .first(conn)
        .await
        .optional()?;
    Ok(found.is_some())
}

fn decode_history(
    rows: Vec<OrderHistoryRow>,
) -> Result<Vec<OrderHistoryEntry>, LendingRepositoryError> {
    rows.into_iter()
        .map(|row| row.into_entry().map_err(LendingRepositoryError::query))
        .collect()
}

#[async_trait]
impl OrderRepository for DieselLendingRepository {
    async fn checkout(
        &self,
        checkout: &Checkout,
    ) -> Result<CheckoutOutcome, LendingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let book_id = checkout.book_id.get();
        let new_order = NewOrderRow {
            user_id: checkout.user_id.get(),
            book_id,
            order_date: checkout.order_date,
            return_due_date: checkout.return_due_date,
        };
        let action_at = checkout.action_at;

        conn.transaction(|conn| {
            async move {
                let decremented = diesel::update(
                    books::table
                        .filter(books::id.eq(book_id))
                        .filter(books::quantity.gt(0)),
                )
                .set(books::quantity.eq(books::quantity - 1))
                .execute(conn)
                .await?;
                if decremented == 0 {
                    return Ok(CheckoutOutcome::BookUnavailable);
                }

                let order: OrderRow = diesel::insert_into(orders::table)
                    .values(&new_order)
                    .returning(OrderRow::as_returning())
                    .get_result(conn)
                    .await?;
                append_history(conn, order.id, OrderStatus::Taking, action_at).await?;
                Ok(CheckoutOutcome::Created(order.into()))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn record_return(
        &self,
        book_return: &BookReturn,
    ) -> Result<ReturnOutcome, LendingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let order_id = book_return.order_id.get();
        let returned_on: NaiveDate = book_return.returned_on;
        let action_at = book_return.action_at;

        conn.transaction(|conn| {
            async move {
                let returned: Option<OrderRow> = diesel::update(
                    orders::table
                        .filter(orders::id.eq(order_id))
                        .filter(orders::actual_return_date.is_null()),
                )
                .set(orders::actual_return_date.eq(Some(returned_on)))
                .returning(OrderRow::as_returning())
                .get_result(conn)
                .await
                .optional()?;

                let Some(order) = returned else {
                    return if order_exists(conn, order_id).await? {
                        Ok(ReturnOutcome::AlreadyReturned)
                    } else {
                        Ok(ReturnOutcome::Missing)
                    };
                };

                diesel::update(books::table.find(order.book_id))
                    .set(books::quantity.eq(books::quantity + 1))
                    .execute(conn)
                    .await?;
                append_history(conn, order.id, OrderStatus::Returning, action_at).await?;
                Ok(ReturnOutcome::Returned(order.into()))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, LendingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<OrderRow> = orders::table
            .find(id.get())
            .select(OrderRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Order::from))
    }

    async fn list_all(&self) -> Result<Vec<OrderView>, LendingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(OrderRow, String, String)> = orders::table
            .inner_join(users::table)
            .inner_join(books::table)
            .select((OrderRow::as_select(), users::email, books::title))
            .order_by(orders::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|(order, user_email, book_title)| OrderView {
                order: order.into(),
                user_email,
                book_title,
            })
            .collect())
    }

    async fn list_outstanding(&self) -> Result<Vec<OutstandingOrder>, LendingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(i64, String, String, NaiveDate)> = orders::table
            .inner_join(users::table)
            .inner_join(books::table)
            .filter(orders::actual_return_date.is_null())
            .select((
                orders::id,
                users::email,
                books::title,
                orders::return_due_date,
            ))
            .order_by(orders::return_due_date)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(
                |(order_id, user_email, book_title, return_due_date)| OutstandingOrder {
                    order_id: OrderId::new(order_id),
                    user_email,
                    book_title,
                    return_due_date,
                },
            )
            .collect())
    }
}

#[async_trait]
impl OrderHistoryRepository for DieselLendingRepository {
    async fn append(
        &self,
        order_id: OrderId,
        status: OrderStatus,
        action_date: DateTime<Utc>,
    ) -> Result<Option<OrderHistoryEntry>, LendingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let order_id = order_id.get();
        let row = conn
            .transaction(|conn| {
                async move {
                    if !order_exists(conn, order_id).await? {
                        return Ok(None);
                    }
                    append_history(conn, order_id, status, action_date)
                        .await
                        .map(Some)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        row.map(|row| row.into_entry().map_err(LendingRepositoryError::query))
            .transpose()
    }

    async fn list_by_order(
        &self,
        order_id: OrderId,
    ) -> Result<Vec<OrderHistoryEntry>, LendingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<OrderHistoryRow> = order_history::table
            .filter(order_history::order_id.eq(order_id.get()))
            .select(OrderHistoryRow::as_select())
            .order_by((order_history::action_date, order_history::id))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        decode_history(rows)
    }

    async fn list_all(&self) -> Result<Vec<OrderHistoryEntry>, LendingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<OrderHistoryRow> = order_history::table
            .select(OrderHistoryRow::as_select())
            .order_by(order_history::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        decode_history(rows)
    }

    async fn list_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<UserHistoryEntry>, LendingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(OrderHistoryRow, String, String)> = order_history::table
            .inner_join(
                orders::table
                    .inner_join(users::table)
                    .inner_join(books::table),
            )
            .filter(orders::user_id.eq(user_id.get()))
            .select((OrderHistoryRow::as_select(), users::email, books::title))
            .order_by((order_history::action_date, order_history::id))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(row, user_email, book_title)| {
                let entry = row.into_entry().map_err(LendingRepositoryError::query)?;
                Ok(UserHistoryEntry {
                    order_id: entry.order_id,
                    user_email,
                    book_title,
                    status: entry.status,
                    action_date: entry.action_date,
                })
            })
            .collect()
    }
}
