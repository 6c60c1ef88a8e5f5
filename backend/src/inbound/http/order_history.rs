//! Read endpoints over the order audit trail.
//!
//! ```text
//! GET /order_history/all
//! GET /order_history/by_order/{order_id}
//! GET /order_history/my
//! ```

use actix_web::{get, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ApiResult, OrderHistoryEntry, OrderId, OrderStatus, UserHistoryEntry};
use crate::inbound::http::auth::{require_admin, require_user};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OrderHistoryResponse {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub action_date: DateTime<Utc>,
}

impl From<OrderHistoryEntry> for OrderHistoryResponse {
    fn from(value: OrderHistoryEntry) -> Self {
        Self {
            order_id: value.order_id,
            status: value.status,
            action_date: value.action_date,
        }
    }
}

/// History row enriched with borrower and title, for the caller's own view.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserOrderHistoryResponse {
    pub user_email: String,
    pub book_title: String,
    pub status: OrderStatus,
    pub action_date: DateTime<Utc>,
}

impl From<UserHistoryEntry> for UserOrderHistoryResponse {
    fn from(value: UserHistoryEntry) -> Self {
        Self {
            user_email: value.user_email,
            book_title: value.book_title,
            status: value.status,
            action_date: value.action_date,
        }
    }
}

#[get("/order_history/all")]
pub async fn all_history(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<OrderHistoryResponse>>> {
    require_admin(&state, &session).await?;
    let entries = state.history_query.all_history().await?;
    Ok(web::Json(
        entries.into_iter().map(OrderHistoryResponse::from).collect(),
    ))
}

#[get("/order_history/by_order/{order_id}")]
pub async fn history_by_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<OrderHistoryResponse>>> {
    require_admin(&state, &session).await?;
    let entries = state
        .history_query
        .history_by_order(OrderId::new(path.into_inner()))
        .await?;
    Ok(web::Json(
        entries.into_iter().map(OrderHistoryResponse::from).collect(),
    ))
}

#[get("/order_history/my")]
pub async fn my_history(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<UserOrderHistoryResponse>>> {
    let caller = require_user(&state, &session).await?;
    let entries = state.history_query.user_history(&caller).await?;
    Ok(web::Json(
        entries
            .into_iter()
            .map(UserOrderHistoryResponse::from)
            .collect(),
    ))
}
