//! Checkout and return endpoints.
//!
//! ```text
//! GET   /orders/all
//! POST  /orders/take {"book_id":7,"return_due_date":"2026-05-17"}
//! PATCH /orders/return/{id}
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::ports::TakeBookRequest;
use crate::domain::{ApiResult, BookId, OrderId, OrderSummary};
use crate::inbound::http::auth::{require_admin, require_user};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Checkout request body for `POST /orders/take`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderRequest {
    pub book_id: BookId,
    pub return_due_date: NaiveDate,
}

/// Order summary returned by every order endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OrderResponse {
    pub user_email: String,
    pub book_title: String,
    pub order_date: NaiveDate,
}

impl From<OrderSummary> for OrderResponse {
    fn from(value: OrderSummary) -> Self {
        Self {
            user_email: value.user_email,
            book_title: value.book_title,
            order_date: value.order_date,
        }
    }
}

/// List every order, returned or not. Admin only.
#[get("/orders/all")]
pub async fn all_orders(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<OrderResponse>>> {
    require_admin(&state, &session).await?;
    let orders = state.orders_query.all_orders().await?;
    Ok(web::Json(orders.into_iter().map(OrderResponse::from).collect()))
}

/// Check a book out for the signed-in reader.
#[post("/orders/take")]
pub async fn take_book(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<OrderRequest>,
) -> ApiResult<HttpResponse> {
    let caller = require_user(&state, &session).await?;
    let OrderRequest {
        book_id,
        return_due_date,
    } = payload.into_inner();
    let summary = state
        .orders
        .take_book(
            &caller,
            TakeBookRequest {
                book_id,
                return_due_date,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(OrderResponse::from(summary)))
}

/// Record the return of one of the caller's own orders.
#[patch("/orders/return/{id}")]
pub async fn return_book(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<OrderResponse>> {
    let caller = require_user(&state, &session).await?;
    let order_id = OrderId::new(path.into_inner());
    let summary = state.orders.return_book(&caller, order_id).await?;
    Ok(web::Json(OrderResponse::from(summary)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Error, Role, UserId};
    use crate::inbound::http::test_utils::{
        SESSION_USER, TestPorts, login_as_session_user, test_app,
    };
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn summary() -> OrderSummary {
        OrderSummary {
            user_email: "reader@example.com".to_owned(),
            book_title: "Dune".to_owned(),
            order_date: NaiveDate::from_ymd_opt(2026, 5, 10).expect("valid date"),
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn take_book_returns_created_summary() {
        let mut ports = TestPorts::default().signed_in_as(Role::User);
        ports
            .orders
            .expect_take_book()
            .withf(|caller, request| {
                caller.id == UserId::new(SESSION_USER)
                    && request.book_id == BookId::new(3)
                    && request.return_due_date.to_string() == "2026-05-17"
            })
            .times(1)
            .returning(|_, _| Ok(summary()));
        let app = test::init_service(test_app(ports)).await;
        let cookie = login_as_session_user(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/orders/take")
                .cookie(cookie)
                .set_json(json!({"book_id": 3, "return_due_date": "2026-05-17"}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body,
            json!({
                "user_email": "reader@example.com",
                "book_title": "Dune",
                "order_date": "2026-05-10",
            })
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn take_book_requires_a_session() {
        let mut ports = TestPorts::default();
        ports.orders.expect_take_book().never();
        let app = test::init_service(test_app(ports)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/orders/take")
                .set_json(json!({"book_id": 3, "return_due_date": "2026-05-17"}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn admins_cannot_take_books() {
        let mut ports = TestPorts::default().signed_in_as(Role::Admin);
        ports.orders.expect_take_book().never();
        let app = test::init_service(test_app(ports)).await;
        let cookie = login_as_session_user(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/orders/take")
                .cookie(cookie)
                .set_json(json!({"book_id": 3, "return_due_date": "2026-05-17"}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[rstest]
    #[actix_web::test]
    async fn unavailable_book_is_not_found() {
        let mut ports = TestPorts::default().signed_in_as(Role::User);
        ports
            .orders
            .expect_take_book()
            .returning(|_, _| Err(Error::not_found("Book is not available!")));
        let app = test::init_service(test_app(ports)).await;
        let cookie = login_as_session_user(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/orders/take")
                .cookie(cookie)
                .set_json(json!({"book_id": 3, "return_due_date": "2026-05-17"}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("Book is not available!")
        );
        assert_eq!(body.get("status").and_then(Value::as_u64), Some(404));
    }

    #[rstest]
    #[case(Ok(()), StatusCode::OK)]
    #[case(Err(Error::conflict("Order with id: 9 already returned!")), StatusCode::CONFLICT)]
    #[case(Err(Error::forbidden("That's not your order!")), StatusCode::FORBIDDEN)]
    #[actix_web::test]
    async fn return_book_maps_outcomes(
        #[case] outcome: Result<(), Error>,
        #[case] expected: StatusCode,
    ) {
        let mut ports = TestPorts::default().signed_in_as(Role::User);
        ports
            .orders
            .expect_return_book()
            .withf(|_, id| *id == OrderId::new(9))
            .times(1)
            .return_once(move |_, _| outcome.map(|()| summary()));
        let app = test::init_service(test_app(ports)).await;
        let cookie = login_as_session_user(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::patch()
                .uri("/orders/return/9")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), expected);
    }

    #[rstest]
    #[actix_web::test]
    async fn all_orders_is_admin_only() {
        let mut ports = TestPorts::default().signed_in_as(Role::Admin);
        ports
            .orders_query
            .expect_all_orders()
            .times(1)
            .returning(|| Ok(vec![summary()]));
        let app = test::init_service(test_app(ports)).await;
        let cookie = login_as_session_user(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/orders/all")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Vec<OrderResponse> = test::read_body_json(res).await;
        assert_eq!(body, vec![OrderResponse::from(summary())]);
    }
}
