//! Tests for checkout and return orchestration.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    CatalogueRepositoryError, LendingRepositoryError, MockBookRepository, MockOrderRepository,
};
use crate::domain::test_fixtures::{book, date, fixture_clock, fixture_today, order, reader};
use crate::domain::{ErrorCode, OrderView, UserId};

fn service(
    orders: MockOrderRepository,
    books: MockBookRepository,
) -> OrderService<MockOrderRepository, MockBookRepository> {
    OrderService::new(Arc::new(orders), Arc::new(books), fixture_clock())
}

fn take_request(book_id: i64) -> TakeBookRequest {
    TakeBookRequest {
        book_id: BookId::new(book_id),
        return_due_date: date(2026, 5, 20),
    }
}

#[tokio::test]
async fn take_book_checks_out_and_summarises() {
    let mut books = MockBookRepository::new();
    books
        .expect_find_by_id()
        .with(eq(BookId::new(7)))
        .times(1)
        .return_once(|_| Ok(Some(book(7, 1))));
    let mut orders = MockOrderRepository::new();
    orders
        .expect_checkout()
        .withf(|checkout| {
            checkout.user_id == UserId::new(1)
                && checkout.order_date == fixture_today()
                && checkout.return_due_date == date(2026, 5, 20)
        })
        .times(1)
        .return_once(|checkout| {
            Ok(CheckoutOutcome::Created(crate::domain::Order {
                id: OrderId::new(11),
                user_id: checkout.user_id,
                book_id: checkout.book_id,
                order_date: checkout.order_date,
                return_due_date: checkout.return_due_date,
                actual_return_date: None,
            }))
        });

    let summary = service(orders, books)
        .take_book(&reader(1), take_request(7))
        .await
        .expect("checkout succeeds");

    assert_eq!(summary.user_email, "reader1@example.com");
    assert_eq!(summary.book_title, "Dune");
    assert_eq!(summary.order_date, fixture_today());
}

#[tokio::test]
async fn take_book_reports_unknown_books() {
    let mut books = MockBookRepository::new();
    books.expect_find_by_id().return_once(|_| Ok(None));
    let mut orders = MockOrderRepository::new();
    orders.expect_checkout().times(0);

    let err = service(orders, books)
        .take_book(&reader(1), take_request(42))
        .await
        .expect_err("unknown book");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "Book with id: 42 not found!");
}

#[tokio::test]
async fn take_book_rejects_books_without_copies_before_writing() {
    let mut books = MockBookRepository::new();
    books.expect_find_by_id().return_once(|_| Ok(Some(book(7, 0))));
    let mut orders = MockOrderRepository::new();
    orders.expect_checkout().times(0);

    let err = service(orders, books)
        .take_book(&reader(1), take_request(7))
        .await
        .expect_err("no copies");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "Book is not available!");
}

#[tokio::test]
async fn take_book_reports_lost_race_as_unavailable() {
    let mut books = MockBookRepository::new();
    books.expect_find_by_id().return_once(|_| Ok(Some(book(7, 1))));
    let mut orders = MockOrderRepository::new();
    orders
        .expect_checkout()
        .return_once(|_| Ok(CheckoutOutcome::BookUnavailable));

    let err = service(orders, books)
        .take_book(&reader(1), take_request(7))
        .await
        .expect_err("race lost");

    assert_eq!(err.message(), "Book is not available!");
}

#[tokio::test]
async fn take_book_rejects_due_dates_in_the_past() {
    let mut books = MockBookRepository::new();
    books.expect_find_by_id().times(0);
    let request = TakeBookRequest {
        book_id: BookId::new(7),
        return_due_date: date(2026, 5, 9),
    };

    let err = service(MockOrderRepository::new(), books)
        .take_book(&reader(1), request)
        .await
        .expect_err("past due date");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert!(err.details().is_some());
}

#[rstest]
#[case(CatalogueRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(CatalogueRepositoryError::query("boom"), ErrorCode::InternalError)]
#[tokio::test]
async fn take_book_maps_store_failures(
    #[case] failure: CatalogueRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut books = MockBookRepository::new();
    books.expect_find_by_id().return_once(move |_| Err(failure));

    let err = service(MockOrderRepository::new(), books)
        .take_book(&reader(1), take_request(7))
        .await
        .expect_err("store failure");

    assert_eq!(err.code(), expected);
}

#[tokio::test]
async fn return_book_records_return_for_borrower() {
    let mut orders = MockOrderRepository::new();
    orders
        .expect_find_by_id()
        .with(eq(OrderId::new(3)))
        .return_once(|_| Ok(Some(order(3, 1, None))));
    orders
        .expect_record_return()
        .withf(|r| r.order_id == OrderId::new(3) && r.returned_on == fixture_today())
        .times(1)
        .return_once(|_| Ok(ReturnOutcome::Returned(order(3, 1, Some(fixture_today())))));
    let mut books = MockBookRepository::new();
    books
        .expect_find_by_id()
        .with(eq(BookId::new(7)))
        .return_once(|_| Ok(Some(book(7, 1))));

    let summary = service(orders, books)
        .return_book(&reader(1), OrderId::new(3))
        .await
        .expect("return succeeds");

    assert_eq!(summary.book_title, "Dune");
    assert_eq!(summary.order_date, date(2026, 5, 1));
}

#[tokio::test]
async fn return_book_rejects_other_borrowers_without_writing() {
    let mut orders = MockOrderRepository::new();
    orders
        .expect_find_by_id()
        .return_once(|_| Ok(Some(order(3, 1, None))));
    orders.expect_record_return().times(0);

    let err = service(orders, MockBookRepository::new())
        .return_book(&reader(2), OrderId::new(3))
        .await
        .expect_err("not the borrower");

    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(err.message(), "That's not your order!");
}

#[tokio::test]
async fn return_book_rejects_unknown_orders() {
    let mut orders = MockOrderRepository::new();
    orders.expect_find_by_id().return_once(|_| Ok(None));

    let err = service(orders, MockBookRepository::new())
        .return_book(&reader(1), OrderId::new(5))
        .await
        .expect_err("unknown order");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "Order with id: 5 not found!");
}

#[rstest]
#[case(Some(date(2026, 5, 2)))]
#[case(None)]
#[tokio::test]
async fn return_book_rejects_double_returns(#[case] stored_return: Option<chrono::NaiveDate>) {
    let mut orders = MockOrderRepository::new();
    orders
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(order(3, 1, stored_return))));
    // A concurrent return that wins between lookup and update.
    orders
        .expect_record_return()
        .times(0..=1)
        .return_once(|_| Ok(ReturnOutcome::AlreadyReturned));

    let err = service(orders, MockBookRepository::new())
        .return_book(&reader(1), OrderId::new(3))
        .await
        .expect_err("already returned");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "Order with id: 3 is already returned!");
}

#[tokio::test]
async fn all_orders_projects_summaries() {
    let mut orders = MockOrderRepository::new();
    orders.expect_list_all().return_once(|| {
        Ok(vec![OrderView {
            order: order(1, 1, None),
            user_email: "reader1@example.com".to_owned(),
            book_title: "Dune".to_owned(),
        }])
    });

    let summaries = service(orders, MockBookRepository::new())
        .all_orders()
        .await
        .expect("listing succeeds");

    assert_eq!(
        summaries,
        vec![OrderSummary {
            user_email: "reader1@example.com".to_owned(),
            book_title: "Dune".to_owned(),
            order_date: date(2026, 5, 1),
        }]
    );
}

#[tokio::test]
async fn all_orders_maps_connection_failures() {
    let mut orders = MockOrderRepository::new();
    orders
        .expect_list_all()
        .return_once(|| Err(LendingRepositoryError::connection("pool exhausted")));

    let err = service(orders, MockBookRepository::new())
        .all_orders()
        .await
        .expect_err("store down");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}
