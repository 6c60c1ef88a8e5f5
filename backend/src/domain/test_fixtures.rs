//! Shared fixtures for domain service unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    Author, AuthorId, Book, BookId, BookListing, Caller, Genre, GenreId, Order, OrderId, Role,
    UserId,
};

/// 2026-05-10T12:00:00Z; "today" for every service test.
pub(crate) fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 10, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub(crate) fn fixture_today() -> NaiveDate {
    fixture_now().date_naive()
}

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_now(),
    })
}

pub(crate) fn reader(id: i64) -> Caller {
    Caller {
        id: UserId::new(id),
        email: format!("reader{id}@example.com"),
        role: Role::User,
    }
}

pub(crate) fn admin(id: i64) -> Caller {
    Caller {
        id: UserId::new(id),
        email: format!("admin{id}@example.com"),
        role: Role::Admin,
    }
}

pub(crate) fn book(id: i64, quantity: i32) -> Book {
    Book {
        id: BookId::new(id),
        title: "Dune".to_owned(),
        description: None,
        publication_year: "1965".to_owned(),
        quantity,
        author_id: AuthorId::new(1),
        genre_ids: vec![GenreId::new(1)],
        created_by: UserId::new(99),
    }
}

pub(crate) fn listing(book: Book) -> BookListing {
    BookListing {
        author: Author {
            id: book.author_id,
            firstname: "Frank".to_owned(),
            lastname: "Herbert".to_owned(),
            date_of_birth: None,
            birthplace: None,
        },
        genres: vec![Genre {
            id: GenreId::new(1),
            title: "Science fiction".to_owned(),
            description: None,
        }],
        book,
    }
}

pub(crate) fn order(id: i64, borrower: i64, returned: Option<NaiveDate>) -> Order {
    Order {
        id: OrderId::new(id),
        user_id: UserId::new(borrower),
        book_id: BookId::new(7),
        order_date: date(2026, 5, 1),
        return_due_date: date(2026, 5, 15),
        actual_return_date: returned,
    }
}
