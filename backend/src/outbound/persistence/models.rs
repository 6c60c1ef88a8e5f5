//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types live next
//! to the rows so every repository decodes columns the same way.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Author, AuthorId, Book, BookId, Genre, GenreId, Order, OrderHistoryEntry, OrderHistoryId,
    OrderId, OrderStatus, Review, ReviewId, Role, User, UserId, VerificationToken,
};

use super::schema::{
    authors, book_genres, books, genres, order_history, orders, reviews, user_favorite_books,
    users, verification_tokens,
};

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub phone_number: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub admin_created_by: Option<i64>,
}

impl UserRow {
    /// Decode the row; favourites are loaded separately.
    pub(crate) fn into_user(self, favorite_books: Vec<BookId>) -> Result<User, String> {
        let role: Role = self.role.parse().map_err(|err| format!("{err}"))?;
        Ok(User {
            id: UserId::new(self.id),
            firstname: self.firstname,
            lastname: self.lastname,
            phone_number: self.phone_number,
            email: self.email,
            password_hash: self.password_hash,
            role,
            is_active: self.is_active,
            created_at: self.created_at,
            admin_created_by: self.admin_created_by.map(UserId::new),
            favorite_books,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub firstname: &'a str,
    pub lastname: &'a str,
    pub phone_number: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = verification_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VerificationTokenRow {
    pub token: Uuid,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

impl From<VerificationTokenRow> for VerificationToken {
    fn from(row: VerificationTokenRow) -> Self {
        Self {
            token: row.token,
            user_id: UserId::new(row.user_id),
            expires_at: row.expires_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_favorite_books)]
pub(crate) struct FavoriteRow {
    pub user_id: i64,
    pub book_id: i64,
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = authors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AuthorRow {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub date_of_birth: Option<NaiveDate>,
    pub birthplace: Option<String>,
}

impl From<AuthorRow> for Author {
    fn from(row: AuthorRow) -> Self {
        Self {
            id: AuthorId::new(row.id),
            firstname: row.firstname,
            lastname: row.lastname,
            date_of_birth: row.date_of_birth,
            birthplace: row.birthplace,
        }
    }
}

/// Insert and update values for an author.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = authors)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct AuthorValues<'a> {
    pub firstname: &'a str,
    pub lastname: &'a str,
    pub date_of_birth: Option<NaiveDate>,
    pub birthplace: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = genres)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GenreRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
}

impl From<GenreRow> for Genre {
    fn from(row: GenreRow) -> Self {
        Self {
            id: GenreId::new(row.id),
            title: row.title,
            description: row.description,
        }
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = genres)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct GenreValues<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub publication_year: String,
    pub quantity: i32,
    pub author_id: i64,
    pub created_by: i64,
}

impl BookRow {
    pub(crate) fn into_book(self, genre_ids: Vec<GenreId>) -> Book {
        Book {
            id: BookId::new(self.id),
            title: self.title,
            description: self.description,
            publication_year: self.publication_year,
            quantity: self.quantity,
            author_id: AuthorId::new(self.author_id),
            genre_ids,
            created_by: UserId::new(self.created_by),
        }
    }
}

/// Insert and full-update values for a book.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = books)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct BookValues<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub publication_year: &'a str,
    pub quantity: i32,
    pub author_id: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = books)]
pub(crate) struct NewBookRow<'a> {
    #[diesel(embed)]
    pub values: BookValues<'a>,
    pub created_by: i64,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = book_genres)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookGenreRow {
    pub book_id: i64,
    pub genre_id: i64,
}

// ---------------------------------------------------------------------------
// Lending
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub order_date: NaiveDate,
    pub return_due_date: NaiveDate,
    pub actual_return_date: Option<NaiveDate>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            book_id: BookId::new(row.book_id),
            order_date: row.order_date,
            return_due_date: row.return_due_date,
            actual_return_date: row.actual_return_date,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub(crate) struct NewOrderRow {
    pub user_id: i64,
    pub book_id: i64,
    pub order_date: NaiveDate,
    pub return_due_date: NaiveDate,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = order_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderHistoryRow {
    pub id: i64,
    pub order_id: i64,
    pub status: String,
    pub action_date: DateTime<Utc>,
}

impl OrderHistoryRow {
    pub(crate) fn into_entry(self) -> Result<OrderHistoryEntry, String> {
        let status: OrderStatus = self.status.parse().map_err(|err| format!("{err}"))?;
        Ok(OrderHistoryEntry {
            id: OrderHistoryId::new(self.id),
            order_id: OrderId::new(self.order_id),
            status,
            action_date: self.action_date,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = order_history)]
pub(crate) struct NewOrderHistoryRow<'a> {
    pub order_id: i64,
    pub status: &'a str,
    pub action_date: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: i64,
    pub comment: String,
    pub user_id: i64,
    pub book_id: i64,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: ReviewId::new(row.id),
            comment: row.comment,
            user_id: UserId::new(row.user_id),
            book_id: BookId::new(row.book_id),
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow<'a> {
    pub comment: &'a str,
    pub user_id: i64,
    pub book_id: i64,
}
