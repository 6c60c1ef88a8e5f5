//! PostgreSQL-backed `ReviewRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{ReviewRepository, ReviewRepositoryError};
use crate::domain::{BookId, NewReview, Review, ReviewComment, ReviewId, ReviewView};

use super::diesel_helpers::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewReviewRow, ReviewRow};
use super::pool::{DbPool, PoolError};
use super::schema::{reviews, users};

/// Diesel-backed implementation of the review port.
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReviewRepositoryError {
    map_basic_pool_error(error, ReviewRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ReviewRepositoryError {
    map_basic_diesel_error(
        error,
        "reviews",
        ReviewRepositoryError::query,
        ReviewRepositoryError::connection,
    )
}

fn to_view((row, user_firstname, user_lastname): (ReviewRow, String, String)) -> ReviewView {
    ReviewView {
        review: row.into(),
        user_firstname,
        user_lastname,
    }
}

async fn load_view(
    conn: &mut AsyncPgConnection,
    id: i64,
) -> QueryResult<Option<ReviewView>> {
    let row: Option<(ReviewRow, String, String)> = reviews::table
        .inner_join(users::table)
        .filter(reviews::id.eq(id))
        .select((ReviewRow::as_select(), users::firstname, users::lastname))
        .first(conn)
        .await
        .optional()?;
    Ok(row.map(to_view))
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn insert(&self, review: &NewReview) -> Result<ReviewView, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id: i64 = diesel::insert_into(reviews::table)
            .values(&NewReviewRow {
                comment: review.comment.as_ref(),
                user_id: review.user_id.get(),
                book_id: review.book_id.get(),
            })
            .returning(reviews::id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        load_view(&mut conn, id)
            .await
            .map_err(map_diesel_error)?
            .ok_or_else(|| ReviewRepositoryError::query("inserted review vanished"))
    }

    async fn find_by_id(&self, id: ReviewId) -> Result<Option<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ReviewRow> = reviews::table
            .find(id.get())
            .select(ReviewRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Review::from))
    }

    async fn list_all(&self) -> Result<Vec<ReviewView>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(ReviewRow, String, String)> = reviews::table
            .inner_join(users::table)
            .select((ReviewRow::as_select(), users::firstname, users::lastname))
            .order_by(reviews::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(to_view).collect())
    }

    async fn list_by_book(
        &self,
        book_id: BookId,
    ) -> Result<Vec<ReviewView>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(ReviewRow, String, String)> = reviews::table
            .inner_join(users::table)
            .filter(reviews::book_id.eq(book_id.get()))
            .select((ReviewRow::as_select(), users::firstname, users::lastname))
            .order_by(reviews::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(to_view).collect())
    }

    async fn update_comment(
        &self,
        id: ReviewId,
        comment: &ReviewComment,
    ) -> Result<Option<ReviewView>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(reviews::table.find(id.get()))
            .set(reviews::comment.eq(comment.as_ref()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Ok(None);
        }
        load_view(&mut conn, id.get())
            .await
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: ReviewId) -> Result<bool, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(reviews::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
