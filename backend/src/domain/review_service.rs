//! Review service: readers comment on books and manage their own reviews.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{BookRepository, ReviewCommand, ReviewQuery, ReviewRepository};
use crate::domain::repository_errors::{map_catalogue_error, map_review_error};
use crate::domain::{
    BookId, Caller, Error, NewReview, Review, ReviewComment, ReviewId, ReviewView,
};

fn review_not_found(id: ReviewId) -> Error {
    Error::not_found(format!("Review with id: {id} not found!"))
}

pub struct ReviewService<R, B> {
    reviews: Arc<R>,
    books: Arc<B>,
}

impl<R, B> ReviewService<R, B> {
    pub fn new(reviews: Arc<R>, books: Arc<B>) -> Self {
        Self { reviews, books }
    }
}

impl<R, B> ReviewService<R, B>
where
    R: ReviewRepository,
    B: BookRepository,
{
    async fn own_review(
        &self,
        caller: &Caller,
        id: ReviewId,
        denial: &str,
    ) -> Result<Review, Error> {
        let review = self
            .reviews
            .find_by_id(id)
            .await
            .map_err(map_review_error)?
            .ok_or_else(|| review_not_found(id))?;
        if review.user_id != caller.id {
            return Err(Error::forbidden(denial));
        }
        Ok(review)
    }
}

#[async_trait]
impl<R, B> ReviewCommand for ReviewService<R, B>
where
    R: ReviewRepository,
    B: BookRepository,
{
    async fn create_review(
        &self,
        caller: &Caller,
        book_id: BookId,
        comment: ReviewComment,
    ) -> Result<ReviewView, Error> {
        self.books
            .find_by_id(book_id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| Error::not_found(format!("Book with id: {book_id} not found!")))?;
        let review = NewReview {
            comment,
            user_id: caller.id,
            book_id,
        };
        let view = self
            .reviews
            .insert(&review)
            .await
            .map_err(map_review_error)?;
        info!(review_id = %view.review.id, book_id = %book_id, "review created");
        Ok(view)
    }

    async fn update_review(
        &self,
        caller: &Caller,
        id: ReviewId,
        comment: ReviewComment,
    ) -> Result<ReviewView, Error> {
        self.own_review(caller, id, "You cannot edit this review!")
            .await?;
        self.reviews
            .update_comment(id, &comment)
            .await
            .map_err(map_review_error)?
            .ok_or_else(|| review_not_found(id))
    }

    async fn delete_review(&self, caller: &Caller, id: ReviewId) -> Result<(), Error> {
        self.own_review(caller, id, "You cannot delete this review!")
            .await?;
        if !self.reviews.delete(id).await.map_err(map_review_error)? {
            return Err(review_not_found(id));
        }
        info!(review_id = %id, "review deleted");
        Ok(())
    }
}

#[async_trait]
impl<R, B> ReviewQuery for ReviewService<R, B>
where
    R: ReviewRepository,
    B: BookRepository,
{
    async fn all_reviews(&self) -> Result<Vec<ReviewView>, Error> {
        self.reviews.list_all().await.map_err(map_review_error)
    }

    async fn reviews_by_book(&self, book_id: BookId) -> Result<Vec<ReviewView>, Error> {
        self.reviews
            .list_by_book(book_id)
            .await
            .map_err(map_review_error)
    }
}
