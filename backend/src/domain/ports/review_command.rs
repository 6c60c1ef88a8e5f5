//! Driving ports for book reviews.

use async_trait::async_trait;

use crate::domain::{BookId, Caller, Error, ReviewComment, ReviewId, ReviewView};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewCommand: Send + Sync {
    async fn create_review(
        &self,
        caller: &Caller,
        book_id: BookId,
        comment: ReviewComment,
    ) -> Result<ReviewView, Error>;

    /// Only the review's author may edit it.
    async fn update_review(
        &self,
        caller: &Caller,
        id: ReviewId,
        comment: ReviewComment,
    ) -> Result<ReviewView, Error>;

    /// Only the review's author may delete it.
    async fn delete_review(&self, caller: &Caller, id: ReviewId) -> Result<(), Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewQuery: Send + Sync {
    async fn all_reviews(&self) -> Result<Vec<ReviewView>, Error>;

    async fn reviews_by_book(&self, book_id: BookId) -> Result<Vec<ReviewView>, Error>;
}
