//! Port for review persistence.

use async_trait::async_trait;

use crate::domain::{BookId, NewReview, Review, ReviewComment, ReviewId, ReviewView};

use super::define_port_error;

define_port_error! {
    /// Errors raised by review repository adapters.
    pub enum ReviewRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "review repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "review repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn insert(&self, review: &NewReview) -> Result<ReviewView, ReviewRepositoryError>;

    async fn find_by_id(&self, id: ReviewId) -> Result<Option<Review>, ReviewRepositoryError>;

    async fn list_all(&self) -> Result<Vec<ReviewView>, ReviewRepositoryError>;

    async fn list_by_book(&self, book_id: BookId)
    -> Result<Vec<ReviewView>, ReviewRepositoryError>;

    /// Replace the comment; `None` when the review does not exist.
    async fn update_comment(
        &self,
        id: ReviewId,
        comment: &ReviewComment,
    ) -> Result<Option<ReviewView>, ReviewRepositoryError>;

    async fn delete(&self, id: ReviewId) -> Result<bool, ReviewRepositoryError>;
}
