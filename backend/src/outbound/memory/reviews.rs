//! Review port over the in-memory tables.

use async_trait::async_trait;

use crate::domain::ports::{ReviewRepository, ReviewRepositoryError};
use crate::domain::{BookId, NewReview, Review, ReviewComment, ReviewId, ReviewView};

use super::{MemoryStore, State};

type Result<T> = std::result::Result<T, ReviewRepositoryError>;

fn view(state: &State, review: &Review) -> Option<ReviewView> {
    let user = state.users.get(review.user_id.get())?;
    Some(ReviewView {
        review: review.clone(),
        user_firstname: user.firstname.clone(),
        user_lastname: user.lastname.clone(),
    })
}

#[async_trait]
impl ReviewRepository for MemoryStore {
    async fn insert(&self, review: &NewReview) -> Result<ReviewView> {
        let mut state = self.lock(ReviewRepositoryError::query)?;
        if state.books.get(review.book_id.get()).is_none()
            || state.users.get(review.user_id.get()).is_none()
        {
            return Err(ReviewRepositoryError::query("unknown review reference"));
        }
        let stored = state.reviews.insert_with(|id| Review {
            id: ReviewId::new(id),
            comment: review.comment.as_ref().to_owned(),
            user_id: review.user_id,
            book_id: review.book_id,
        });
        view(&state, &stored).ok_or_else(|| ReviewRepositoryError::query("review author vanished"))
    }

    async fn find_by_id(&self, id: ReviewId) -> Result<Option<Review>> {
        let state = self.lock(ReviewRepositoryError::query)?;
        Ok(state.reviews.get(id.get()).cloned())
    }

    async fn list_all(&self) -> Result<Vec<ReviewView>> {
        let state = self.lock(ReviewRepositoryError::query)?;
        Ok(state
            .reviews
            .values()
            .filter_map(|review| view(&state, review))
            .collect())
    }

    async fn list_by_book(&self, book_id: BookId) -> Result<Vec<ReviewView>> {
        let state = self.lock(ReviewRepositoryError::query)?;
        Ok(state
            .reviews
            .values()
            .filter(|review| review.book_id == book_id)
            .filter_map(|review| view(&state, review))
            .collect())
    }

    async fn update_comment(
        &self,
        id: ReviewId,
        comment: &ReviewComment,
    ) -> Result<Option<ReviewView>> {
        let mut state = self.lock(ReviewRepositoryError::query)?;
        let Some(review) = state.reviews.get_mut(id.get()) else {
            return Ok(None);
        };
        review.comment = comment.as_ref().to_owned();
        let review = review.clone();
        Ok(view(&state, &review))
    }

    async fn delete(&self, id: ReviewId) -> Result<bool> {
        let mut state = self.lock(ReviewRepositoryError::query)?;
        Ok(state.reviews.remove(id.get()).is_some())
    }
}
