//! Book reviews left by readers.

use super::{BookId, ReviewId, UserId};

/// Validation errors for review comments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewValidationError {
    #[error("comment must not be empty")]
    EmptyComment,
    #[error("comment must be at most {max} characters")]
    CommentTooLong { max: usize },
}

/// Non-empty review text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewComment(String);

impl ReviewComment {
    const MAX: usize = 1000;

    pub fn new(raw: &str) -> Result<Self, ReviewValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ReviewValidationError::EmptyComment);
        }
        if trimmed.chars().count() > Self::MAX {
            return Err(ReviewValidationError::CommentTooLong { max: Self::MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ReviewComment {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: ReviewId,
    pub comment: String,
    pub user_id: UserId,
    pub book_id: BookId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub comment: ReviewComment,
    pub user_id: UserId,
    pub book_id: BookId,
}

/// Review joined with its author's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewView {
    pub review: Review,
    pub user_firstname: String,
    pub user_lastname: String,
}
