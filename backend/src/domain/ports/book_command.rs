//! Driving ports for catalogue management and browsing.

use async_trait::async_trait;

use crate::domain::{
    AuthorDraft, AuthorId, BookDetails, BookDraft, BookId, BookListing, Caller, Error, GenreDraft,
    GenreId,
};

/// Zero-based page selection.
///
/// ## Invariants
/// - `size` is within `1..=MAX_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    pub const DEFAULT_SIZE: u32 = 10;
    pub const MAX_SIZE: u32 = 100;

    /// Validate raw query values, falling back to page 0 and the default size.
    pub fn try_new(page: Option<u32>, size: Option<u32>) -> Result<Self, Error> {
        let size = size.unwrap_or(Self::DEFAULT_SIZE);
        if !(1..=Self::MAX_SIZE).contains(&size) {
            return Err(Error::invalid_request(format!(
                "size must be between 1 and {}",
                Self::MAX_SIZE
            )));
        }
        Ok(Self {
            page: page.unwrap_or(0),
            size,
        })
    }

    pub fn offset(self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    pub fn limit(self) -> i64 {
        i64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: Self::DEFAULT_SIZE,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookCommand: Send + Sync {
    async fn create_book(&self, caller: &Caller, draft: BookDraft) -> Result<BookListing, Error>;

    async fn update_book_entirely(
        &self,
        caller: &Caller,
        id: BookId,
        draft: BookDraft,
    ) -> Result<BookListing, Error>;

    async fn update_book_details(
        &self,
        caller: &Caller,
        id: BookId,
        details: BookDetails,
    ) -> Result<BookListing, Error>;

    async fn delete_book(&self, caller: &Caller, id: BookId) -> Result<(), Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookQuery: Send + Sync {
    async fn list_books(&self, page: PageRequest) -> Result<Vec<BookListing>, Error>;

    async fn books_by_genre_id(&self, genre_id: GenreId) -> Result<Vec<BookListing>, Error>;

    async fn books_by_genre_title(&self, title: &str) -> Result<Vec<BookListing>, Error>;

    async fn books_by_author_id(&self, author_id: AuthorId) -> Result<Vec<BookListing>, Error>;

    async fn books_by_author_name(&self, name: &str) -> Result<Vec<BookListing>, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorCommand: Send + Sync {
    async fn update_author(&self, id: AuthorId, draft: AuthorDraft) -> Result<(), Error>;

    async fn delete_author(&self, id: AuthorId) -> Result<(), Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenreCommand: Send + Sync {
    async fn update_genre(&self, id: GenreId, draft: GenreDraft) -> Result<(), Error>;

    async fn delete_genre(&self, id: GenreId) -> Result<(), Error>;
}
