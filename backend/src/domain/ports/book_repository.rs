//! Ports for catalogue persistence: books, authors and genres.
//!
//! The three repositories share one error type because adapters back them
//! with the same store and services treat their failures identically.

use async_trait::async_trait;

use crate::domain::{
    Author, AuthorDraft, AuthorId, Book, BookId, BookIdentity, BookListing, BookUpdate, Genre,
    GenreDraft, GenreId, NewBook,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalogue repository adapters.
    pub enum CatalogueRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "catalogue repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "catalogue repository query failed: {message}",
    }
}

/// Book persistence with one narrow query per read path.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, CatalogueRepositoryError>;

    /// Book joined with its author and genres.
    async fn find_listing(
        &self,
        id: BookId,
    ) -> Result<Option<BookListing>, CatalogueRepositoryError>;

    /// Books ordered by id, skipping `offset` rows.
    async fn list_page(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<BookListing>, CatalogueRepositoryError>;

    async fn list_by_genre_id(
        &self,
        genre_id: GenreId,
    ) -> Result<Vec<BookListing>, CatalogueRepositoryError>;

    /// Books with at least one genre whose title contains `fragment`
    /// (case-insensitive).
    async fn list_by_genre_title(
        &self,
        fragment: &str,
    ) -> Result<Vec<BookListing>, CatalogueRepositoryError>;

    async fn list_by_author_id(
        &self,
        author_id: AuthorId,
    ) -> Result<Vec<BookListing>, CatalogueRepositoryError>;

    /// Books whose author's first or last name contains `fragment`
    /// (case-insensitive).
    async fn list_by_author_name(
        &self,
        fragment: &str,
    ) -> Result<Vec<BookListing>, CatalogueRepositoryError>;

    /// Whether another book already has this title, author and year.
    async fn exists(&self, identity: &BookIdentity) -> Result<bool, CatalogueRepositoryError>;

    async fn insert(&self, book: &NewBook) -> Result<Book, CatalogueRepositoryError>;

    /// Replace mutable fields; `None` when the book does not exist.
    async fn update(&self, update: &BookUpdate) -> Result<Option<Book>, CatalogueRepositoryError>;

    /// Remove the book; `false` when nothing was deleted.
    async fn delete(&self, id: BookId) -> Result<bool, CatalogueRepositoryError>;

    /// Whether any order references the book.
    async fn has_orders(&self, id: BookId) -> Result<bool, CatalogueRepositoryError>;
}

/// Author persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    async fn find_by_id(&self, id: AuthorId) -> Result<Option<Author>, CatalogueRepositoryError>;

    /// Exact match on first and last name.
    async fn find_by_name(
        &self,
        firstname: &str,
        lastname: &str,
    ) -> Result<Option<Author>, CatalogueRepositoryError>;

    async fn insert(&self, draft: &AuthorDraft) -> Result<Author, CatalogueRepositoryError>;

    async fn update(
        &self,
        id: AuthorId,
        draft: &AuthorDraft,
    ) -> Result<Option<Author>, CatalogueRepositoryError>;

    async fn delete(&self, id: AuthorId) -> Result<bool, CatalogueRepositoryError>;

    async fn has_books(&self, id: AuthorId) -> Result<bool, CatalogueRepositoryError>;
}

/// Genre persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenreRepository: Send + Sync {
    async fn find_by_id(&self, id: GenreId) -> Result<Option<Genre>, CatalogueRepositoryError>;

    /// Exact title match.
    async fn find_by_title(&self, title: &str) -> Result<Option<Genre>, CatalogueRepositoryError>;

    async fn insert(&self, draft: &GenreDraft) -> Result<Genre, CatalogueRepositoryError>;

    async fn update(
        &self,
        id: GenreId,
        draft: &GenreDraft,
    ) -> Result<Option<Genre>, CatalogueRepositoryError>;

    async fn delete(&self, id: GenreId) -> Result<bool, CatalogueRepositoryError>;

    async fn has_books(&self, id: GenreId) -> Result<bool, CatalogueRepositoryError>;
}
