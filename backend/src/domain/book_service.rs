//! Catalogue service: book creation, edits, deletion and browsing.
//!
//! Authors and genres named in a submission are looked up first and created
//! only when missing. Edits and deletions are limited to the admin who
//! created the book.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    AuthorRepository, BookCommand, BookQuery, BookRepository, GenreRepository, PageRequest,
};
use crate::domain::repository_errors::map_catalogue_error;
use crate::domain::{
    Author, AuthorDraft, AuthorId, AuthorName, Book, BookDetails, BookDraft, BookId, BookIdentity,
    BookListing, BookUpdate, Caller, Error, Genre, GenreDraft, GenreId, NewBook,
};

fn book_not_found(id: BookId) -> Error {
    Error::not_found(format!("Book with id: {id} not found!"))
}

fn non_empty<T>(listings: Vec<T>, message: &str) -> Result<Vec<T>, Error> {
    if listings.is_empty() {
        Err(Error::not_found(message))
    } else {
        Ok(listings)
    }
}

fn search_fragment(raw: &str, field: &str) -> Result<String, Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_request(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_owned())
}

/// Book service implementing [`BookCommand`] and [`BookQuery`].
pub struct BookService<B, A, G> {
    books: Arc<B>,
    authors: Arc<A>,
    genres: Arc<G>,
}

impl<B, A, G> BookService<B, A, G> {
    pub fn new(books: Arc<B>, authors: Arc<A>, genres: Arc<G>) -> Self {
        Self {
            books,
            authors,
            genres,
        }
    }
}

impl<B, A, G> BookService<B, A, G>
where
    B: BookRepository,
    A: AuthorRepository,
    G: GenreRepository,
{
    async fn existing_author(&self, name: &AuthorName) -> Result<Option<Author>, Error> {
        self.authors
            .find_by_name(name.firstname(), name.lastname())
            .await
            .map_err(map_catalogue_error)
    }

    async fn ensure_author(
        &self,
        existing: Option<Author>,
        name: &AuthorName,
    ) -> Result<Author, Error> {
        if let Some(author) = existing {
            return Ok(author);
        }
        let draft = AuthorDraft {
            name: name.clone(),
            date_of_birth: None,
            birthplace: None,
        };
        let author = self
            .authors
            .insert(&draft)
            .await
            .map_err(map_catalogue_error)?;
        info!(author_id = %author.id, "author created");
        Ok(author)
    }

    async fn ensure_genres(&self, titles: &[String]) -> Result<Vec<Genre>, Error> {
        let mut genres = Vec::with_capacity(titles.len());
        for title in titles {
            let found = self
                .genres
                .find_by_title(title)
                .await
                .map_err(map_catalogue_error)?;
            let genre = match found {
                Some(genre) => genre,
                None => {
                    let draft = GenreDraft {
                        title: title.clone(),
                        description: None,
                    };
                    let genre = self
                        .genres
                        .insert(&draft)
                        .await
                        .map_err(map_catalogue_error)?;
                    info!(genre_id = %genre.id, "genre created");
                    genre
                }
            };
            genres.push(genre);
        }
        Ok(genres)
    }

    async fn reject_duplicate(
        &self,
        details: &BookDetails,
        author_id: AuthorId,
        excluding: Option<BookId>,
    ) -> Result<(), Error> {
        let identity = BookIdentity {
            title: details.title().to_owned(),
            author_id,
            publication_year: details.publication_year().as_ref().to_owned(),
            excluding,
        };
        if self
            .books
            .exists(&identity)
            .await
            .map_err(map_catalogue_error)?
        {
            return Err(Error::conflict("Such a book already exists!"));
        }
        Ok(())
    }

    async fn owned_book(&self, caller: &Caller, id: BookId, denial: &str) -> Result<Book, Error> {
        let book = self
            .books
            .find_by_id(id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| book_not_found(id))?;
        if !book.is_owned_by(caller.id) {
            return Err(Error::forbidden(denial));
        }
        Ok(book)
    }

    async fn listing(&self, id: BookId) -> Result<BookListing, Error> {
        self.books
            .find_listing(id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| book_not_found(id))
    }
}

fn genre_ids(genres: &[Genre]) -> Vec<GenreId> {
    genres.iter().map(|genre| genre.id).collect()
}

#[async_trait]
impl<B, A, G> BookCommand for BookService<B, A, G>
where
    B: BookRepository,
    A: AuthorRepository,
    G: GenreRepository,
{
    async fn create_book(&self, caller: &Caller, draft: BookDraft) -> Result<BookListing, Error> {
        let existing = self.existing_author(draft.author()).await?;
        if let Some(author) = &existing {
            self.reject_duplicate(draft.details(), author.id, None)
                .await?;
        }
        let author = self.ensure_author(existing, draft.author()).await?;
        let genres = self.ensure_genres(draft.genre_titles()).await?;

        let new_book = NewBook {
            details: draft.details().clone(),
            author_id: author.id,
            genre_ids: genre_ids(&genres),
            created_by: caller.id,
        };
        let book = self
            .books
            .insert(&new_book)
            .await
            .map_err(map_catalogue_error)?;
        info!(book_id = %book.id, user_id = %caller.id, "book created");

        Ok(BookListing {
            book,
            author,
            genres,
        })
    }

    async fn update_book_entirely(
        &self,
        caller: &Caller,
        id: BookId,
        draft: BookDraft,
    ) -> Result<BookListing, Error> {
        self.owned_book(caller, id, "You cannot edit this book")
            .await?;
        let existing = self.existing_author(draft.author()).await?;
        if let Some(author) = &existing {
            self.reject_duplicate(draft.details(), author.id, Some(id))
                .await?;
        }
        let author = self.ensure_author(existing, draft.author()).await?;
        let genres = self.ensure_genres(draft.genre_titles()).await?;

        let update = BookUpdate {
            id,
            details: draft.details().clone(),
            author_id: author.id,
            genre_ids: genre_ids(&genres),
        };
        let book = self
            .books
            .update(&update)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| book_not_found(id))?;
        info!(book_id = %id, "book replaced");

        Ok(BookListing {
            book,
            author,
            genres,
        })
    }

    async fn update_book_details(
        &self,
        caller: &Caller,
        id: BookId,
        details: BookDetails,
    ) -> Result<BookListing, Error> {
        let book = self
            .owned_book(caller, id, "You cannot edit this book")
            .await?;
        self.reject_duplicate(&details, book.author_id, Some(id))
            .await?;

        let update = BookUpdate {
            id,
            details,
            author_id: book.author_id,
            genre_ids: book.genre_ids,
        };
        self.books
            .update(&update)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| book_not_found(id))?;
        info!(book_id = %id, "book details updated");
        self.listing(id).await
    }

    async fn delete_book(&self, caller: &Caller, id: BookId) -> Result<(), Error> {
        self.owned_book(caller, id, "You cannot delete this book")
            .await?;
        if self
            .books
            .has_orders(id)
            .await
            .map_err(map_catalogue_error)?
        {
            return Err(Error::conflict(
                "It is not possible to delete a book that has been ordered.",
            ));
        }
        if !self
            .books
            .delete(id)
            .await
            .map_err(map_catalogue_error)?
        {
            return Err(book_not_found(id));
        }
        info!(book_id = %id, user_id = %caller.id, "book deleted");
        Ok(())
    }
}

#[async_trait]
impl<B, A, G> BookQuery for BookService<B, A, G>
where
    B: BookRepository,
    A: AuthorRepository,
    G: GenreRepository,
{
    async fn list_books(&self, page: PageRequest) -> Result<Vec<BookListing>, Error> {
        self.books
            .list_page(page.offset(), page.limit())
            .await
            .map_err(map_catalogue_error)
    }

    async fn books_by_genre_id(&self, genre_id: GenreId) -> Result<Vec<BookListing>, Error> {
        let books = self
            .books
            .list_by_genre_id(genre_id)
            .await
            .map_err(map_catalogue_error)?;
        non_empty(books, "Genre not found!")
    }

    async fn books_by_genre_title(&self, title: &str) -> Result<Vec<BookListing>, Error> {
        let fragment = search_fragment(title, "genre title")?;
        let books = self
            .books
            .list_by_genre_title(&fragment)
            .await
            .map_err(map_catalogue_error)?;
        non_empty(books, "Genre not found!")
    }

    async fn books_by_author_id(&self, author_id: AuthorId) -> Result<Vec<BookListing>, Error> {
        let books = self
            .books
            .list_by_author_id(author_id)
            .await
            .map_err(map_catalogue_error)?;
        non_empty(books, "Author not found!")
    }

    async fn books_by_author_name(&self, name: &str) -> Result<Vec<BookListing>, Error> {
        let fragment = search_fragment(name, "author name")?;
        let books = self
            .books
            .list_by_author_name(&fragment)
            .await
            .map_err(map_catalogue_error)?;
        non_empty(books, "Author not found!")
    }
}

#[cfg(test)]
#[path = "book_service_tests.rs"]
mod tests;
