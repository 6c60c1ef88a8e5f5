//! PostgreSQL-backed catalogue adapters for books, authors and genres.
//!
//! One repository type implements all three catalogue ports because book
//! listings join across the three tables.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{
    AuthorRepository, BookRepository, CatalogueRepositoryError, GenreRepository,
};
use crate::domain::{
    Author, AuthorDraft, AuthorId, Book, BookDetails, BookId, BookIdentity, BookListing,
    BookUpdate, Genre, GenreDraft, GenreId, NewBook,
};

use super::diesel_helpers::{contains_pattern, map_basic_diesel_error, map_basic_pool_error};
use super::models::{
    AuthorRow, AuthorValues, BookGenreRow, BookRow, BookValues, GenreRow, GenreValues,
    NewBookRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{authors, book_genres, books, genres, orders};

/// Diesel-backed implementation of the catalogue ports.
#[derive(Clone)]
pub struct DieselCatalogueRepository {
    pool: DbPool,
}

impl DieselCatalogueRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn listings_where<F>(
        &self,
        select: F,
    ) -> Result<Vec<BookListing>, CatalogueRepositoryError>
    where
        F: FnOnce() -> books::BoxedQuery<'static, diesel::pg::Pg> + Send,
    {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<BookRow> = select()
            .select(BookRow::as_select())
            .order_by(books::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        load_listings(&mut conn, rows).await.map_err(map_diesel_error)
    }
}

fn map_pool_error(error: PoolError) -> CatalogueRepositoryError {
    map_basic_pool_error(error, CatalogueRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CatalogueRepositoryError {
    map_basic_diesel_error(
        error,
        "catalogue",
        CatalogueRepositoryError::query,
        CatalogueRepositoryError::connection,
    )
}

fn book_values(details: &BookDetails, author_id: AuthorId) -> BookValues<'_> {
    BookValues {
        title: details.title(),
        description: details.description(),
        publication_year: details.publication_year().as_ref(),
        quantity: details.quantity(),
        author_id: author_id.get(),
    }
}

fn author_values(draft: &AuthorDraft) -> AuthorValues<'_> {
    AuthorValues {
        firstname: draft.name.firstname(),
        lastname: draft.name.lastname(),
        date_of_birth: draft.date_of_birth,
        birthplace: draft.birthplace.as_deref(),
    }
}

fn genre_values(draft: &GenreDraft) -> GenreValues<'_> {
    GenreValues {
        title: draft.title.as_str(),
        description: draft.description.as_deref(),
    }
}

async fn genre_ids_for(
    conn: &mut AsyncPgConnection,
    book_id: i64,
) -> QueryResult<Vec<GenreId>> {
    let ids: Vec<i64> = book_genres::table
        .filter(book_genres::book_id.eq(book_id))
        .select(book_genres::genre_id)
        .order_by(book_genres::genre_id)
        .load(conn)
        .await?;
    Ok(ids.into_iter().map(GenreId::new).collect())
}

async fn replace_genres(
    conn: &mut AsyncPgConnection,
    book_id: i64,
    genre_ids: &[GenreId],
) -> QueryResult<()> {
    diesel::delete(book_genres::table.filter(book_genres::book_id.eq(book_id)))
        .execute(conn)
        .await?;
    let links: Vec<BookGenreRow> = genre_ids
        .iter()
        .map(|genre_id| BookGenreRow {
            book_id,
            genre_id: genre_id.get(),
        })
        .collect();
    if !links.is_empty() {
        diesel::insert_into(book_genres::table)
            .values(&links)
            .on_conflict_do_nothing()
            .execute(conn)
            .await?;
    }
    Ok(())
}

/// Join book rows with their authors and genres.
async fn load_listings(
    conn: &mut AsyncPgConnection,
    rows: Vec<BookRow>,
) -> QueryResult<Vec<BookListing>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let book_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let author_ids: Vec<i64> = rows.iter().map(|row| row.author_id).collect();

    let authors: HashMap<i64, Author> = authors::table
        .filter(authors::id.eq_any(&author_ids))
        .select(AuthorRow::as_select())
        .load::<AuthorRow>(conn)
        .await?
        .into_iter()
        .map(|row| (row.id, Author::from(row)))
        .collect();

    let links: Vec<(i64, GenreRow)> = book_genres::table
        .inner_join(genres::table)
        .filter(book_genres::book_id.eq_any(&book_ids))
        .select((book_genres::book_id, GenreRow::as_select()))
        .order_by((book_genres::book_id, genres::id))
        .load(conn)
        .await?;
    let mut genres_by_book: HashMap<i64, Vec<Genre>> = HashMap::new();
    for (book_id, genre) in links {
        genres_by_book
            .entry(book_id)
            .or_default()
            .push(Genre::from(genre));
    }

    rows.into_iter()
        .map(|row| {
            let author = authors
                .get(&row.author_id)
                .cloned()
                .ok_or(diesel::result::Error::NotFound)?;
            let genres = genres_by_book.remove(&row.id).unwrap_or_default();
            let genre_ids = genres.iter().map(|genre| genre.id).collect();
            Ok(BookListing {
                book: row.into_book(genre_ids),
                author,
                genres,
            })
        })
        .collect()
}

#[async_trait]
impl BookRepository for DieselCatalogueRepository {
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<BookRow> = books::table
            .find(id.get())
            .select(BookRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let genre_ids = genre_ids_for(&mut conn, row.id)
            .await
            .map_err(map_diesel_error)?;
        Ok(Some(row.into_book(genre_ids)))
    }

    async fn find_listing(
        &self,
        id: BookId,
    ) -> Result<Option<BookListing>, CatalogueRepositoryError> {
        let id = id.get();
        let listings = self
            .listings_where(move || books::table.filter(books::id.eq(id)).into_boxed())
            .await?;
        Ok(listings.into_iter().next())
    }

    async fn list_page(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<BookListing>, CatalogueRepositoryError> {
        self.listings_where(move || books::table.offset(offset).limit(limit).into_boxed())
            .await
    }

    async fn list_by_genre_id(
        &self,
        genre_id: GenreId,
    ) -> Result<Vec<BookListing>, CatalogueRepositoryError> {
        let genre_id = genre_id.get();
        self.listings_where(move || {
            books::table
                .filter(
                    books::id.eq_any(
                        book_genres::table
                            .filter(book_genres::genre_id.eq(genre_id))
                            .select(book_genres::book_id),
                    ),
                )
                .into_boxed()
        })
        .await
    }

    async fn list_by_genre_title(
        &self,
        fragment: &str,
    ) -> Result<Vec<BookListing>, CatalogueRepositoryError> {
        let pattern = contains_pattern(fragment);
        self.listings_where(move || {
            books::table
                .filter(
                    books::id.eq_any(
                        book_genres::table
                            .inner_join(genres::table)
                            .filter(genres::title.ilike(pattern))
                            .select(book_genres::book_id),
                    ),
                )
                .into_boxed()
        })
        .await
    }

    async fn list_by_author_id(
        &self,
        author_id: AuthorId,
    ) -> Result<Vec<BookListing>, CatalogueRepositoryError> {
        let author_id = author_id.get();
        self.listings_where(move || {
            books::table
                .filter(books::author_id.eq(author_id))
                .into_boxed()
        })
        .await
    }

    async fn list_by_author_name(
        &self,
        fragment: &str,
    ) -> Result<Vec<BookListing>, CatalogueRepositoryError> {
        let pattern = contains_pattern(fragment);
        self.listings_where(move || {
            books::table
                .filter(
                    books::author_id.eq_any(
                        authors::table
                            .filter(
                                authors::firstname
                                    .ilike(pattern.clone())
                                    .or(authors::lastname.ilike(pattern)),
                            )
                            .select(authors::id),
                    ),
                )
                .into_boxed()
        })
        .await
    }

    async fn exists(&self, identity: &BookIdentity) -> Result<bool, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = books::table
            .filter(books::title.eq(identity.title.as_str()))
            .filter(books::author_id.eq(identity.author_id.get()))
            .filter(books::publication_year.eq(identity.publication_year.as_str()))
            .into_boxed();
        if let Some(excluded) = identity.excluding {
            query = query.filter(books::id.ne(excluded.get()));
        }
        let found: Option<i64> = query
            .select(books::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(found.is_some())
    }

    async fn insert(&self, book: &NewBook) -> Result<Book, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewBookRow {
            values: book_values(&book.details, book.author_id),
            created_by: book.created_by.get(),
        };
        conn.transaction(|conn| {
            async move {
                let inserted: BookRow = diesel::insert_into(books::table)
                    .values(&row)
                    .returning(BookRow::as_returning())
                    .get_result(conn)
                    .await?;
                replace_genres(conn, inserted.id, &book.genre_ids).await?;
                let genre_ids = genre_ids_for(conn, inserted.id).await?;
                Ok(inserted.into_book(genre_ids))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn update(&self, update: &BookUpdate) -> Result<Option<Book>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let values = book_values(&update.details, update.author_id);
        let id = update.id.get();
        conn.transaction(|conn| {
            async move {
                let updated: Option<BookRow> = diesel::update(books::table.find(id))
                    .set(&values)
                    .returning(BookRow::as_returning())
                    .get_result(conn)
                    .await
                    .optional()?;
                let Some(updated) = updated else {
                    return Ok(None);
                };
                replace_genres(conn, id, &update.genre_ids).await?;
                let genre_ids = genre_ids_for(conn, id).await?;
                Ok(Some(updated.into_book(genre_ids)))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn delete(&self, id: BookId) -> Result<bool, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(books::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn has_orders(&self, id: BookId) -> Result<bool, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let found: Option<i64> = orders::table
            .filter(orders::book_id.eq(id.get()))
            .select(orders::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(found.is_some())
    }
}

#[async_trait]
impl AuthorRepository for DieselCatalogueRepository {
    async fn find_by_id(&self, id: AuthorId) -> Result<Option<Author>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<AuthorRow> = authors::table
            .find(id.get())
            .select(AuthorRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Author::from))
    }

    async fn find_by_name(
        &self,
        firstname: &str,
        lastname: &str,
    ) -> Result<Option<Author>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<AuthorRow> = authors::table
            .filter(authors::firstname.eq(firstname))
            .filter(authors::lastname.eq(lastname))
            .select(AuthorRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Author::from))
    }

    async fn insert(&self, draft: &AuthorDraft) -> Result<Author, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: AuthorRow = diesel::insert_into(authors::table)
            .values(&author_values(draft))
            .returning(AuthorRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn update(
        &self,
        id: AuthorId,
        draft: &AuthorDraft,
    ) -> Result<Option<Author>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<AuthorRow> = diesel::update(authors::table.find(id.get()))
            .set(&author_values(draft))
            .returning(AuthorRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Author::from))
    }

    async fn delete(&self, id: AuthorId) -> Result<bool, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(authors::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn has_books(&self, id: AuthorId) -> Result<bool, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let found: Option<i64> = books::table
            .filter(books::author_id.eq(id.get()))
            .select(books::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(found.is_some())
    }
}

#[async_trait]
impl GenreRepository for DieselCatalogueRepository {
    async fn find_by_id(&self, id: GenreId) -> Result<Option<Genre>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<GenreRow> = genres::table
            .find(id.get())
            .select(GenreRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Genre::from))
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Genre>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<GenreRow> = genres::table
            .filter(genres::title.eq(title))
            .select(GenreRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Genre::from))
    }

    async fn insert(&self, draft: &GenreDraft) -> Result<Genre, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: GenreRow = diesel::insert_into(genres::table)
            .values(&genre_values(draft))
            .returning(GenreRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn update(
        &self,
        id: GenreId,
        draft: &GenreDraft,
    ) -> Result<Option<Genre>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<GenreRow> = diesel::update(genres::table.find(id.get()))
            .set(&genre_values(draft))
            .returning(GenreRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Genre::from))
    }

    async fn delete(&self, id: GenreId) -> Result<bool, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(genres::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn has_books(&self, id: GenreId) -> Result<bool, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let found: Option<i64> = book_genres::table
            .filter(book_genres::genre_id.eq(id.get()))
            .select(book_genres::book_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(found.is_some())
    }
}
