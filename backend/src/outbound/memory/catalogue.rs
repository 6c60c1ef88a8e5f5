//! Catalogue ports over the in-memory tables.

use async_trait::async_trait;

use crate::domain::ports::{
    AuthorRepository, BookRepository, CatalogueRepositoryError, GenreRepository,
};
use crate::domain::{
    Author, AuthorDraft, AuthorId, Book, BookDetails, BookId, BookIdentity, BookListing,
    BookUpdate, Genre, GenreDraft, GenreId, NewBook,
};

use super::{MemoryStore, State};

type Result<T> = std::result::Result<T, CatalogueRepositoryError>;

fn contains(haystack: &str, fragment: &str) -> bool {
    haystack
        .to_lowercase()
        .contains(&fragment.trim().to_lowercase())
}

fn check_references(state: &State, author_id: AuthorId, genre_ids: &[GenreId]) -> Result<()> {
    if state.authors.get(author_id.get()).is_none() {
        return Err(CatalogueRepositoryError::query("unknown author reference"));
    }
    if genre_ids.iter().any(|id| state.genres.get(id.get()).is_none()) {
        return Err(CatalogueRepositoryError::query("unknown genre reference"));
    }
    Ok(())
}

fn apply_details(book: &mut Book, details: &BookDetails) {
    book.title = details.title().to_owned();
    book.description = details.description().map(str::to_owned);
    book.publication_year = details.publication_year().as_ref().to_owned();
    book.quantity = details.quantity();
}

fn dedup(genre_ids: &[GenreId]) -> Vec<GenreId> {
    let mut ids = genre_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

impl MemoryStore {
    fn listings(&self, keep: impl Fn(&State, &Book) -> bool) -> Result<Vec<BookListing>> {
        let state = self.lock(CatalogueRepositoryError::query)?;
        Ok(state
            .books
            .values()
            .filter(|book| keep(&state, book))
            .filter_map(|book| state.listing(book))
            .collect())
    }
}

#[async_trait]
impl BookRepository for MemoryStore {
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>> {
        let state = self.lock(CatalogueRepositoryError::query)?;
        Ok(state.books.get(id.get()).cloned())
    }

    async fn find_listing(&self, id: BookId) -> Result<Option<BookListing>> {
        let state = self.lock(CatalogueRepositoryError::query)?;
        Ok(state
            .books
            .get(id.get())
            .and_then(|book| state.listing(book)))
    }

    async fn list_page(&self, offset: i64, limit: i64) -> Result<Vec<BookListing>> {
        let skip = usize::try_from(offset).unwrap_or(0);
        let take = usize::try_from(limit).unwrap_or(0);
        let state = self.lock(CatalogueRepositoryError::query)?;
        Ok(state
            .books
            .values()
            .skip(skip)
            .take(take)
            .filter_map(|book| state.listing(book))
            .collect())
    }

    async fn list_by_genre_id(&self, genre_id: GenreId) -> Result<Vec<BookListing>> {
        self.listings(|_, book| book.genre_ids.contains(&genre_id))
    }

    async fn list_by_genre_title(&self, fragment: &str) -> Result<Vec<BookListing>> {
        self.listings(|state, book| {
            book.genre_ids.iter().any(|id| {
                state
                    .genres
                    .get(id.get())
                    .is_some_and(|genre| contains(&genre.title, fragment))
            })
        })
    }

    async fn list_by_author_id(&self, author_id: AuthorId) -> Result<Vec<BookListing>> {
        self.listings(|_, book| book.author_id == author_id)
    }

    async fn list_by_author_name(&self, fragment: &str) -> Result<Vec<BookListing>> {
        self.listings(|state, book| {
            state.authors.get(book.author_id.get()).is_some_and(|author| {
                contains(&author.firstname, fragment) || contains(&author.lastname, fragment)
            })
        })
    }

    async fn exists(&self, identity: &BookIdentity) -> Result<bool> {
        let state = self.lock(CatalogueRepositoryError::query)?;
        Ok(state.books.values().any(|book| {
            book.title == identity.title
                && book.author_id == identity.author_id
                && book.publication_year == identity.publication_year
                && Some(book.id) != identity.excluding
        }))
    }

    async fn insert(&self, book: &NewBook) -> Result<Book> {
        let mut state = self.lock(CatalogueRepositoryError::query)?;
        check_references(&state, book.author_id, &book.genre_ids)?;
        let details = &book.details;
        Ok(state.books.insert_with(|id| Book {
            id: BookId::new(id),
            title: details.title().to_owned(),
            description: details.description().map(str::to_owned),
            publication_year: details.publication_year().as_ref().to_owned(),
            quantity: details.quantity(),
            author_id: book.author_id,
            genre_ids: dedup(&book.genre_ids),
            created_by: book.created_by,
        }))
    }

    async fn update(&self, update: &BookUpdate) -> Result<Option<Book>> {
        let mut state = self.lock(CatalogueRepositoryError::query)?;
        check_references(&state, update.author_id, &update.genre_ids)?;
        let Some(book) = state.books.get_mut(update.id.get()) else {
            return Ok(None);
        };
        apply_details(book, &update.details);
        book.author_id = update.author_id;
        book.genre_ids = dedup(&update.genre_ids);
        Ok(Some(book.clone()))
    }

    async fn delete(&self, id: BookId) -> Result<bool> {
        let mut state = self.lock(CatalogueRepositoryError::query)?;
        if state.orders.values().any(|order| order.book_id == id) {
            return Err(CatalogueRepositoryError::query("book is referenced by orders"));
        }
        if state.books.remove(id.get()).is_none() {
            return Ok(false);
        }
        let review_ids: Vec<i64> = state
            .reviews
            .values()
            .filter(|review| review.book_id == id)
            .map(|review| review.id.get())
            .collect();
        for review_id in review_ids {
            state.reviews.remove(review_id);
        }
        let user_ids: Vec<i64> = state.users.values().map(|user| user.id.get()).collect();
        for user_id in user_ids {
            if let Some(user) = state.users.get_mut(user_id) {
                user.favorite_books.retain(|book| *book != id);
            }
        }
        Ok(true)
    }

    async fn has_orders(&self, id: BookId) -> Result<bool> {
        let state = self.lock(CatalogueRepositoryError::query)?;
        Ok(state.orders.values().any(|order| order.book_id == id))
    }
}

#[async_trait]
impl AuthorRepository for MemoryStore {
    async fn find_by_id(&self, id: AuthorId) -> Result<Option<Author>> {
        let state = self.lock(CatalogueRepositoryError::query)?;
        Ok(state.authors.get(id.get()).cloned())
    }

    async fn find_by_name(&self, firstname: &str, lastname: &str) -> Result<Option<Author>> {
        let state = self.lock(CatalogueRepositoryError::query)?;
        Ok(state
            .authors
            .values()
            .find(|author| author.firstname == firstname && author.lastname == lastname)
            .cloned())
    }

    async fn insert(&self, draft: &AuthorDraft) -> Result<Author> {
        let mut state = self.lock(CatalogueRepositoryError::query)?;
        if name_taken(&state, draft, None) {
            return Err(CatalogueRepositoryError::query("unique constraint violated"));
        }
        Ok(state.authors.insert_with(|id| Author {
            id: AuthorId::new(id),
            firstname: draft.name.firstname().to_owned(),
            lastname: draft.name.lastname().to_owned(),
            date_of_birth: draft.date_of_birth,
            birthplace: draft.birthplace.clone(),
        }))
    }

    async fn update(&self, id: AuthorId, draft: &AuthorDraft) -> Result<Option<Author>> {
        let mut state = self.lock(CatalogueRepositoryError::query)?;
        if name_taken(&state, draft, Some(id)) {
            return Err(CatalogueRepositoryError::query("unique constraint violated"));
        }
        let Some(author) = state.authors.get_mut(id.get()) else {
            return Ok(None);
        };
        author.firstname = draft.name.firstname().to_owned();
        author.lastname = draft.name.lastname().to_owned();
        author.date_of_birth = draft.date_of_birth;
        author.birthplace = draft.birthplace.clone();
        Ok(Some(author.clone()))
    }

    async fn delete(&self, id: AuthorId) -> Result<bool> {
        let mut state = self.lock(CatalogueRepositoryError::query)?;
        if state.books.values().any(|book| book.author_id == id) {
            return Err(CatalogueRepositoryError::query("author is referenced by books"));
        }
        Ok(state.authors.remove(id.get()).is_some())
    }

    async fn has_books(&self, id: AuthorId) -> Result<bool> {
        let state = self.lock(CatalogueRepositoryError::query)?;
        Ok(state.books.values().any(|book| book.author_id == id))
    }
}

fn name_taken(state: &State, draft: &AuthorDraft, excluding: Option<AuthorId>) -> bool {
    state.authors.values().any(|author| {
        Some(author.id) != excluding
            && author.firstname == draft.name.firstname()
            && author.lastname == draft.name.lastname()
    })
}

fn title_taken(state: &State, title: &str, excluding: Option<GenreId>) -> bool {
    state
        .genres
        .values()
        .any(|genre| Some(genre.id) != excluding && genre.title == title)
}

#[async_trait]
impl GenreRepository for MemoryStore {
    async fn find_by_id(&self, id: GenreId) -> Result<Option<Genre>> {
        let state = self.lock(CatalogueRepositoryError::query)?;
        Ok(state.genres.get(id.get()).cloned())
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Genre>> {
        let state = self.lock(CatalogueRepositoryError::query)?;
        Ok(state
            .genres
            .values()
            .find(|genre| genre.title == title)
            .cloned())
    }

    async fn insert(&self, draft: &GenreDraft) -> Result<Genre> {
        let mut state = self.lock(CatalogueRepositoryError::query)?;
        if title_taken(&state, &draft.title, None) {
            return Err(CatalogueRepositoryError::query("unique constraint violated"));
        }
        Ok(state.genres.insert_with(|id| Genre {
            id: GenreId::new(id),
            title: draft.title.clone(),
            description: draft.description.clone(),
        }))
    }

    async fn update(&self, id: GenreId, draft: &GenreDraft) -> Result<Option<Genre>> {
        let mut state = self.lock(CatalogueRepositoryError::query)?;
        if title_taken(&state, &draft.title, Some(id)) {
            return Err(CatalogueRepositoryError::query("unique constraint violated"));
        }
        let Some(genre) = state.genres.get_mut(id.get()) else {
            return Ok(None);
        };
        genre.title = draft.title.clone();
        genre.description = draft.description.clone();
        Ok(Some(genre.clone()))
    }

    async fn delete(&self, id: GenreId) -> Result<bool> {
        let mut state = self.lock(CatalogueRepositoryError::query)?;
        if state.books.values().any(|book| book.genre_ids.contains(&id)) {
            return Err(CatalogueRepositoryError::query("genre is referenced by books"));
        }
        Ok(state.genres.remove(id.get()).is_some())
    }

    async fn has_books(&self, id: GenreId) -> Result<bool> {
        let state = self.lock(CatalogueRepositoryError::query)?;
        Ok(state.books.values().any(|book| book.genre_ids.contains(&id)))
    }
}

#[cfg(test)]
mod tests {
    //! Behaviour of the in-memory catalogue tables.
    use super::*;
    use crate::domain::{AuthorName, UserId};
    use rstest::{fixture, rstest};

    fn author_draft(first: &str, last: &str) -> AuthorDraft {
        AuthorDraft {
            name: AuthorName::try_new(first, last).expect("valid name"),
            date_of_birth: None,
            birthplace: None,
        }
    }

    fn genre_draft(title: &str) -> GenreDraft {
        GenreDraft::try_new(title, None).expect("valid genre")
    }

    async fn seed_book(store: &MemoryStore, title: &str, quantity: i32) -> Book {
        let author = match AuthorRepository::find_by_name(store, "Frank", "Herbert")
            .await
            .expect("lookup")
        {
            Some(author) => author,
            None => AuthorRepository::insert(store, &author_draft("Frank", "Herbert"))
                .await
                .expect("author"),
        };
        let genre = match GenreRepository::find_by_title(store, "Science fiction")
            .await
            .expect("lookup")
        {
            Some(genre) => genre,
            None => GenreRepository::insert(store, &genre_draft("Science fiction"))
                .await
                .expect("genre"),
        };
        BookRepository::insert(
            store,
            &NewBook {
                details: BookDetails::try_new(title, None, "1965", quantity).expect("details"),
                author_id: author.id,
                genre_ids: vec![genre.id, genre.id],
                created_by: UserId::new(1),
            },
        )
        .await
        .expect("book")
    }

    #[fixture]
    fn store() -> MemoryStore {
        MemoryStore::new()
    }

    #[rstest]
    #[tokio::test]
    async fn listings_join_author_and_genres(store: MemoryStore) {
        let book = seed_book(&store, "Dune", 2).await;

        let listing = store
            .find_listing(book.id)
            .await
            .expect("listing")
            .expect("present");

        assert_eq!(listing.author.lastname, "Herbert");
        assert_eq!(listing.genres.len(), 1);
        assert_eq!(listing.book.genre_ids.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn searches_are_case_insensitive_fragments(store: MemoryStore) {
        seed_book(&store, "Dune", 2).await;

        assert_eq!(store.list_by_genre_title("FICTION").await.expect("search").len(), 1);
        assert_eq!(store.list_by_author_name("herb").await.expect("search").len(), 1);
        assert!(store.list_by_author_name("tolkien").await.expect("search").is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn pages_follow_identifier_order(store: MemoryStore) {
        for title in ["A", "B", "C"] {
            seed_book(&store, title, 1).await;
        }

        let page = store.list_page(1, 2).await.expect("page");
        let titles: Vec<_> = page.iter().map(|l| l.book.title.as_str()).collect();
        assert_eq!(titles, ["B", "C"]);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_identity_respects_exclusion(store: MemoryStore) {
        let book = seed_book(&store, "Dune", 1).await;
        let mut identity = BookIdentity {
            title: "Dune".to_owned(),
            author_id: book.author_id,
            publication_year: "1965".to_owned(),
            excluding: None,
        };
        assert!(store.exists(&identity).await.expect("exists"));
        identity.excluding = Some(book.id);
        assert!(!store.exists(&identity).await.expect("exists"));
    }

    #[rstest]
    #[tokio::test]
    async fn author_names_are_unique(store: MemoryStore) {
        AuthorRepository::insert(&store, &author_draft("Ursula", "Le Guin"))
            .await
            .expect("first insert");
        let err = AuthorRepository::insert(&store, &author_draft("Ursula", "Le Guin"))
            .await
            .expect_err("duplicate");
        assert!(matches!(err, CatalogueRepositoryError::Query { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_updates_report_absence(store: MemoryStore) {
        let updated = GenreRepository::update(&store, GenreId::new(9), &genre_draft("Poetry"))
            .await
            .expect("update");
        assert!(updated.is_none());
    }
}
