//! In-memory adapter implementing every driven repository port.
//!
//! Used when no `database_url` is configured and by the HTTP integration
//! tests. All tables live behind one [`Mutex`], so each port call (checkout
//! and return included) observes and mutates a consistent snapshot, the same
//! guarantee the Diesel adapters get from a transaction.

mod accounts;
mod catalogue;
mod lending;
mod reviews;

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::domain::{
    Author, Book, BookListing, Genre, Order, OrderHistoryEntry, Review, User, VerificationToken,
};

/// Rows keyed by a monotonically assigned identifier.
#[derive(Debug)]
pub(crate) struct Table<V> {
    rows: BTreeMap<i64, V>,
    last_id: i64,
}

impl<V> Default for Table<V> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<V: Clone> Table<V> {
    /// Store the row built for the next identifier and return a copy.
    pub(crate) fn insert_with(&mut self, build: impl FnOnce(i64) -> V) -> V {
        self.last_id += 1;
        let row = build(self.last_id);
        self.rows.insert(self.last_id, row.clone());
        row
    }

    pub(crate) fn get(&self, id: i64) -> Option<&V> {
        self.rows.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: i64) -> Option<&mut V> {
        self.rows.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: i64) -> Option<V> {
        self.rows.remove(&id)
    }

    /// Rows in identifier order.
    pub(crate) fn values(&self) -> impl Iterator<Item = &V> {
        self.rows.values()
    }
}

#[derive(Debug, Default)]
pub(crate) struct State {
    pub(crate) users: Table<User>,
    pub(crate) tokens: HashMap<Uuid, VerificationToken>,
    pub(crate) authors: Table<Author>,
    pub(crate) genres: Table<Genre>,
    pub(crate) books: Table<Book>,
    pub(crate) orders: Table<Order>,
    pub(crate) history: Table<OrderHistoryEntry>,
    pub(crate) reviews: Table<Review>,
}

impl State {
    /// Join a book with its author and genres.
    pub(crate) fn listing(&self, book: &Book) -> Option<BookListing> {
        let author = self.authors.get(book.author_id.get())?.clone();
        let genres = book
            .genre_ids
            .iter()
            .filter_map(|id| self.genres.get(id.get()).cloned())
            .collect();
        Some(BookListing {
            book: book.clone(),
            author,
            genres,
        })
    }
}

/// Shared in-memory store; clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the tables, mapping poisoning onto the caller's query error.
    pub(crate) fn lock<E>(
        &self,
        query: impl FnOnce(&'static str) -> E,
    ) -> Result<MutexGuard<'_, State>, E> {
        self.state
            .lock()
            .map_err(|_| query("in-memory store lock poisoned"))
    }
}


#[cfg(test)]
impl MemoryStore {
    /// Insert an active reader directly into the tables.
    pub(crate) fn seed_user(&self, email: &str) -> crate::domain::UserId {
        use crate::domain::{Role, UserId};

        let mut state = self.state.lock().expect("store lock");
        state
            .users
            .insert_with(|id| User {
                id: UserId::new(id),
                firstname: "Seeded".to_owned(),
                lastname: "Reader".to_owned(),
                phone_number: "555".to_owned(),
                email: email.to_owned(),
                password_hash: "hash".to_owned(),
                role: Role::User,
                is_active: true,
                created_at: chrono::Utc::now(),
                admin_created_by: None,
                favorite_books: Vec::new(),
            })
            .id
    }

    /// Insert a book by Frank Herbert with the given stock.
    pub(crate) fn seed_book(&self, title: &str, quantity: i32) -> crate::domain::BookId {
        use crate::domain::{AuthorId, BookId, UserId};

        let mut state = self.state.lock().expect("store lock");
        let existing = state.authors.values().next().map(|author| author.id);
        let author_id = match existing {
            Some(id) => id,
            None => {
                state
                    .authors
                    .insert_with(|id| Author {
                        id: AuthorId::new(id),
                        firstname: "Frank".to_owned(),
                        lastname: "Herbert".to_owned(),
                        date_of_birth: None,
                        birthplace: None,
                    })
                    .id
            }
        };
        state
            .books
            .insert_with(|id| Book {
                id: BookId::new(id),
                title: title.to_owned(),
                description: None,
                publication_year: "1965".to_owned(),
                quantity,
                author_id,
                genre_ids: Vec::new(),
                created_by: UserId::new(1),
            })
            .id
    }
}
