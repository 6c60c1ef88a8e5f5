//! PostgreSQL-backed account adapters: users, favourites and verification
//! tokens.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{UserPersistenceError, UserRepository, VerificationTokenRepository};
use crate::domain::{BookId, NewUser, Role, User, UserId, VerificationToken};

use super::diesel_helpers::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{FavoriteRow, NewUserRow, UserRow, VerificationTokenRow};
use super::pool::{DbPool, PoolError};
use super::schema::{user_favorite_books, users, verification_tokens};

/// Diesel-backed implementation of the user and verification token ports.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        "accounts",
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

async fn favorites_for(
    conn: &mut AsyncPgConnection,
    user_ids: &[i64],
) -> Result<HashMap<i64, Vec<BookId>>, UserPersistenceError> {
    let links: Vec<(i64, i64)> = user_favorite_books::table
        .filter(user_favorite_books::user_id.eq_any(user_ids))
        .select((user_favorite_books::user_id, user_favorite_books::book_id))
        .order_by((user_favorite_books::user_id, user_favorite_books::book_id))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    let mut favorites: HashMap<i64, Vec<BookId>> = HashMap::new();
    for (user_id, book_id) in links {
        favorites.entry(user_id).or_default().push(BookId::new(book_id));
    }
    Ok(favorites)
}

fn decode_user(row: UserRow, favorites: Vec<BookId>) -> Result<User, UserPersistenceError> {
    row.into_user(favorites).map_err(UserPersistenceError::query)
}

impl DieselAccountRepository {
    async fn find_one(
        &self,
        filter: impl FnOnce() -> users::BoxedQuery<'static, diesel::pg::Pg> + Send,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = filter()
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut favorites = favorites_for(&mut conn, &[row.id]).await?;
        let own = favorites.remove(&row.id).unwrap_or_default();
        decode_user(row, own).map(Some)
    }
}

#[async_trait]
impl UserRepository for DieselAccountRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let id = id.get();
        self.find_one(move || users::table.filter(users::id.eq(id)).into_boxed())
            .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        let email = email.trim().to_lowercase();
        self.find_one(move || users::table.filter(users::email.eq(email)).into_boxed())
            .await
    }

    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: UserRow = diesel::insert_into(users::table)
            .values(&NewUserRow {
                firstname: &user.firstname,
                lastname: &user.lastname,
                phone_number: &user.phone_number,
                email: &user.email,
                password_hash: &user.password_hash,
                role: user.role.as_str(),
                is_active: user.is_active,
                created_at: user.created_at,
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        decode_user(row, Vec::new())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order_by(users::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut favorites = favorites_for(&mut conn, &ids).await?;
        rows.into_iter()
            .map(|row| {
                let own = favorites.remove(&row.id).unwrap_or_default();
                decode_user(row, own)
            })
            .collect()
    }

    async fn set_active(&self, id: UserId, active: bool) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(users::table.find(id.get()))
            .set(users::is_active.eq(active))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn set_role(
        &self,
        id: UserId,
        role: Role,
        admin_created_by: Option<UserId>,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(users::table.find(id.get()))
            .set((
                users::role.eq(role.as_str()),
                users::admin_created_by.eq(admin_created_by.map(UserId::get)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn add_favorite(
        &self,
        id: UserId,
        book_id: BookId,
    ) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(user_favorite_books::table)
            .values(&FavoriteRow {
                user_id: id.get(),
                book_id: book_id.get(),
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted > 0)
    }

    async fn remove_favorite(
        &self,
        id: UserId,
        book_id: BookId,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(
            user_favorite_books::table
                .filter(user_favorite_books::user_id.eq(id.get()))
                .filter(user_favorite_books::book_id.eq(book_id.get())),
        )
        .execute(&mut conn)
        .await
        .map(|_| ())
        .map_err(map_diesel_error)
    }
}

#[async_trait]
impl VerificationTokenRepository for DieselAccountRepository {
    async fn save(&self, token: &VerificationToken) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(verification_tokens::table)
            .values(&VerificationTokenRow {
                token: token.token,
                user_id: token.user_id.get(),
                expires_at: token.expires_at,
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find(&self, token: Uuid) -> Result<Option<VerificationToken>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<VerificationTokenRow> = verification_tokens::table
            .find(token)
            .select(VerificationTokenRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(VerificationToken::from))
    }

    async fn delete(&self, token: Uuid) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(verification_tokens::table.find(token))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for account error mapping and row decoding.
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_map_to_connection() {
        let mapped = map_pool_error(PoolError::checkout("database unavailable"));
        assert_eq!(mapped, UserPersistenceError::connection("database unavailable"));
    }

    #[rstest]
    fn corrupt_roles_are_query_errors() {
        let row = UserRow {
            id: 1,
            firstname: "Ada".to_owned(),
            lastname: "Lovelace".to_owned(),
            phone_number: "555".to_owned(),
            email: "ada@example.com".to_owned(),
            password_hash: "hash".to_owned(),
            role: "ROLE_ROOT".to_owned(),
            is_active: true,
            created_at: Utc::now(),
            admin_created_by: None,
        };
        assert!(matches!(
            decode_user(row, Vec::new()),
            Err(UserPersistenceError::Query { .. })
        ));
    }
}
